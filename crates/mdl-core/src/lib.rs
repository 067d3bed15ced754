pub mod config;
pub mod logging;

pub mod category;
pub mod checksum;
pub mod collector;
pub mod fetch;
pub mod manifest;
pub mod retry;
pub mod scan;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod url_model;
