//! Download scheduler.
//!
//! Runs a bounded pool of download workers over an asset candidate set:
//! fetch → storage sink → outcome. Every asset yields exactly one
//! [`DownloadOutcome`]; a failed asset never stops the batch.

mod outcome;
mod progress;
mod run;

pub use outcome::DownloadOutcome;
pub use progress::ProgressStats;
pub use run::{run_downloads, DEFAULT_CONCURRENCY};
