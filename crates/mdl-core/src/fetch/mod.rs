//! HTTP GET capability.
//!
//! The pipeline only depends on the [`Fetcher`] trait; [`CurlFetcher`] is the
//! libcurl implementation used by the CLI. Calls block the current thread, so
//! async callers run them inside `spawn_blocking`.

mod curl_fetcher;
mod error;
#[cfg(test)]
pub(crate) mod mock;

pub use curl_fetcher::CurlFetcher;
pub use error::FetchError;

use std::time::Duration;

/// A completed 2xx GET response.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code (always 2xx; other statuses are returned as errors).
    pub status: u32,
    /// URL after redirects.
    pub final_url: String,
    /// `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Vec<u8>,
}

/// Blocking HTTP GET.
pub trait Fetcher: Send + Sync {
    /// Fetch `url`, following redirects. Non-2xx statuses are errors.
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// Request options shared by every GET of a session.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    /// Total time allowed for one request, body included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_redirections: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(15),
            max_redirections: 10,
        }
    }
}
