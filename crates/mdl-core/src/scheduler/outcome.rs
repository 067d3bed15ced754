//! Terminal result of one attempted asset download.

use std::time::Duration;

use crate::collector::AssetReference;

/// Result of one download attempt. Immutable once created.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub asset: AssetReference,
    /// Path relative to the output root (`images/a.png`) on success.
    pub path: Option<String>,
    /// Bytes written; 0 on failure.
    pub bytes: u64,
    /// Error description on failure.
    pub error: Option<String>,
    /// `Content-Type` of the response, when one was received.
    pub content_type: Option<String>,
    /// SHA-256 of the saved bytes on success.
    pub sha256: Option<String>,
    /// Wall-clock time from worker start to outcome.
    pub duration: Duration,
}

impl DownloadOutcome {
    pub fn succeeded(
        asset: AssetReference,
        path: String,
        bytes: u64,
        content_type: Option<String>,
        sha256: String,
        duration: Duration,
    ) -> Self {
        Self {
            asset,
            path: Some(path),
            bytes,
            error: None,
            content_type,
            sha256: Some(sha256),
            duration,
        }
    }

    pub fn failed(
        asset: AssetReference,
        error: impl Into<String>,
        content_type: Option<String>,
        duration: Duration,
    ) -> Self {
        Self {
            asset,
            path: None,
            bytes: 0,
            error: Some(error.into()),
            content_type,
            sha256: None,
            duration,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
