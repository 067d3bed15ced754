//! Progress reporting for a download session (items done, success/failure).
//!
//! Sent by the scheduler after every completed outcome; consumers render a
//! progress line from `completed`/`total` and `percent()`.

/// Snapshot of session progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressStats {
    /// Outcomes recorded so far.
    pub completed: usize,
    /// Assets in the session.
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Bytes written by successful downloads.
    pub bytes_done: u64,
    /// Elapsed time since the download phase started (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Fraction complete in [0.0, 1.0]. An empty session is complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}
