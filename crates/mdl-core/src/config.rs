use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::FetchOptions;
use crate::retry::RetryPolicy;

/// Desktop browser User-Agent; some CDNs refuse requests from unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Upper bound on concurrent asset downloads, whatever the config asks for.
pub const MAX_CONCURRENCY: usize = 16;

/// Retry policy parameters (optional section in the config file).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay_secs: 0.5,
            max_delay_secs: 5,
        }
    }
}

/// Per-run configuration. Built from defaults, optionally overlaid with a
/// user-supplied TOML file, then with CLI flags. Never written back to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MdlConfig {
    /// Number of assets downloaded at once.
    pub concurrency: usize,
    /// Total per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// First component of the session directory name (`<prefix>_<domain>_<timestamp>`).
    pub output_prefix: String,
    /// Directory the session directory is created in (None = user's Downloads folder).
    pub output_parent: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for MdlConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout_secs: 30,
            connect_timeout_secs: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output_prefix: "mdl".to_string(),
            output_parent: None,
            retry: None,
        }
    }
}

impl MdlConfig {
    /// Worker pool size clamped to `1..=MAX_CONCURRENCY`.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENCY)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
            ..FetchOptions::default()
        }
    }

    /// Rejects values that parse as TOML but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if let Some(retry) = &self.retry {
            if Duration::try_from_secs_f64(retry.base_delay_secs).is_err() {
                bail!(
                    "retry.base_delay_secs must be a finite, non-negative number of seconds (got {})",
                    retry.base_delay_secs
                );
            }
        }
        Ok(())
    }

    /// Unusable base delays fall back to `max_delay_secs`.
    pub fn retry_policy(&self) -> RetryPolicy {
        let retry = self.retry.clone().unwrap_or_default();
        let max_delay = Duration::from_secs(retry.max_delay_secs);
        let base_delay = Duration::try_from_secs_f64(retry.base_delay_secs)
            .unwrap_or(max_delay)
            .min(max_delay);
        RetryPolicy {
            max_attempts: retry.max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }
}

/// Load configuration from `path` if given, otherwise return the defaults.
pub fn load(path: Option<&Path>) -> Result<MdlConfig> {
    let Some(path) = path else {
        return Ok(MdlConfig::default());
    };
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: MdlConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
