//! One download session: fetch the target page, discover assets, download
//! them into a fresh output directory and write the manifest.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

use crate::collector::{self, PageFetchResult};
use crate::fetch::Fetcher;
use crate::manifest::{SessionManifest, SessionSummary};
use crate::scheduler::{self, ProgressStats, DEFAULT_CONCURRENCY};
use crate::storage::FilesystemSink;
use crate::url_model::sanitize_filename;

/// Caller-chosen knobs for one session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Directory the session directory is created in.
    pub output_parent: PathBuf,
    /// Leading component of the session directory name.
    pub prefix: String,
    pub concurrency: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            output_parent: default_output_parent(),
            prefix: "mdl".to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// What a finished session reports back.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub summary: SessionSummary,
}

/// The user's Downloads directory, or the current directory if there is none.
pub fn default_output_parent() -> PathBuf {
    match dirs::download_dir() {
        Some(dir) => dir,
        None => {
            tracing::warn!("no Downloads directory found, using the current directory");
            PathBuf::from(".")
        }
    }
}

/// `<prefix>_<domain>_<YYYYMMDD_HHMMSS>`; the domain drops a leading `www.`.
pub fn output_dir_name(prefix: &str, target: &Url, at: DateTime<Local>) -> String {
    let host = target.host_str().unwrap_or("unknown");
    let host = host.strip_prefix("www.").unwrap_or(host);
    let domain = match target.port() {
        Some(port) => format!("{host}_{port}"),
        None => host.to_string(),
    };
    format!(
        "{}_{}_{}",
        prefix,
        sanitize_filename(&domain),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Fetches the target page. Any failure here ends the session.
pub fn fetch_page(fetcher: &dyn Fetcher, target: &Url) -> Result<PageFetchResult> {
    let response = fetcher
        .get(target.as_str())
        .with_context(|| format!("failed to fetch {target}"))?;
    let final_url = Url::parse(&response.final_url).unwrap_or_else(|_| target.clone());
    tracing::info!(
        status = response.status,
        bytes = response.body.len(),
        "fetched page {}",
        final_url
    );
    Ok(PageFetchResult {
        base_url: target.clone(),
        final_url,
        body: response.body,
        content_type: response.content_type,
    })
}

/// Runs a whole session against `target`.
///
/// Fatal: page fetch failure and output directory creation failure (no
/// manifest is written). Everything per-asset is recorded in the manifest.
pub async fn run_session(
    target: &Url,
    fetcher: Arc<dyn Fetcher>,
    opts: &SessionOptions,
    progress_tx: Option<tokio::sync::mpsc::Sender<ProgressStats>>,
) -> Result<SessionReport> {
    let started_at = Local::now();

    let page = {
        let fetcher = Arc::clone(&fetcher);
        let target = target.clone();
        tokio::task::spawn_blocking(move || fetch_page(fetcher.as_ref(), &target))
            .await
            .context("page fetch task")??
    };

    let candidates = {
        let fetcher = Arc::clone(&fetcher);
        tokio::task::spawn_blocking(move || collector::collect_assets(&page, fetcher.as_ref()))
            .await
            .context("asset discovery task")?
    };

    let output_dir = opts
        .output_parent
        .join(output_dir_name(&opts.prefix, target, started_at));
    let sink = Arc::new(FilesystemSink::create(&output_dir)?);

    let mut manifest =
        SessionManifest::new(target.as_str(), started_at.with_timezone(&Utc), &output_dir);
    manifest.record_candidates(&candidates);

    let outcomes =
        scheduler::run_downloads(candidates, fetcher, Arc::clone(&sink), opts.concurrency, progress_tx)
            .await?;
    for outcome in &outcomes {
        manifest.record(outcome);
    }

    let manifest_path = write_manifest(&manifest, sink.root())?;
    Ok(SessionReport {
        output_dir,
        manifest_path,
        summary: manifest.summary(),
    })
}

fn write_manifest(manifest: &SessionManifest, dir: &Path) -> Result<PathBuf> {
    manifest
        .write(dir)
        .with_context(|| format!("manifest for {}", manifest.target_url))
}
