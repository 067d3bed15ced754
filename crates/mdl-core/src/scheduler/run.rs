//! Bounded worker pool over the candidate set.
//!
//! Keeps up to `concurrency` downloads in flight; when one finishes, the next
//! queued asset is started until the queue is empty. The joining loop is the
//! only writer of the outcome list and the progress counter.

use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::checksum::sha256_hex;
use crate::collector::{AssetCandidateSet, AssetReference};
use crate::fetch::Fetcher;
use crate::storage::FilesystemSink;

use super::outcome::DownloadOutcome;
use super::progress::ProgressStats;

/// Default worker pool size.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Fetch and store one asset. Runs on a blocking thread.
fn fetch_and_store(
    asset: AssetReference,
    fetcher: &dyn Fetcher,
    sink: &FilesystemSink,
    started: Instant,
) -> DownloadOutcome {
    let response = match fetcher.get(asset.url.as_str()) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(url = %asset.url, "download failed: {}", e);
            return DownloadOutcome::failed(asset, e.to_string(), None, started.elapsed());
        }
    };

    if response.body.is_empty() {
        tracing::warn!(url = %asset.url, "download returned an empty body");
        return DownloadOutcome::failed(
            asset,
            "empty response body",
            response.content_type,
            started.elapsed(),
        );
    }

    match sink.store(asset.category, &asset.url, &response.body) {
        Ok(stored) => {
            let digest = sha256_hex(&response.body);
            DownloadOutcome::succeeded(
                asset,
                stored.relative_path,
                stored.bytes,
                response.content_type,
                digest,
                started.elapsed(),
            )
        }
        Err(e) => {
            tracing::warn!(url = %asset.url, "storing download failed: {:#}", e);
            DownloadOutcome::failed(asset, format!("{e:#}"), response.content_type, started.elapsed())
        }
    }
}

/// Runs one download on the blocking pool. A panicking worker still yields a failed outcome.
async fn download_one(
    asset: AssetReference,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<FilesystemSink>,
) -> DownloadOutcome {
    let started = Instant::now();
    let fallback = asset.clone();
    match tokio::task::spawn_blocking(move || {
        fetch_and_store(asset, fetcher.as_ref(), &sink, started)
    })
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(url = %fallback.url, "download worker failed: {}", e);
            DownloadOutcome::failed(
                fallback,
                format!("download worker failed: {e}"),
                None,
                started.elapsed(),
            )
        }
    }
}

async fn send_progress(
    tx: &Option<tokio::sync::mpsc::Sender<ProgressStats>>,
    stats: &ProgressStats,
) {
    if let Some(tx) = tx {
        let _ = tx.send(stats.clone()).await;
    }
}

/// Downloads every asset in `candidates` with at most `concurrency` in flight.
///
/// Returns one outcome per candidate, in discovery order (completion order
/// varies between runs, discovery order does not). After each completion a
/// [`ProgressStats`] snapshot is sent on `progress_tx` if given. Returns only
/// after every worker has finished.
pub async fn run_downloads(
    candidates: AssetCandidateSet,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<FilesystemSink>,
    concurrency: usize,
    progress_tx: Option<tokio::sync::mpsc::Sender<ProgressStats>>,
) -> Result<Vec<DownloadOutcome>> {
    let max_concurrent = concurrency.max(1);
    let total = candidates.len();
    let assets = candidates.into_vec();
    let mut queue = assets.clone().into_iter().enumerate();
    let mut slots: Vec<Option<DownloadOutcome>> = (0..total).map(|_| None).collect();
    let mut stats = ProgressStats::new(total);
    let download_start = Instant::now();
    let mut join_set = tokio::task::JoinSet::new();

    tracing::info!(total, max_concurrent, "starting downloads");

    loop {
        while join_set.len() < max_concurrent {
            let Some((index, asset)) = queue.next() else {
                break;
            };
            let fetcher = Arc::clone(&fetcher);
            let sink = Arc::clone(&sink);
            join_set.spawn(async move { (index, download_one(asset, fetcher, sink).await) });
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        stats.completed += 1;
        stats.elapsed_secs = download_start.elapsed().as_secs_f64();
        // `download_one` turns worker panics into outcomes, so this only fires if the
        // task itself was cancelled; its slot is filled after the loop.
        let (index, outcome) = match res {
            Ok(done) => done,
            Err(e) => {
                tracing::error!("download task lost: {}", e);
                stats.failed += 1;
                send_progress(&progress_tx, &stats).await;
                continue;
            }
        };

        if outcome.is_success() {
            stats.succeeded += 1;
            stats.bytes_done += outcome.bytes;
        } else {
            stats.failed += 1;
        }
        tracing::debug!(
            completed = stats.completed,
            total,
            ok = outcome.is_success(),
            "finished {}",
            outcome.asset.url
        );
        send_progress(&progress_tx, &stats).await;
        slots[index] = Some(outcome);
    }

    let outcomes: Vec<DownloadOutcome> = slots
        .into_iter()
        .zip(assets)
        .map(|(slot, asset)| {
            slot.unwrap_or_else(|| {
                DownloadOutcome::failed(asset, "download task lost", None, Duration::ZERO)
            })
        })
        .collect();
    tracing::info!(
        succeeded = stats.succeeded,
        failed = stats.failed,
        "downloads finished in {:.1}s",
        download_start.elapsed().as_secs_f64()
    );
    Ok(outcomes)
}
