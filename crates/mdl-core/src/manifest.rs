//! Session manifest: the persisted record of one download session.
//!
//! Built at session start, filled as outcomes arrive, and written once as
//! `manifest.json` after the worker pool has drained.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::category::Category;
use crate::collector::AssetCandidateSet;
use crate::scan::SourceContext;
use crate::scheduler::DownloadOutcome;

pub const MANIFEST_FILENAME: &str = "manifest.json";

/// One attempted download as recorded in the manifest.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestItem {
    pub url: String,
    pub category: Category,
    pub source: SourceContext,
    pub path: Option<String>,
    pub success: bool,
    pub error: Option<String>,
    pub bytes: u64,
    pub content_type: Option<String>,
    pub sha256: Option<String>,
    pub duration_ms: u64,
}

impl From<&DownloadOutcome> for ManifestItem {
    fn from(o: &DownloadOutcome) -> Self {
        Self {
            url: o.asset.url.to_string(),
            category: o.asset.category,
            source: o.asset.source,
            path: o.path.clone(),
            success: o.is_success(),
            error: o.error.clone(),
            bytes: o.bytes,
            content_type: o.content_type.clone(),
            sha256: o.sha256.clone(),
            duration_ms: o.duration.as_millis() as u64,
        }
    }
}

/// Counts shown to the user at the end of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub total_candidates: usize,
    pub saved: usize,
    pub errors: usize,
    pub saved_by_category: BTreeMap<Category, usize>,
}

impl SessionSummary {
    /// Percentage of attempted downloads that succeeded; `None` when nothing was attempted.
    pub fn success_rate(&self) -> Option<f64> {
        let attempted = self.saved + self.errors;
        (attempted > 0).then(|| self.saved as f64 / attempted as f64 * 100.0)
    }
}

/// Record of one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionManifest {
    pub target_url: String,
    /// RFC 3339, UTC.
    pub started_at: DateTime<Utc>,
    pub output_dir: PathBuf,
    pub total_candidates: usize,
    pub candidates_by_category: BTreeMap<Category, usize>,
    pub saved_by_category: BTreeMap<Category, usize>,
    pub saved: usize,
    pub errors: usize,
    pub items: Vec<ManifestItem>,
}

impl SessionManifest {
    pub fn new(target_url: &str, started_at: DateTime<Utc>, output_dir: &Path) -> Self {
        Self {
            target_url: target_url.to_string(),
            started_at,
            output_dir: output_dir.to_path_buf(),
            total_candidates: 0,
            candidates_by_category: BTreeMap::new(),
            saved_by_category: BTreeMap::new(),
            saved: 0,
            errors: 0,
            items: Vec::new(),
        }
    }

    /// Record what discovery found.
    pub fn record_candidates(&mut self, candidates: &AssetCandidateSet) {
        self.total_candidates = candidates.len();
        self.candidates_by_category = candidates.counts_by_category();
    }

    /// Append one outcome and update the counters.
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        if outcome.is_success() {
            self.saved += 1;
            *self
                .saved_by_category
                .entry(outcome.asset.category)
                .or_insert(0) += 1;
        } else {
            self.errors += 1;
        }
        self.items.push(ManifestItem::from(outcome));
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total_candidates: self.total_candidates,
            saved: self.saved,
            errors: self.errors,
            saved_by_category: self.saved_by_category.clone(),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize manifest")
    }

    /// Write `manifest.json` into `dir` and return its path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILENAME);
        let json = self.to_json()?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write manifest {}", path.display()))?;
        tracing::info!(
            saved = self.saved,
            errors = self.errors,
            "manifest written to {}",
            path.display()
        );
        Ok(path)
    }
}
