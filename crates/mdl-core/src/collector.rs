//! Asset collector: runs the scanners over a page and the stylesheets and
//! scripts it links, then merges, deduplicates and classifies the results.
//!
//! Discovery order is: page candidates (document order), then stylesheet
//! candidates (breadth-first over links and `@import`s), then script
//! candidates. The first occurrence of a URL wins, keeping its source tag.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet, VecDeque};
use url::Url;

use crate::category::Category;
use crate::fetch::Fetcher;
use crate::scan::{self, RawCandidate, SourceContext};
use crate::url_model::normalize;

/// At most this many linked stylesheets (including `@import`s) are fetched per page.
pub const MAX_LINKED_STYLESHEETS: usize = 64;
/// At most this many external scripts are fetched per page.
pub const MAX_LINKED_SCRIPTS: usize = 64;

/// The fetched target page.
#[derive(Debug, Clone)]
pub struct PageFetchResult {
    /// URL that was requested.
    pub base_url: Url,
    /// URL after redirects; relative references on the page resolve against it.
    pub final_url: Url,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl PageFetchResult {
    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// A discovered media asset. Two references are equal when their URLs are.
#[derive(Debug, Clone)]
pub struct AssetReference {
    pub url: Url,
    pub category: Category,
    pub source: SourceContext,
}

impl PartialEq for AssetReference {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for AssetReference {}

/// Insertion-ordered set of assets, unique by URL.
#[derive(Debug, Clone, Default)]
pub struct AssetCandidateSet {
    items: Vec<AssetReference>,
    seen: HashSet<Url>,
}

impl AssetCandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `asset` unless its URL is already present. Returns whether it was added.
    pub fn insert(&mut self, asset: AssetReference) -> bool {
        if !self.seen.insert(asset.url.clone()) {
            return false;
        }
        self.items.push(asset);
        true
    }

    /// Normalizes `raw` against `base`, classifies it and inserts it if it is media.
    pub fn offer(&mut self, raw: &str, base: &Url, source: SourceContext) -> bool {
        let Some(url) = normalize(raw, base) else {
            return false;
        };
        if self.seen.contains(&url) {
            return false;
        }
        let category = Category::from_url(&url);
        if !category.is_media() {
            return false;
        }
        self.insert(AssetReference {
            url,
            category,
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetReference> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<AssetReference> {
        self.items
    }

    /// Number of assets per category.
    pub fn counts_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for asset in &self.items {
            *counts.entry(asset.category).or_insert(0) += 1;
        }
        counts
    }
}

impl FromIterator<AssetReference> for AssetCandidateSet {
    fn from_iter<I: IntoIterator<Item = AssetReference>>(iter: I) -> Self {
        let mut set = Self::new();
        for asset in iter {
            set.insert(asset);
        }
        set
    }
}

fn offer_all(set: &mut AssetCandidateSet, raws: &[RawCandidate], base: &Url) {
    for raw in raws {
        set.offer(&raw.value, base, raw.source);
    }
}

fn resolve_all(refs: &[String], base: &Url) -> Vec<Url> {
    refs.iter().filter_map(|r| normalize(r, base)).collect()
}

/// Fetches a linked text resource. Failures are logged and yield `None`.
fn fetch_text(fetcher: &dyn Fetcher, url: &Url, kind: &str) -> Option<(Url, String)> {
    match fetcher.get(url.as_str()) {
        Ok(resp) => {
            let final_url = Url::parse(&resp.final_url).unwrap_or_else(|_| url.clone());
            let text = String::from_utf8_lossy(&resp.body).into_owned();
            tracing::debug!(url = %url, bytes = resp.body.len(), "fetched linked {}", kind);
            Some((final_url, text))
        }
        Err(e) => {
            tracing::warn!(url = %url, "skipping linked {}: {}", kind, e);
            None
        }
    }
}

/// Fetches stylesheets breadth-first, following `@import`s, each URL at most once.
fn collect_stylesheets(set: &mut AssetCandidateSet, roots: Vec<Url>, fetcher: &dyn Fetcher) {
    let mut visited: HashSet<Url> = HashSet::new();
    let mut queue: VecDeque<Url> = VecDeque::new();
    for url in roots {
        if visited.insert(url.clone()) {
            queue.push_back(url);
        }
    }

    let mut fetched = 0usize;
    while let Some(url) = queue.pop_front() {
        if fetched >= MAX_LINKED_STYLESHEETS {
            tracing::warn!(
                skipped = queue.len() + 1,
                "linked stylesheet limit ({}) reached",
                MAX_LINKED_STYLESHEETS
            );
            break;
        }
        fetched += 1;
        let Some((base, css)) = fetch_text(fetcher, &url, "stylesheet") else {
            continue;
        };
        for raw in scan::scan_css_urls(&css) {
            set.offer(&raw, &base, SourceContext::Css);
        }
        for import in resolve_all(&scan::scan_css_imports(&css), &base) {
            if visited.insert(import.clone()) {
                queue.push_back(import);
            }
        }
    }
}

fn collect_scripts(set: &mut AssetCandidateSet, scripts: Vec<Url>, fetcher: &dyn Fetcher) {
    let mut visited: HashSet<Url> = HashSet::new();
    let unique: Vec<Url> = scripts
        .into_iter()
        .filter(|u| visited.insert(u.clone()))
        .collect();
    if unique.len() > MAX_LINKED_SCRIPTS {
        tracing::warn!(
            skipped = unique.len() - MAX_LINKED_SCRIPTS,
            "linked script limit ({}) reached",
            MAX_LINKED_SCRIPTS
        );
    }
    for url in unique.into_iter().take(MAX_LINKED_SCRIPTS) {
        let Some((base, js)) = fetch_text(fetcher, &url, "script") else {
            continue;
        };
        for raw in scan::scan_js(&js) {
            set.offer(&raw, &base, SourceContext::Js);
        }
    }
}

/// Discovers every media asset referenced by `page`, fetching its linked
/// stylesheets and scripts through `fetcher`. Never fails: unreachable linked
/// resources are skipped.
pub fn collect_assets(page: &PageFetchResult, fetcher: &dyn Fetcher) -> AssetCandidateSet {
    let html = page.text();
    let found = scan::scan_html(&html);

    let base = found
        .base_href
        .as_deref()
        .and_then(|href| normalize(href, &page.final_url))
        .unwrap_or_else(|| page.final_url.clone());

    let mut set = AssetCandidateSet::new();
    offer_all(&mut set, &found.candidates, &base);
    tracing::debug!(
        candidates = set.len(),
        stylesheets = found.stylesheets.len(),
        scripts = found.scripts.len(),
        "scanned page {}",
        page.final_url
    );

    collect_stylesheets(&mut set, resolve_all(&found.stylesheets, &base), fetcher);
    collect_scripts(&mut set, resolve_all(&found.scripts, &base), fetcher);

    tracing::info!("discovered {} media assets on {}", set.len(), page.final_url);
    set
}
