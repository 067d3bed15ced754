//! Content scanners: pure functions from text to raw candidate references.
//!
//! Scanners never resolve or classify what they find; the collector does that.
//! Every scanner is heuristic pattern matching over text and can be refined in
//! isolation from fetching and downloading.

pub mod css;
pub mod html;
pub mod js;

pub use css::{scan_css_imports, scan_css_urls};
pub use html::{scan_html, HtmlScan};
pub use js::scan_js;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which scanner found a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceContext {
    Html,
    Css,
    Js,
}

impl SourceContext {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceContext::Html => "html",
            SourceContext::Css => "css",
            SourceContext::Js => "js",
        }
    }
}

impl fmt::Display for SourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unresolved reference plus the scanner that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub value: String,
    pub source: SourceContext,
}

impl RawCandidate {
    pub fn new(value: impl Into<String>, source: SourceContext) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }
}
