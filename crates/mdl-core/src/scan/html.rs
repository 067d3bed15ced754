//! HTML scanner.
//!
//! Collects media references from attributes of media-bearing tags, hands
//! inline CSS (`<style>` bodies and `style` attributes) to the CSS scanner and
//! inline scripts to the JS scanner, and reports the external stylesheets and
//! scripts the collector must fetch next.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::css::{scan_css_imports, scan_css_urls};
use super::js::scan_js;
use super::{RawCandidate, SourceContext};

static ALL_ELEMENTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("*").expect("universal selector"));

/// Tags whose attributes may point at media.
const MEDIA_TAGS: &[&str] = &["img", "video", "audio", "source", "link"];

/// Attributes read on media tags. `srcset` is split into its URL parts.
const MEDIA_ATTRS: &[&str] = &["src", "href", "data-src", "poster", "srcset"];

/// Everything the HTML scanner found in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlScan {
    /// Media candidates in document order, tagged with the scanner that found them.
    pub candidates: Vec<RawCandidate>,
    /// `<link rel="stylesheet">` targets plus `@import` targets of inline styles.
    pub stylesheets: Vec<String>,
    /// `<script src>` targets.
    pub scripts: Vec<String>,
    /// First `<base href>`, which overrides the document URL for resolution.
    pub base_href: Option<String>,
}

/// URL parts of a `srcset` value, ignoring width/density descriptors.
///
/// `"a.jpg 1x, b.jpg 2x"` → `["a.jpg", "b.jpg"]`.
pub fn parse_srcset(srcset: &str) -> Vec<String> {
    srcset
        .split(',')
        .filter_map(|part| part.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn is_stylesheet_link(el: &ElementRef<'_>) -> bool {
    el.value().attr("rel").is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|r| r.eq_ignore_ascii_case("stylesheet"))
    })
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// Scan one HTML document.
pub fn scan_html(html: &str) -> HtmlScan {
    let document = Html::parse_document(html);
    let mut scan = HtmlScan::default();

    for el in document.select(&ALL_ELEMENTS) {
        let name = el.value().name();

        if MEDIA_TAGS.contains(&name) {
            for attr in MEDIA_ATTRS {
                let Some(value) = el.value().attr(attr) else {
                    continue;
                };
                if *attr == "srcset" {
                    scan.candidates.extend(
                        parse_srcset(value)
                            .into_iter()
                            .map(|u| RawCandidate::new(u, SourceContext::Html)),
                    );
                } else if let Some(value) = non_empty(value) {
                    scan.candidates
                        .push(RawCandidate::new(value, SourceContext::Html));
                }
            }
        }

        if let Some(style) = el.value().attr("style") {
            scan.candidates.extend(
                scan_css_urls(style)
                    .into_iter()
                    .map(|u| RawCandidate::new(u, SourceContext::Css)),
            );
        }

        match name {
            "link" if is_stylesheet_link(&el) => {
                if let Some(href) = el.value().attr("href").and_then(non_empty) {
                    scan.stylesheets.push(href.to_string());
                }
            }
            "style" => {
                let body: String = el.text().collect();
                scan.candidates.extend(
                    scan_css_urls(&body)
                        .into_iter()
                        .map(|u| RawCandidate::new(u, SourceContext::Css)),
                );
                scan.stylesheets.extend(scan_css_imports(&body));
            }
            "script" => match el.value().attr("src").and_then(non_empty) {
                Some(src) => scan.scripts.push(src.to_string()),
                None => {
                    let body: String = el.text().collect();
                    scan.candidates.extend(
                        scan_js(&body)
                            .into_iter()
                            .map(|u| RawCandidate::new(u, SourceContext::Js)),
                    );
                }
            },
            "base" if scan.base_href.is_none() => {
                scan.base_href = el.value().attr("href").and_then(non_empty).map(str::to_string);
            }
            _ => {}
        }
    }

    scan
}
