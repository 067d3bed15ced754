//! Reference normalization against a base URL.

use anyhow::{Context, Result};
use url::Url;

/// Reference prefixes that never point at a downloadable asset.
const NON_ASSET_PREFIXES: &[&str] = &["data:", "javascript:", "mailto:", "about:", "blob:", "tel:"];

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Resolves `reference` against `base` into an absolute, fragment-free http(s) URL.
///
/// Returns `None` for references that are not real assets: empty strings,
/// anchor-only references (`#top`), `data:`/`javascript:`/`mailto:` and
/// similar pseudo-schemes, and anything that resolves to a non-http(s) scheme.
/// Protocol-relative (`//host/x`), root-relative (`/x`) and document-relative
/// (`x`, `../x`) references follow standard URL resolution.
pub fn normalize(reference: &str, base: &Url) -> Option<Url> {
    let reference = reference.trim();
    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }
    if NON_ASSET_PREFIXES
        .iter()
        .any(|p| has_prefix_ignore_case(reference, p))
    {
        return None;
    }

    let mut resolved = base.join(reference).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}

/// Parses the top-level target URL. It must be an absolute http(s) URL with a host.
pub fn parse_target(input: &str) -> Result<Url> {
    let input = input.trim();
    let url = Url::parse(input).with_context(|| format!("invalid URL: {input}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("unsupported URL scheme '{}': {input}", url.scheme());
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => anyhow::bail!("URL has no host: {input}"),
    }
    Ok(url)
}
