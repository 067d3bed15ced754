//! Filename and extension extraction from URL path.

use url::Url;

/// Extracts the last non-empty path segment of `url` for use as a filename hint.
///
/// The query string and fragment are never part of the result. Returns `None`
/// if the path is empty/root or the segment is `.`/`..`.
pub fn filename_from_url_path(url: &Url) -> Option<&str> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}

/// Lowercased extension of the last path segment (`IMG.PNG` → `png`), if any.
pub fn extension_from_url(url: &Url) -> Option<String> {
    let name = filename_from_url_path(url)?;
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
