//! URL modeling: reference normalization and filename derivation.
//!
//! Turns raw references found in page content into absolute http(s) URLs and
//! derives safe local filenames from their last path segment.

mod normalize;
mod path;
mod sanitize;

pub use normalize::{normalize, parse_target};
pub use path::{extension_from_url, filename_from_url_path};
pub use sanitize::sanitize_filename;

use url::Url;

/// Default filename when the URL path yields nothing usable.
const DEFAULT_FILENAME: &str = "file";

/// Derives a safe filename for saving an asset from the last path segment of `url`.
///
/// # Examples
///
/// - `https://example.com/img/photo.jpg?w=300` → `"photo.jpg"`
/// - `https://example.com/my%20pic.png` → `"my_20pic.png"`
pub fn derive_filename(url: &Url) -> String {
    let Some(raw) = filename_from_url_path(url) else {
        return DEFAULT_FILENAME.to_string();
    };
    let sanitized = sanitize_filename(raw);
    if sanitized.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
