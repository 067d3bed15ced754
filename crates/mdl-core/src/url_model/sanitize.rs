//! Filesystem-safe filename sanitization.

/// Longest filename we produce; leaves room for `_N` disambiguators and the `.part` suffix.
const MAX_NAME_BYTES: usize = 200;

/// Sanitizes a candidate filename for saving on disk.
///
/// - Replaces every character outside `[A-Za-z0-9._-]` with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores (no hidden files, no `..`)
/// - Limits length to `MAX_NAME_BYTES`, keeping the extension
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let keep = c.is_ascii_alphanumeric() || matches!(c, '.' | '-');
        if keep {
            out.push(c);
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.len() <= MAX_NAME_BYTES {
        return trimmed.to_string();
    }

    // Output is pure ASCII, so byte slicing is safe.
    match trimmed.rsplit_once('.') {
        Some((stem, ext)) if ext.len() < 16 => {
            let keep = MAX_NAME_BYTES - ext.len() - 1;
            format!("{}.{}", &stem[..keep.min(stem.len())], ext)
        }
        _ => trimmed[..MAX_NAME_BYTES].to_string(),
    }
}
