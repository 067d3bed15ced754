//! JS scanner: best-effort match of string literals naming media files.
//!
//! Does not parse or evaluate the script; any quoted literal whose content ends
//! in a recognized media extension (optionally followed by a query string) is a
//! candidate.

use regex::Regex;
use std::sync::LazyLock;

use crate::category::all_media_extensions;

static MEDIA_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    let exts = all_media_extensions().collect::<Vec<_>>().join("|");
    let pattern = format!(
        r#"(?i)["'`]([^"'`\s<>]*?\.(?:{exts})(?:\?[^"'`\s<>]*)?)["'`]"#
    );
    Regex::new(&pattern).expect("js media literal regex")
});

/// Media-looking string literals in `script`, in order of appearance.
/// JSON-style escaped slashes (`\/`) are unescaped.
pub fn scan_js(script: &str) -> Vec<String> {
    MEDIA_LITERAL
        .captures_iter(script)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().replace("\\/", "/"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_assigned_and_argument_literals() {
        let js = r#"
            var hero = "/img/hero.JPG";
            loadVideo('https://cdn.example/v/intro.mp4?quality=hd');
            const track = `sounds/click.ogg`;
        "#;
        assert_eq!(
            scan_js(js),
            vec![
                "/img/hero.JPG",
                "https://cdn.example/v/intro.mp4?quality=hd",
                "sounds/click.ogg"
            ]
        );
    }

    #[test]
    fn ignores_non_media_literals() {
        let js = r#"var a = "app.js"; var b = 'style.css'; var c = "png"; var d = "a.pngx";"#;
        assert!(scan_js(js).is_empty());
    }

    #[test]
    fn unescapes_json_slashes() {
        let js = r#"window.__DATA__ = {"poster":"https:\/\/cdn.example\/p\/poster.webp"};"#;
        assert_eq!(scan_js(js), vec!["https://cdn.example/p/poster.webp"]);
    }

    #[test]
    fn adjacent_literals() {
        let js = r#"["a.png","b.gif"]"#;
        assert_eq!(scan_js(js), vec!["a.png", "b.gif"]);
    }

    #[test]
    fn longer_extensions_match_fully() {
        let js = r#"x("a.jpeg"); y('b.tiff'); z("c.mpeg")"#;
        assert_eq!(scan_js(js), vec!["a.jpeg", "b.tiff", "c.mpeg"]);
    }
}
