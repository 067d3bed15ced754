//! CSS scanner: `url(...)` references and `@import` targets.

use regex::Regex;
use std::sync::LazyLock;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("css comment regex"));

/// `url("x")`, `url('x')` or `url(x)`.
static URL_FN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^"'()\s]+))\s*\)"#).expect("css url regex")
});

/// `@import "x.css"`, `@import 'x.css'` or `@import url(x.css)`.
static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)@import\s+(?:url\(\s*["']?([^"')\s]+)["']?\s*\)|"([^"]+)"|'([^']+)')"#)
        .expect("css import regex")
});

fn strip_comments(css: &str) -> std::borrow::Cow<'_, str> {
    COMMENT.replace_all(css, " ")
}

fn first_group(caps: &regex::Captures<'_>) -> Option<String> {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str().trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Every `url(...)` argument in `css`, in order of appearance.
///
/// Works on stylesheets, `<style>` bodies and `style="..."` attribute values.
pub fn scan_css_urls(css: &str) -> Vec<String> {
    let css = strip_comments(css);
    URL_FN
        .captures_iter(&css)
        .filter_map(|caps| first_group(&caps))
        .collect()
}

/// Every `@import` target in `css`, in order of appearance.
pub fn scan_css_imports(css: &str) -> Vec<String> {
    let css = strip_comments(css);
    IMPORT
        .captures_iter(&css)
        .filter_map(|caps| first_group(&caps))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_quote_styles() {
        let css = r#"
            .a { background: url('../imgs/c.gif') no-repeat; }
            .b { background-image: url("/bg.png"); }
            .c { background: URL( plain.webp ); }
        "#;
        assert_eq!(scan_css_urls(css), vec!["../imgs/c.gif", "/bg.png", "plain.webp"]);
    }

    #[test]
    fn multiple_urls_in_one_declaration() {
        let css = "src: url(a.woff2) format('woff2'), url(b.woff) format('woff');\
                   background: url(x.png), url(y.jpg);";
        assert_eq!(scan_css_urls(css), vec!["a.woff2", "b.woff", "x.png", "y.jpg"]);
    }

    #[test]
    fn ignores_comments_and_empty() {
        let css = "/* url(old.png) */ .x { background: url(''); } .y { background: url(new.png) }";
        assert_eq!(scan_css_urls(css), vec!["new.png"]);
    }

    #[test]
    fn data_uris_are_returned_raw() {
        // Filtering pseudo-schemes is the normalizer's job.
        let css = ".i { background: url(data:image/png;base64,AAAA) }";
        assert_eq!(scan_css_urls(css), vec!["data:image/png;base64,AAAA"]);
    }

    #[test]
    fn imports_all_forms() {
        let css = r#"
            @import "base.css";
            @import 'theme.css' screen;
            @import url(print.css) print;
            @IMPORT url("fonts.css");
        "#;
        assert_eq!(
            scan_css_imports(css),
            vec!["base.css", "theme.css", "print.css", "fonts.css"]
        );
    }
}
