//! Regex helpers shared by the analyzers.
//!
//! Analyzers scan raw markup rather than a parsed DOM. All patterns are
//! compiled once.

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static NON_VISIBLE_BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<noscript\b.*?</noscript\s*>|<template\b.*?</template\s*>",
    )
    .expect("valid regex")
});

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

/// Build a case-insensitive pattern matching openings of any of `tags`.
///
/// `<div`, `<DIV class=...>` and `<div/>` match; `</div>` and `<divider>` do not.
pub(crate) fn tag_opening_pattern(tags: &[&str]) -> Regex {
    let alternation = tags
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)<(?:{})(?:[\s>/]|$)", alternation)).expect("valid regex")
}

/// Number of non-overlapping matches of `pattern` in `html`.
pub(crate) fn count_matches(pattern: &Regex, html: &str) -> usize {
    pattern.find_iter(html).count()
}

/// Text a reader would see: scripts, styles, comments and tags removed,
/// whitespace collapsed.
pub(crate) fn visible_text(html: &str) -> String {
    let without_comments = COMMENTS.replace_all(html, " ");
    let without_blocks = NON_VISIBLE_BLOCKS.replace_all(&without_comments, " ");
    let without_tags = TAGS.replace_all(&without_blocks, " ");
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Format a ratio as a whole percentage.
pub(crate) fn percent(ratio: f64) -> u32 {
    (ratio * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_opening_pattern_matches_openings_only() {
        let re = tag_opening_pattern(&["div", "span"]);
        let html = "<div><DIV class='a'><span/></div></DIV><divider><spanner>";
        assert_eq!(count_matches(&re, html), 3);
    }

    #[test]
    fn test_tag_opening_pattern_at_end_of_input() {
        let re = tag_opening_pattern(&["main"]);
        assert_eq!(count_matches(&re, "<p>x</p><main"), 1);
    }

    #[test]
    fn test_visible_text_strips_scripts_and_tags() {
        let html = r#"<html><head><style>body{}</style><script>var x = "<p>";</script></head>
            <body><!-- hidden --><h1>Hello</h1>
            <p>World  <b>again</b></p><noscript>Enable JS</noscript></body></html>"#;
        assert_eq!(visible_text(html), "Hello World again");
    }

    #[test]
    fn test_visible_text_empty() {
        assert_eq!(visible_text(""), "");
        assert_eq!(visible_text("<div></div>"), "");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.9), 90);
        assert_eq!(percent(0.456), 46);
        assert_eq!(percent(0.0), 0);
    }
}
