use super::*;

fn analyze(html: &str) -> SignalResult {
    AccessibilityAnalyzer::default().analyze(&AnalyzerContext::new("https://example.com", html))
}

#[test]
fn test_no_markup_fails() {
    let result = analyze("  ");
    assert_eq!(result.status, SignalStatus::Fail);
    assert_eq!(result.score, 0);
}

#[test]
fn test_no_interactive_elements_passes() {
    let result = analyze("<main><p>Just text</p></main>");
    assert_eq!(result.status, SignalStatus::Pass);
    assert_eq!(result.score, 100);
}

#[test]
fn test_fully_labelled_page_passes() {
    let html = r#"
        <a href="/about">About</a>
        <button aria-label="Close"><svg></svg></button>
        <img src="logo.png" alt="">
        <label for="email">Email</label><input id="email" type="email">
        <input type="hidden" name="csrf" value="x">
        <textarea placeholder="Message"></textarea>
        <select title="Country"></select>
        <input type="submit" value="Send">
    "#;
    let result = analyze(html);
    assert_eq!(result.status, SignalStatus::Pass);
    assert_eq!(result.score, 100);
    assert!(result.detail.starts_with("7/7"));
}

#[test]
fn test_link_named_by_nested_image_alt() {
    let result = analyze(r#"<a href="/"><img src="home.png" alt="Home"></a>"#);
    // anchor and nested image are both named
    assert!(result.detail.starts_with("2/2"));
}

#[test]
fn test_good_coverage_passes_partial() {
    // 3 of 4 named -> 75%
    let html = r#"<a href="/a">A</a><a href="/b">B</a><button>Go</button><button class="icon"></button>"#;
    let result = analyze(html);
    assert_eq!(result.status, SignalStatus::Pass);
    assert_eq!(result.score, 80);
    assert_eq!(result.recommendations.len(), 1);
    assert!(result.detail.contains("unnamed: 1 button"));
}

#[test]
fn test_partial_coverage_warns() {
    // 1 of 2 named
    let html = r#"<input type="text" name="q"><button>Search</button>"#;
    let result = analyze(html);
    assert_eq!(result.status, SignalStatus::Warn);
    assert_eq!(result.score, 50);
    assert_eq!(result.recommendations.len(), 3);
}

#[test]
fn test_poor_coverage_fails() {
    let html = r#"
        <button></button><button><i class="icon"></i></button>
        <a href="/x"></a><img src="a.png"><input name="q">
    "#;
    let result = analyze(html);
    assert_eq!(result.status, SignalStatus::Fail);
    assert_eq!(result.score, 20);
    assert_eq!(result.recommendations.len(), 4);
    assert!(result.detail.starts_with("0/5"));
}

#[test]
fn test_label_for_unknown_id_does_not_name_field() {
    let html = r#"<label for="other">Name</label><input id="name"><button>Ok</button>"#;
    let result = analyze(html);
    assert!(result.detail.starts_with("1/2"));
}

#[test]
fn test_attribute_parsing_handles_quote_styles() {
    let attrs = Attributes::parse(r#" ARIA-LABEL='Menu' data-x=1 disabled title="" "#);
    assert_eq!(attrs.get("aria-label"), Some("Menu"));
    assert_eq!(attrs.get("data-x"), Some("1"));
    assert!(attrs.has("disabled"));
    assert!(!attrs.non_empty("title"));
}

#[test]
fn test_coverage_is_monotonic() {
    let named = r#"<button>Ok</button>"#;
    let unnamed = r#"<button></button>"#;
    let mut last = 0;
    for n in 0..=4 {
        let html = format!("{}{}", named.repeat(n), unnamed.repeat(4 - n));
        let score = analyze(&html).score;
        assert!(score >= last);
        last = score;
    }
}

#[test]
fn test_idempotent() {
    let html = r#"<a href="/">Home</a><input name="q">"#;
    assert_eq!(analyze(html), analyze(html));
}
