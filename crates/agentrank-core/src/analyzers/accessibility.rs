//! Accessibility analyzer: accessible-name coverage of interactive elements.

use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use agentrank_protocols::{Analyzer, AnalyzerContext, Signal, SignalResult, SignalStatus};

use super::markup::{percent, visible_text};

static ATTRIBUTES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#,
    )
    .expect("valid regex")
});

static CONTAINERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(a|button)\b([^>]*)>(.*?)</(?:a|button)\s*>").expect("valid regex")
});

static VOID_CONTROLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(img|input)\b([^>]*)>").expect("valid regex"));

static FIELD_OPENINGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(select|textarea)\b([^>]*)>").expect("valid regex"));

static LABELS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<label\b([^>]*)>").expect("valid regex"));

static NESTED_IMAGES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<img\b([^>]*)>").expect("valid regex"));

const FULL_COVERAGE: f64 = 0.90;
const GOOD_COVERAGE: f64 = 0.70;
const PARTIAL_COVERAGE: f64 = 0.40;

/// Attributes of one tag, names lowercased.
struct Attributes(Vec<(String, String)>);

impl Attributes {
    fn parse(raw: &str) -> Self {
        let pairs = ATTRIBUTES
            .captures_iter(raw)
            .map(|caps| {
                let name = caps[1].to_ascii_lowercase();
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                (name, value)
            })
            .collect();
        Self(pairs)
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn non_empty(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.trim().is_empty())
    }

    /// `aria-label`, `aria-labelledby` or `title`.
    fn has_explicit_name(&self) -> bool {
        ["aria-label", "aria-labelledby", "title"]
            .iter()
            .any(|name| self.non_empty(name))
    }
}

/// Element tally used in the detail string.
#[derive(Default)]
struct Coverage {
    named: usize,
    unnamed: BTreeMap<&'static str, usize>,
}

impl Coverage {
    fn record(&mut self, tag: &'static str, named: bool) {
        if named {
            self.named += 1;
        } else {
            *self.unnamed.entry(tag).or_default() += 1;
        }
    }

    fn total(&self) -> usize {
        self.named + self.unnamed.values().sum::<usize>()
    }

    fn ratio(&self) -> f64 {
        self.named as f64 / self.total() as f64
    }

    fn unnamed_summary(&self) -> String {
        self.unnamed
            .iter()
            .map(|(tag, count)| format!("{} {}", count, tag))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn tag_name(raw: &str) -> &'static str {
    match raw.to_ascii_lowercase().as_str() {
        "a" => "a",
        "button" => "button",
        "img" => "img",
        "input" => "input",
        "select" => "select",
        _ => "textarea",
    }
}

fn label_targets(html: &str) -> HashSet<String> {
    LABELS
        .captures_iter(html)
        .filter_map(|caps| {
            Attributes::parse(&caps[1])
                .get("for")
                .map(|v| v.trim().to_string())
        })
        .filter(|id| !id.is_empty())
        .collect()
}

fn field_is_named(attrs: &Attributes, labelled: &HashSet<String>) -> bool {
    attrs.has_explicit_name()
        || attrs.non_empty("placeholder")
        || attrs.get("id").is_some_and(|id| labelled.contains(id.trim()))
}

fn measure(html: &str) -> Coverage {
    let labelled = label_targets(html);
    let mut coverage = Coverage::default();

    for caps in CONTAINERS.captures_iter(html) {
        let attrs = Attributes::parse(&caps[2]);
        let inner = &caps[3];
        let named = attrs.has_explicit_name()
            || !visible_text(inner).is_empty()
            || NESTED_IMAGES
                .captures_iter(inner)
                .any(|img| Attributes::parse(&img[1]).non_empty("alt"));
        coverage.record(tag_name(&caps[1]), named);
    }

    for caps in VOID_CONTROLS.captures_iter(html) {
        let tag = tag_name(&caps[1]);
        let attrs = Attributes::parse(&caps[2]);
        let named = if tag == "img" {
            attrs.has("alt") || attrs.has_explicit_name()
        } else {
            let kind = attrs.get("type").unwrap_or("text").trim().to_ascii_lowercase();
            match kind.as_str() {
                "hidden" => continue,
                "submit" | "reset" | "button" => {
                    attrs.non_empty("value") || field_is_named(&attrs, &labelled)
                }
                "image" => attrs.non_empty("alt") || field_is_named(&attrs, &labelled),
                _ => field_is_named(&attrs, &labelled),
            }
        };
        coverage.record(tag, named);
    }

    for caps in FIELD_OPENINGS.captures_iter(html) {
        let attrs = Attributes::parse(&caps[2]);
        coverage.record(tag_name(&caps[1]), field_is_named(&attrs, &labelled));
    }

    coverage
}

pub struct AccessibilityAnalyzer {
    weight: u8,
}

impl AccessibilityAnalyzer {
    pub fn new(weight: u8) -> Self {
        Self { weight }
    }

    fn result(&self, status: SignalStatus, score: u8, detail: impl Into<String>) -> SignalResult {
        SignalResult::new(Signal::Accessibility, self.weight, status, score, detail)
    }
}

impl Default for AccessibilityAnalyzer {
    fn default() -> Self {
        Self::new(Signal::Accessibility.default_weight())
    }
}

impl Analyzer for AccessibilityAnalyzer {
    fn signal(&self) -> Signal {
        Signal::Accessibility
    }

    fn weight(&self) -> u8 {
        self.weight
    }

    fn analyze(&self, ctx: &AnalyzerContext) -> SignalResult {
        if !ctx.has_markup() {
            return self
                .result(SignalStatus::Fail, 0, "No HTML content to analyze")
                .with_recommendations(["Serve server-rendered HTML so agents have markup to read"]);
        }

        let coverage = measure(&ctx.html);
        if coverage.total() == 0 {
            return self.result(SignalStatus::Pass, 100, "No interactive elements to label");
        }

        let ratio = coverage.ratio();
        let mut detail = format!(
            "{}/{} interactive elements have an accessible name ({}%)",
            coverage.named,
            coverage.total(),
            percent(ratio)
        );
        if !coverage.unnamed.is_empty() {
            detail.push_str(&format!("; unnamed: {}", coverage.unnamed_summary()));
        }

        if ratio >= FULL_COVERAGE {
            return self.result(SignalStatus::Pass, 100, detail);
        }

        if ratio >= GOOD_COVERAGE {
            return self
                .result(SignalStatus::Pass, 80, detail)
                .with_recommendations(["Add aria-label or visible text to the remaining unnamed controls"]);
        }

        if ratio >= PARTIAL_COVERAGE {
            return self
                .result(SignalStatus::Warn, 50, detail)
                .with_recommendations([
                    "Give icon-only buttons and links an aria-label",
                    "Associate every form field with a <label for=...>",
                    "Add alt text to images",
                ]);
        }

        self.result(SignalStatus::Fail, 20, detail)
            .with_recommendations([
                "Give icon-only buttons and links an aria-label",
                "Associate every form field with a <label for=...>",
                "Add alt text to images, using alt=\"\" for decorative ones",
                "Use native <button> and <a href> elements so agents can identify actions",
            ])
    }
}

#[cfg(test)]
#[path = "accessibility_tests.rs"]
mod tests;
