//! Hydration analyzer: how much content exists before client-side scripts run.

use once_cell::sync::Lazy;
use regex::Regex;

use agentrank_protocols::{Analyzer, AnalyzerContext, Signal, SignalResult, SignalStatus};

use super::markup::{percent, visible_text};

/// Mount points and attributes left behind by client-side frameworks.
static SPA_SHELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bid\s*=\s*["'](?:root|app|__next)["']|\bng-version\b|\bdata-reactroot\b"#)
        .expect("valid regex")
});

const SERVER_RENDERED: f64 = 0.70;
const MOSTLY_SERVER_RENDERED: f64 = 0.40;
const PARTIALLY_SERVER_RENDERED: f64 = 0.15;

/// Below this many visible characters a framework shell counts as empty.
const THIN_SHELL_CHARS: usize = 200;

pub struct HydrationAnalyzer {
    weight: u8,
}

impl HydrationAnalyzer {
    pub fn new(weight: u8) -> Self {
        Self { weight }
    }

    fn result(&self, status: SignalStatus, score: u8, detail: impl Into<String>) -> SignalResult {
        SignalResult::new(Signal::Hydration, self.weight, status, score, detail)
    }

    /// Share of rendered text already present in the initial response, capped at 1.
    pub fn server_text_ratio(initial_html: &str, rendered_html: &str) -> f64 {
        let rendered = visible_text(rendered_html).chars().count();
        if rendered == 0 {
            return 1.0;
        }
        let initial = visible_text(initial_html).chars().count();
        (initial as f64 / rendered as f64).min(1.0)
    }

    fn compare(&self, initial_html: &str, rendered_html: &str) -> SignalResult {
        let ratio = Self::server_text_ratio(initial_html, rendered_html);
        let detail = format!(
            "{}% of rendered text is present before scripts run",
            percent(ratio)
        );

        if ratio >= SERVER_RENDERED {
            return self.result(SignalStatus::Pass, 100, detail);
        }

        if ratio >= MOSTLY_SERVER_RENDERED {
            return self
                .result(SignalStatus::Pass, 80, detail)
                .with_recommendations(["Server-render the remaining client-only sections"]);
        }

        if ratio >= PARTIALLY_SERVER_RENDERED {
            return self
                .result(SignalStatus::Warn, 50, detail)
                .with_recommendations([
                    "Enable server-side rendering or static generation for primary content",
                    "Avoid loading core text through client-side API calls after page load",
                ]);
        }

        self.result(SignalStatus::Fail, 10, detail).with_recommendations([
            "Enable server-side rendering or static generation for primary content",
            "Avoid loading core text through client-side API calls after page load",
            "Provide a <noscript> fallback or prerendered snapshot for agents",
        ])
    }

    fn inspect_rendered(&self, rendered_html: &str) -> SignalResult {
        let chars = visible_text(rendered_html).chars().count();
        if SPA_SHELL.is_match(rendered_html) && chars < THIN_SHELL_CHARS {
            return self
                .result(
                    SignalStatus::Warn,
                    50,
                    format!(
                        "Client-rendered application shell with only {} characters of text",
                        chars
                    ),
                )
                .with_recommendations([
                    "Enable server-side rendering or static generation for primary content",
                ]);
        }

        self.result(
            SignalStatus::Pass,
            100,
            format!(
                "Initial response unavailable for comparison; rendered page has {} characters of text",
                chars
            ),
        )
    }
}

impl Default for HydrationAnalyzer {
    fn default() -> Self {
        Self::new(Signal::Hydration.default_weight())
    }
}

impl Analyzer for HydrationAnalyzer {
    fn signal(&self) -> Signal {
        Signal::Hydration
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

        match ctx.initial_html.as_deref() {
            Some(initial) => self.compare(initial, &ctx.html),
            None => self.inspect_rendered(&ctx.html),
        }
    }
}

#[cfg(test)]
#[path = "hydration_tests.rs"]
mod tests;
