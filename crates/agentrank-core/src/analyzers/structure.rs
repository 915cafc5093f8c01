//! Structure analyzer: semantic markup versus "div soup".

use once_cell::sync::Lazy;
use regex::Regex;

use agentrank_protocols::{Analyzer, AnalyzerContext, Signal, SignalResult, SignalStatus};

use super::markup::{count_matches, percent, tag_opening_pattern};

/// Tags that carry document semantics.
pub const SEMANTIC_TAGS: [&str; 12] = [
    "header", "nav", "main", "article", "section", "aside", "footer", "h1", "h2", "h3", "figure",
    "form",
];

/// Generic containers with no semantics.
pub const NON_SEMANTIC_TAGS: [&str; 2] = ["div", "span"];

static SEMANTIC: Lazy<Regex> = Lazy::new(|| tag_opening_pattern(&SEMANTIC_TAGS));
static NON_SEMANTIC: Lazy<Regex> = Lazy::new(|| tag_opening_pattern(&NON_SEMANTIC_TAGS));

const DIV_SOUP_THRESHOLD: f64 = 0.90;
const HEAVY_CONTAINER_THRESHOLD: f64 = 0.70;
const SEMANTIC_SHARE_TARGET: f64 = 0.50;

pub struct StructureAnalyzer {
    weight: u8,
}

impl StructureAnalyzer {
    pub fn new(weight: u8) -> Self {
        Self { weight }
    }

    fn result(&self, status: SignalStatus, score: u8, detail: impl Into<String>) -> SignalResult {
        SignalResult::new(Signal::Structure, self.weight, status, score, detail)
    }
}

impl Default for StructureAnalyzer {
    fn default() -> Self {
        Self::new(Signal::Structure.default_weight())
    }
}

impl Analyzer for StructureAnalyzer {
    fn signal(&self) -> Signal {
        Signal::Structure
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

        let semantic = count_matches(&SEMANTIC, &ctx.html);
        let non_semantic = count_matches(&NON_SEMANTIC, &ctx.html);
        let total = semantic + non_semantic;

        if total == 0 {
            return self
                .result(
                    SignalStatus::Warn,
                    50,
                    "Minimal structure: no semantic or container tags found",
                )
                .with_recommendations([
                    "Wrap primary content in <main> and use landmark elements like <nav> and <header>",
                ]);
        }

        let non_semantic_ratio = non_semantic as f64 / total as f64;
        let semantic_share = semantic as f64 / total as f64;
        let counts = format!("{} semantic vs {} div/span tags", semantic, non_semantic);

        if non_semantic_ratio > DIV_SOUP_THRESHOLD {
            return self
                .result(
                    SignalStatus::Fail,
                    10,
                    format!(
                        "Div soup: {}% of structural tags are generic containers ({})",
                        percent(non_semantic_ratio),
                        counts
                    ),
                )
                .with_recommendations([
                    "Replace the outer layout wrapper with <main>",
                    "Use <nav> for navigation menus instead of nested <div>s",
                    "Mark page and section headers with <header> and h1-h3 headings",
                    "Group self-contained content in <article> or <section>",
                    "Use <footer> and <aside> for secondary content",
                ]);
        }

        if non_semantic_ratio > HEAVY_CONTAINER_THRESHOLD {
            return self
                .result(
                    SignalStatus::Warn,
                    50,
                    format!(
                        "Container-heavy markup: {}% generic containers ({})",
                        percent(non_semantic_ratio),
                        counts
                    ),
                )
                .with_recommendations([
                    "Use <main>, <nav> and <footer> landmarks for the page skeleton",
                    "Replace clickable <div>/<span> elements with <button> or <a>",
                    "Introduce heading hierarchy (h1-h3) for major sections",
                ]);
        }

        if semantic_share >= SEMANTIC_SHARE_TARGET {
            return self.result(
                SignalStatus::Pass,
                100,
                format!("Semantic markup dominates ({})", counts),
            );
        }

        self.result(
            SignalStatus::Pass,
            80,
            format!("Reasonable structure ({})", counts),
        )
        .with_recommendations(["Prefer semantic elements over generic containers where possible"])
    }
}

#[cfg(test)]
#[path = "structure_tests.rs"]
mod tests;
