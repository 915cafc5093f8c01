//! Hostility analyzer: bot blockers and navigation traps.
//!
//! A failing hostility signal suppresses Tier-2 escalation for the rest of
//! the audit; the escalation policy reads it from the aggregate report.

use once_cell::sync::Lazy;
use regex::Regex;

use agentrank_protocols::{Analyzer, AnalyzerContext, Signal, SignalResult, SignalStatus};

/// Bot-blocker identifiers (challenge widgets, captcha and bot-protection markers).
pub const BOT_BLOCKERS: [&str; 12] = [
    "cf-challenge",
    "challenge-platform",
    "cf-turnstile",
    "g-recaptcha",
    "grecaptcha",
    "h-captcha",
    "hcaptcha",
    "px-captcha",
    "datadome",
    "_incapsula_resource",
    "bot-protection",
    "bot-detection",
];

struct TrapPattern {
    name: &'static str,
    regex: Regex,
}

static TRAPS: Lazy<Vec<TrapPattern>> = Lazy::new(|| {
    [
        (
            "void link",
            r#"(?i)href\s*=\s*["']\s*javascript:\s*void\s*\(\s*0\s*\)\s*;?\s*["']"#,
        ),
        ("empty anchor", r#"(?i)href\s*=\s*["']#["']"#),
        (
            "disabled control",
            r#"(?i)<(?:a|button|input|select|textarea)\b[^>]*\s(?:disabled\b|aria-disabled\s*=\s*["']true["'])"#,
        ),
        (
            "overlay",
            r#"(?i)class\s*=\s*["'][^"']*\b(?:overlay|modal-overlay|popup-overlay)\b[^"']*["']"#,
        ),
        (
            "backdrop",
            r#"(?i)class\s*=\s*["'][^"']*\b(?:backdrop|modal-backdrop)\b[^"']*["']"#,
        ),
    ]
    .into_iter()
    .map(|(name, pattern)| TrapPattern {
        name,
        regex: Regex::new(pattern).expect("valid trap pattern"),
    })
    .collect()
});

const TRAP_FAIL_ABOVE: usize = 10;
const TRAP_WARN_ABOVE: usize = 5;

pub struct HostilityAnalyzer {
    weight: u8,
}

impl HostilityAnalyzer {
    pub fn new(weight: u8) -> Self {
        Self { weight }
    }

    fn result(&self, status: SignalStatus, score: u8, detail: impl Into<String>) -> SignalResult {
        SignalResult::new(Signal::Hostility, self.weight, status, score, detail)
    }

    /// Blocker identifiers present in the markup, in catalog order.
    pub fn detect_blockers(html: &str) -> Vec<&'static str> {
        let lowered = html.to_lowercase();
        BOT_BLOCKERS
            .iter()
            .copied()
            .filter(|marker| lowered.contains(marker))
            .collect()
    }

    /// Per-pattern trap counts, skipping patterns with no match.
    fn count_traps(html: &str) -> Vec<(&'static str, usize)> {
        TRAPS
            .iter()
            .map(|trap| (trap.name, trap.regex.find_iter(html).count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

impl Default for HostilityAnalyzer {
    fn default() -> Self {
        Self::new(Signal::Hostility.default_weight())
    }
}

impl Analyzer for HostilityAnalyzer {
    fn signal(&self) -> Signal {
        Signal::Hostility
    }

    fn weight(&self) -> u8 {
        self.weight
    }

    fn analyze(&self, ctx: &AnalyzerContext) -> SignalResult {
        let blockers = Self::detect_blockers(&ctx.html);
        if !blockers.is_empty() {
            return self
                .result(
                    SignalStatus::Fail,
                    0,
                    format!("Bot blocker detected: {}", blockers.join(", ")),
                )
                .with_recommendations([
                    "Exempt declared AI agents from challenge pages and captchas",
                    "Offer an agent-accessible path (API or static page) for key content",
                ]);
        }

        let traps = Self::count_traps(&ctx.html);
        let total: usize = traps.iter().map(|(_, c)| c).sum();
        let breakdown = traps
            .iter()
            .map(|(name, count)| format!("{} x{}", name, count))
            .collect::<Vec<_>>()
            .join(", ");

        if total > TRAP_FAIL_ABOVE {
            return self
                .result(
                    SignalStatus::Fail,
                    10,
                    format!("{} navigation traps ({})", total, breakdown),
                )
                .with_recommendations([
                    "Give every link a real href instead of javascript:void(0) or #",
                    "Avoid overlays and backdrops that cover primary content on load",
                    "Do not ship primary actions in a disabled state",
                ]);
        }

        if total > TRAP_WARN_ABOVE {
            return self
                .result(
                    SignalStatus::Warn,
                    60,
                    format!("{} navigation traps ({})", total, breakdown),
                )
                .with_recommendations([
                    "Give every link a real href instead of javascript:void(0) or #",
                    "Avoid overlays that cover primary content on load",
                ]);
        }

        if total > 0 {
            return self.result(
                SignalStatus::Pass,
                80,
                format!("{} minor navigation trap(s) ({})", total, breakdown),
            );
        }

        self.result(SignalStatus::Pass, 100, "No bot blockers or navigation traps detected")
    }
}

#[cfg(test)]
#[path = "hostility_tests.rs"]
mod tests;
