//! In-page element probe.
//!
//! The probe locates an interaction target and classifies why it cannot be
//! clicked, or returns the viewport point to click.

use serde::Deserialize;

use agentrank_protocols::{InteractionFailure, InteractionFailureKind, Locator};

const PROBE_JS: &str = include_str!("probe.js");

/// Outcome of one probe evaluation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeResult {
    NotFound {
        #[serde(default)]
        detail: Option<String>,
    },
    NotVisible,
    VisuallyHidden {
        #[serde(default)]
        detail: Option<String>,
    },
    Disabled,
    Overlay {
        #[serde(default)]
        detail: Option<String>,
    },
    /// Target missing and a challenge widget present instead.
    Challenge {
        #[serde(default)]
        detail: Option<String>,
    },
    Ready {
        x: f64,
        y: f64,
    },
}

impl ProbeResult {
    /// Failure kind for anything other than `Ready`.
    pub fn failure_kind(&self) -> Option<InteractionFailureKind> {
        match self {
            ProbeResult::NotFound { .. } => Some(InteractionFailureKind::ElementNotFound),
            ProbeResult::NotVisible => Some(InteractionFailureKind::ElementNotVisible),
            ProbeResult::VisuallyHidden { .. } => Some(InteractionFailureKind::VisuallyHidden),
            ProbeResult::Disabled => Some(InteractionFailureKind::ElementDisabled),
            ProbeResult::Overlay { .. } => Some(InteractionFailureKind::OverlayBlocking),
            ProbeResult::Challenge { .. } => Some(InteractionFailureKind::BlockedByChallenge),
            ProbeResult::Ready { .. } => None,
        }
    }

    /// Convert a non-ready result into a tagged failure for `locator`.
    pub fn into_failure(self, locator: &Locator) -> Option<InteractionFailure> {
        let kind = self.failure_kind()?;
        let detail = match self {
            ProbeResult::NotFound { detail: Some(d) } => format!("{}: {}", locator, d),
            ProbeResult::NotFound { detail: None } => format!("no element matches {}", locator),
            ProbeResult::NotVisible => format!("{} has no rendered box", locator),
            ProbeResult::VisuallyHidden { detail } => format!(
                "{} is visually hidden ({})",
                locator,
                detail.as_deref().unwrap_or("not perceivable")
            ),
            ProbeResult::Disabled => format!("{} is disabled", locator),
            ProbeResult::Overlay { detail } => format!(
                "{} is covered by {}",
                locator,
                detail.as_deref().unwrap_or("another element")
            ),
            ProbeResult::Challenge { detail } => format!(
                "{} is behind a challenge page ({})",
                locator,
                detail.as_deref().unwrap_or("challenge widget")
            ),
            ProbeResult::Ready { .. } => return None,
        };
        Some(InteractionFailure::new(kind, detail))
    }
}

/// Build the `Runtime.evaluate` expression probing for `locator`.
pub fn probe_expression(locator: &Locator) -> String {
    let mode = match locator {
        Locator::Selector(_) => "selector",
        Locator::Semantic(_) => "semantic",
    };
    // JSON string literals are valid JavaScript string literals.
    let needle = serde_json::Value::String(locator.value().to_string());
    format!("{}(\"{}\", {})", PROBE_JS.trim_end(), mode, needle)
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
