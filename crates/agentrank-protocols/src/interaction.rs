//! Interaction goals and the closed taxonomy of interaction failures.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the target element is located.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Locator {
    /// CSS selector.
    Selector(String),
    /// Visible text or accessible name to match.
    Semantic(String),
}

impl Locator {
    pub fn value(&self) -> &str {
        match self {
            Locator::Selector(s) | Locator::Semantic(s) => s,
        }
    }

    /// Parse a locator string. `css:` and `text:` prefixes pick the kind
    /// explicitly; otherwise anything that looks like a selector is one.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(rest) = raw.strip_prefix("css:") {
            return Locator::Selector(rest.trim().to_string());
        }
        if let Some(rest) = raw.strip_prefix("text:") {
            return Locator::Semantic(rest.trim().to_string());
        }
        let looks_like_selector = raw.starts_with(['#', '.', '['])
            || raw.contains(['>', '[', '#', '.', ':'])
                && !raw.contains(char::is_whitespace);
        if looks_like_selector {
            Locator::Selector(raw.to_string())
        } else {
            Locator::Semantic(raw.to_string())
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Selector(s) => write!(f, "css:{}", s),
            Locator::Semantic(s) => write!(f, "text:{}", s),
        }
    }
}

/// One interactive check, e.g. "the sign-up button is reachable and clickable".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionGoal {
    /// Human-readable description of the target.
    pub description: String,
    pub locator: Locator,
}

impl InteractionGoal {
    pub fn new(description: impl Into<String>, locator: Locator) -> Self {
        Self {
            description: description.into(),
            locator,
        }
    }

    /// Natural-language action handed to the Visual Resolver.
    pub fn action_description(&self) -> String {
        format!(
            "Find the element described as \"{}\" (locator: {}) and click it. \
             Report whether the element was found.",
            self.description, self.locator
        )
    }
}

/// Why a Tier-1 interaction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionFailureKind {
    /// Nothing matched the locator before the sub-timeout.
    ElementNotFound,
    /// The element exists but has no rendered box.
    ElementNotVisible,
    /// The element is disabled or `aria-disabled`.
    ElementDisabled,
    /// The element is rendered but transparent, clipped, or off-viewport.
    VisuallyHidden,
    /// Another element receives pointer events at the element's centre.
    OverlayBlocking,
    /// The page could not be reached.
    ResourceUnreachable,
    /// A challenge or block page stands in front of the content.
    BlockedByChallenge,
    /// The automation session died.
    SessionCrashed,
    /// The interaction ran out of time for a reason other than locating.
    Timeout,
}

impl InteractionFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionFailureKind::ElementNotFound => "element_not_found",
            InteractionFailureKind::ElementNotVisible => "element_not_visible",
            InteractionFailureKind::ElementDisabled => "element_disabled",
            InteractionFailureKind::VisuallyHidden => "visually_hidden",
            InteractionFailureKind::OverlayBlocking => "overlay_blocking",
            InteractionFailureKind::ResourceUnreachable => "resource_unreachable",
            InteractionFailureKind::BlockedByChallenge => "blocked_by_challenge",
            InteractionFailureKind::SessionCrashed => "session_crashed",
            InteractionFailureKind::Timeout => "timeout",
        }
    }
}

impl fmt::Display for InteractionFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged failure of a Tier-1 interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {detail}")]
pub struct InteractionFailure {
    pub kind: InteractionFailureKind,
    pub detail: String,
}

impl InteractionFailure {
    pub fn new(kind: InteractionFailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}
