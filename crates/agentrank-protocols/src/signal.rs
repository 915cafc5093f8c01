//! Signal catalog and per-signal results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One scored dimension of agent-readability.
///
/// Declaration order is the deterministic report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Permissions,
    Structure,
    Hostility,
    Accessibility,
    Hydration,
}

impl Signal {
    /// All signals in report order.
    pub const ALL: [Signal; 5] = [
        Signal::Permissions,
        Signal::Structure,
        Signal::Hostility,
        Signal::Accessibility,
        Signal::Hydration,
    ];

    /// Stable analyzer name.
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Permissions => "permissions",
            Signal::Structure => "structure",
            Signal::Hostility => "hostility",
            Signal::Accessibility => "accessibility",
            Signal::Hydration => "hydration",
        }
    }

    /// Default weight from the built-in catalog. The defaults sum to 100.
    pub fn default_weight(&self) -> u8 {
        match self {
            Signal::Permissions => 20,
            Signal::Structure => 25,
            Signal::Hostility => 15,
            Signal::Accessibility => 20,
            Signal::Hydration => 20,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pass/warn/fail status.
///
/// Ordered by severity so that the worst status is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    Pass,
    Warn,
    Fail,
}

impl SignalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalStatus::Pass => "pass",
            SignalStatus::Warn => "warn",
            SignalStatus::Fail => "fail",
        }
    }
}

impl fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one analyzer for one audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalResult {
    /// Which signal produced this result.
    #[serde(rename = "name")]
    pub signal: Signal,
    pub status: SignalStatus,
    /// Score in `0..=100`.
    pub score: u8,
    /// Weight in `1..=100`.
    pub weight: u8,
    /// Human-readable explanation.
    pub detail: String,
    /// Ordered remediation advice.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl SignalResult {
    /// Create a result. Scores above 100 are clamped.
    pub fn new(
        signal: Signal,
        weight: u8,
        status: SignalStatus,
        score: u8,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            signal,
            status,
            score: score.min(100),
            weight,
            detail: detail.into(),
            recommendations: Vec::new(),
        }
    }

    /// Attach remediation advice.
    pub fn with_recommendations<I, S>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations = recommendations.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_fail(&self) -> bool {
        self.status == SignalStatus::Fail
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
