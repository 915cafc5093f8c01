//! Escalation state machine vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interaction::InteractionFailureKind;

/// Execution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Speed Reader: DOM-level, no image rendering cost.
    Tier1,
    /// Visual Resolver: vision-capable, slow and expensive.
    Tier2,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Tier1 => f.write_str("tier1"),
            Tier::Tier2 => f.write_str("tier2"),
        }
    }
}

/// States of one interaction check.
///
/// `Idle -> Tier1Attempt -> {Succeeded | Tier2Attempt -> {Succeeded | Failed}}`,
/// with `Tier1Attempt -> Failed` when escalation is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationState {
    Idle,
    Tier1Attempt,
    Tier2Attempt,
    Succeeded,
    Failed,
}

impl EscalationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EscalationState::Succeeded | EscalationState::Failed)
    }
}

/// Why Tier-2 was not (or could not be) used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionReason {
    /// The hostility signal failed for this audit.
    HostileSignal,
    /// The Tier-1 failure kind is outside the escalatable set.
    NonEscalatableFailure,
    /// Not enough of the outer deadline remains.
    NoBudget,
}

/// Rough cost of running a tier once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub seconds: f64,
    /// Relative cost units (Tier-1 = 1).
    pub units: u32,
}

/// Outcome of consulting the escalation policy. Logged, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationDecision {
    /// Tier-1 failure that triggered the decision.
    pub trigger: InteractionFailureKind,
    /// Tier chosen to continue with; `None` means stop.
    pub tier: Option<Tier>,
    pub estimated_cost: CostEstimate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppressed_by: Option<SuppressionReason>,
}

impl EscalationDecision {
    pub fn escalates(&self) -> bool {
        self.tier == Some(Tier::Tier2)
    }
}
