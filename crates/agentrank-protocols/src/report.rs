//! Aggregate and audit reports.

use serde::{Deserialize, Serialize};

use crate::escalation::{EscalationDecision, EscalationState, Tier};
use crate::interaction::{InteractionFailure, InteractionGoal};
use crate::signal::{Signal, SignalResult, SignalStatus};
use crate::visual::VisualResolution;

/// Weighted combination of all signal results for one audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Weighted mean of signal scores, rounded half-up.
    pub score: u8,
    pub verdict: SignalStatus,
    /// Results in signal order.
    pub signals: Vec<SignalResult>,
}

impl AggregateReport {
    pub fn signal(&self, signal: Signal) -> Option<&SignalResult> {
        self.signals.iter().find(|r| r.signal == signal)
    }

    /// Status of a signal, if it was produced.
    pub fn status_of(&self, signal: Signal) -> Option<SignalStatus> {
        self.signal(signal).map(|r| r.status)
    }
}

/// What happened to one interaction goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionOutcome {
    pub goal: InteractionGoal,
    /// `Succeeded` or `Failed`.
    pub final_state: EscalationState,
    /// Tier that produced the final state.
    pub tier: Tier,
    /// Present when Tier-1 failed and the policy was consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<EscalationDecision>,
    /// Tier-1 failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier1_failure: Option<InteractionFailure>,
    /// Tier-2 result, if Tier-2 ran and answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<VisualResolution>,
    /// Tier-2 error, reported verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier2_error: Option<String>,
    /// Every state visited, starting with `Idle`.
    pub trace: Vec<EscalationState>,
}

impl InteractionOutcome {
    pub fn succeeded(&self) -> bool {
        self.final_state == EscalationState::Succeeded
    }
}

/// Complete result of `run_audit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub audit_id: String,
    pub url: String,
    /// RFC 3339 timestamp of audit start.
    pub started_at: String,
    pub time_to_interactive_ms: u64,
    #[serde(flatten)]
    pub aggregate: AggregateReport,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interactions: Vec<InteractionOutcome>,
}
