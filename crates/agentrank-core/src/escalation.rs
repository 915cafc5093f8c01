//! Escalation policy and the per-interaction state tracker.

use std::time::Duration;

use tracing::info;

use agentrank_protocols::{
    AuditError, CostEstimate, EscalationDecision, EscalationState, InteractionFailureKind,
    SignalStatus, SuppressionReason, Tier,
};

/// Failure kinds a vision-capable backend can plausibly resolve.
pub const ESCALATABLE: [InteractionFailureKind; 5] = [
    InteractionFailureKind::ElementNotFound,
    InteractionFailureKind::ElementNotVisible,
    InteractionFailureKind::ElementDisabled,
    InteractionFailureKind::VisuallyHidden,
    InteractionFailureKind::OverlayBlocking,
];

pub const TIER1_COST: CostEstimate = CostEstimate {
    seconds: 2.0,
    units: 1,
};

pub const TIER2_COST: CostEstimate = CostEstimate {
    seconds: 45.0,
    units: 10,
};

const NO_COST: CostEstimate = CostEstimate {
    seconds: 0.0,
    units: 0,
};

pub fn is_escalatable(kind: InteractionFailureKind) -> bool {
    ESCALATABLE.contains(&kind)
}

/// Failures that mean the session or the site is gone; they end the audit.
pub fn is_resource_failure(kind: InteractionFailureKind) -> bool {
    matches!(
        kind,
        InteractionFailureKind::ResourceUnreachable | InteractionFailureKind::SessionCrashed
    )
}

/// Decides whether a failed Tier-1 interaction goes to Tier-2.
///
/// The hostility verdict is an explicit input: a failing hostility signal
/// suppresses Tier-2 for every interaction of the audit.
#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    min_tier2_budget: Duration,
}

impl EscalationPolicy {
    pub fn new(min_tier2_budget: Duration) -> Self {
        Self { min_tier2_budget }
    }

    pub fn decide(
        &self,
        trigger: InteractionFailureKind,
        hostility: Option<SignalStatus>,
        remaining: Duration,
    ) -> EscalationDecision {
        let suppressed_by = if !is_escalatable(trigger) {
            Some(SuppressionReason::NonEscalatableFailure)
        } else if hostility == Some(SignalStatus::Fail) {
            Some(SuppressionReason::HostileSignal)
        } else if remaining < self.min_tier2_budget {
            Some(SuppressionReason::NoBudget)
        } else {
            None
        };

        match suppressed_by {
            None => EscalationDecision {
                trigger,
                tier: Some(Tier::Tier2),
                estimated_cost: TIER2_COST,
                suppressed_by: None,
            },
            Some(reason) => EscalationDecision {
                trigger,
                tier: None,
                estimated_cost: NO_COST,
                suppressed_by: Some(reason),
            },
        }
    }
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

/// Emit a decision as a structured event.
pub fn log_decision(decision: &EscalationDecision) {
    let tier = decision
        .tier
        .map(|t| t.to_string())
        .unwrap_or_else(|| "none".to_string());
    info!(
        trigger = %decision.trigger,
        tier = %tier,
        estimated_cost_secs = decision.estimated_cost.seconds,
        suppressed_by = ?decision.suppressed_by,
        "Escalation decision"
    );
}

fn is_legal(from: EscalationState, to: EscalationState) -> bool {
    use EscalationState::*;
    matches!(
        (from, to),
        (Idle, Tier1Attempt)
            | (Tier1Attempt, Succeeded)
            | (Tier1Attempt, Failed)
            | (Tier1Attempt, Tier2Attempt)
            | (Tier2Attempt, Succeeded)
            | (Tier2Attempt, Failed)
    )
}

/// State of one interaction check plus the path it took.
#[derive(Debug, Clone)]
pub struct EscalationTracker {
    state: EscalationState,
    trace: Vec<EscalationState>,
}

impl EscalationTracker {
    pub fn new() -> Self {
        Self {
            state: EscalationState::Idle,
            trace: vec![EscalationState::Idle],
        }
    }

    pub fn state(&self) -> EscalationState {
        self.state
    }

    pub fn trace(&self) -> &[EscalationState] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<EscalationState> {
        self.trace
    }

    /// Move to `next`. Illegal transitions are engine defects.
    pub fn advance(&mut self, next: EscalationState) -> Result<(), AuditError> {
        if !is_legal(self.state, next) {
            return Err(AuditError::Internal(format!(
                "Illegal escalation transition {:?} -> {:?}",
                self.state, next
            )));
        }
        self.state = next;
        self.trace.push(next);
        Ok(())
    }
}

impl Default for EscalationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "escalation_tests.rs"]
mod tests;
