//! Audit orchestration: capture, analyze, aggregate, then run interaction
//! checks through the escalation policy.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use url::Url;

use agentrank_config::{AuditConfig, Config};
use agentrank_protocols::{
    AggregateReport, AuditError, AuditReport, AutomationCapability, AutomationSession,
    EscalationState, InteractionFailureKind, InteractionGoal, InteractionOutcome, Signal,
    SignalStatus, Tier, VisualResolution, VisualResolutionError, VisualResolutionRequest,
    VisualResolver,
};

use crate::aggregator::{ScoreAggregator, WeightCatalog};
use crate::analyzers::AnalyzerSet;
use crate::budget::{AuditBudget, clamp_timeout};
use crate::escalation::{
    EscalationPolicy, EscalationTracker, TIER1_COST, is_resource_failure, log_decision,
};
use crate::speed_reader::{SessionGuard, SpeedReader};

/// Runs audits. Holds no per-audit state; one engine serves concurrent audits.
pub struct AuditEngine {
    capability: Arc<dyn AutomationCapability>,
    resolver: Arc<dyn VisualResolver>,
    analyzers: AnalyzerSet,
    aggregator: ScoreAggregator,
    policy: EscalationPolicy,
    reader: SpeedReader,
    audit: AuditConfig,
}

impl AuditEngine {
    /// Build an engine. Fails with `Configuration` when the weight catalog,
    /// the timeout window or the budget shares are invalid; no audit can run
    /// in that case.
    pub fn new(
        config: &Config,
        capability: Arc<dyn AutomationCapability>,
        resolver: Arc<dyn VisualResolver>,
    ) -> Result<Self, AuditError> {
        let catalog = WeightCatalog::from_config(&config.weights)?;
        let audit = config.audit.clone();
        if audit.min_timeout_seconds == 0 || audit.min_timeout_seconds > audit.max_timeout_seconds {
            return Err(AuditError::Configuration(format!(
                "Invalid timeout window {}..{} seconds",
                audit.min_timeout_seconds, audit.max_timeout_seconds
            )));
        }
        check_shares(&audit)?;

        info!(
            automation = capability.id(),
            resolver = resolver.id(),
            "Audit engine ready"
        );

        Ok(Self {
            capability,
            resolver,
            analyzers: AnalyzerSet::new(&catalog),
            aggregator: ScoreAggregator::new(catalog),
            policy: EscalationPolicy::new(Duration::from_secs(audit.tier2_min_budget_seconds)),
            reader: SpeedReader::new(audit.agent_permission_path.clone()),
            audit,
        })
    }

    pub fn resolver(&self) -> &Arc<dyn VisualResolver> {
        &self.resolver
    }

    /// Audit a URL without interaction checks.
    pub async fn run_audit(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> Result<AuditReport, AuditError> {
        self.run_audit_with_goals(url, timeout, &[]).await
    }

    /// Audit a URL and check each interaction goal in order.
    ///
    /// The session is released on every path before this returns. The
    /// outer deadline covers session start, capture, analysis and all goals.
    pub async fn run_audit_with_goals(
        &self,
        url: &str,
        timeout: Option<Duration>,
        goals: &[InteractionGoal],
    ) -> Result<AuditReport, AuditError> {
        let url = parse_target(url)?;
        let total = clamp_timeout(timeout, &self.audit);
        let budget = AuditBudget::start(total, &self.audit);
        let audit_id = uuid::Uuid::new_v4().to_string();
        let started_at = chrono::Utc::now().to_rfc3339();

        info!(
            audit_id = %audit_id,
            url = %url,
            timeout_secs = total.as_secs(),
            goals = goals.len(),
            "Starting audit"
        );

        let session = tokio::time::timeout(budget.remaining(), self.capability.open_session())
            .await
            .map_err(|_| AuditError::Timeout(total))??;
        let guard = SessionGuard::new(session);

        let outcome = tokio::time::timeout(
            budget.remaining(),
            self.audit_with_session(guard.session(), &url, &budget, goals),
        )
        .await;

        if let Err(e) = guard.release().await {
            warn!(audit_id = %audit_id, "Failed to release automation session: {}", e);
        }

        let result = match outcome {
            Ok(result) => result,
            Err(_) => Err(AuditError::Timeout(total)),
        };

        match result {
            Ok(parts) => {
                info!(
                    audit_id = %audit_id,
                    score = parts.aggregate.score,
                    verdict = %parts.aggregate.verdict,
                    "Audit complete"
                );
                Ok(AuditReport {
                    audit_id,
                    url: url.to_string(),
                    started_at,
                    time_to_interactive_ms: parts.time_to_interactive.as_millis() as u64,
                    aggregate: parts.aggregate,
                    interactions: parts.interactions,
                })
            }
            Err(e) => {
                error!(audit_id = %audit_id, kind = ?e.kind(), "Audit failed: {}", e);
                Err(e)
            }
        }
    }

    async fn audit_with_session(
        &self,
        session: &dyn AutomationSession,
        url: &Url,
        budget: &AuditBudget,
        goals: &[InteractionGoal],
    ) -> Result<AuditParts, AuditError> {
        let capture = self
            .reader
            .capture(session, url, budget.capture_timeout())
            .await?;

        let context = Arc::new(capture.context);
        let results = self.analyzers.run_all(context).await?;
        let aggregate = self.aggregator.aggregate(results)?;

        let hostility = aggregate.status_of(Signal::Hostility);
        let mut interactions = Vec::with_capacity(goals.len());
        for goal in goals {
            let outcome = self
                .check_interaction(session, url, goal, hostility, budget)
                .await?;
            interactions.push(outcome);
        }

        Ok(AuditParts {
            aggregate,
            interactions,
            time_to_interactive: capture.time_to_interactive,
        })
    }

    /// Tier-1 attempt, then Tier-2 if the policy allows it.
    async fn check_interaction(
        &self,
        session: &dyn AutomationSession,
        url: &Url,
        goal: &InteractionGoal,
        hostility: Option<SignalStatus>,
        budget: &AuditBudget,
    ) -> Result<InteractionOutcome, AuditError> {
        let mut tracker = EscalationTracker::new();
        tracker.advance(EscalationState::Tier1Attempt)?;
        debug!(
            goal = %goal.description,
            locator = %goal.locator,
            estimated_cost_secs = TIER1_COST.seconds,
            "Tier-1 interaction attempt"
        );

        let failure = match self
            .reader
            .attempt_interaction(session, goal, budget.interaction_timeout())
            .await
        {
            Ok(()) => {
                tracker.advance(EscalationState::Succeeded)?;
                return Ok(InteractionOutcome {
                    goal: goal.clone(),
                    final_state: EscalationState::Succeeded,
                    tier: Tier::Tier1,
                    decision: None,
                    tier1_failure: None,
                    resolution: None,
                    tier2_error: None,
                    trace: tracker.into_trace(),
                });
            }
            Err(failure) => failure,
        };

        let decision = self.policy.decide(failure.kind, hostility, budget.remaining());
        log_decision(&decision);

        if is_resource_failure(failure.kind) {
            return Err(match failure.kind {
                InteractionFailureKind::ResourceUnreachable => {
                    AuditError::ResourceUnreachable(failure.detail)
                }
                _ => AuditError::Internal(format!("Automation session crashed: {}", failure.detail)),
            });
        }

        if !decision.escalates() {
            tracker.advance(EscalationState::Failed)?;
            return Ok(InteractionOutcome {
                goal: goal.clone(),
                final_state: EscalationState::Failed,
                tier: Tier::Tier1,
                decision: Some(decision),
                tier1_failure: Some(failure),
                resolution: None,
                tier2_error: None,
                trace: tracker.into_trace(),
            });
        }

        tracker.advance(EscalationState::Tier2Attempt)?;
        let request = VisualResolutionRequest {
            url: url.to_string(),
            action_description: goal.action_description(),
            timeout: budget.tier2_timeout(),
        };
        let (final_state, resolution, tier2_error) = match self.resolve_visually(&request).await {
            Ok(resolution) if resolution.success && resolution.element_found => {
                (EscalationState::Succeeded, Some(resolution), None)
            }
            Ok(resolution) => {
                let reason = if resolution.element_found {
                    "Visual resolver found the element but could not complete the action"
                } else {
                    "Visual resolver could not find the element"
                };
                (EscalationState::Failed, Some(resolution), Some(reason.to_string()))
            }
            Err(e) => {
                warn!(goal = %goal.description, "Tier-2 resolution failed: {}", e);
                (EscalationState::Failed, None, Some(e.to_string()))
            }
        };
        tracker.advance(final_state)?;

        Ok(InteractionOutcome {
            goal: goal.clone(),
            final_state,
            tier: Tier::Tier2,
            decision: Some(decision),
            tier1_failure: Some(failure),
            resolution,
            tier2_error,
            trace: tracker.into_trace(),
        })
    }

    /// One Tier-2 attempt. Unavailability is a failure, never a wait.
    async fn resolve_visually(
        &self,
        request: &VisualResolutionRequest,
    ) -> Result<VisualResolution, VisualResolutionError> {
        if !self.resolver.is_available().await {
            return Err(VisualResolutionError::Unavailable(format!(
                "{} is not available",
                self.resolver.id()
            )));
        }
        info!(resolver = self.resolver.id(), url = %request.url, "Escalating to Tier-2");
        tokio::time::timeout(request.timeout, self.resolver.resolve(request))
            .await
            .unwrap_or(Err(VisualResolutionError::Timeout(request.timeout)))
    }
}

struct AuditParts {
    aggregate: AggregateReport,
    interactions: Vec<InteractionOutcome>,
    time_to_interactive: Duration,
}

/// Capture plus two interaction attempts must leave Tier-2 some budget.
fn check_shares(audit: &AuditConfig) -> Result<(), AuditError> {
    let in_range = |share: f64| share > 0.0 && share < 1.0;
    if !in_range(audit.capture_share) || !in_range(audit.interaction_share) {
        return Err(AuditError::Configuration(format!(
            "Budget shares must lie in (0, 1): capture_share={}, interaction_share={}",
            audit.capture_share, audit.interaction_share
        )));
    }
    if audit.capture_share + 2.0 * audit.interaction_share >= 1.0 {
        return Err(AuditError::Configuration(format!(
            "capture_share + 2 * interaction_share must be below 1, got {}",
            audit.capture_share + 2.0 * audit.interaction_share
        )));
    }
    Ok(())
}

/// Only absolute http(s) URLs can be audited.
fn parse_target(raw: &str) -> Result<Url, AuditError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AuditError::ResourceUnreachable(format!("Invalid URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AuditError::ResourceUnreachable(format!(
            "Unsupported URL scheme '{}'",
            other
        ))),
    }
}
