//! # AgentRank Protocols
//!
//! Data model and capability contracts for the AgentRank signal scoring engine.
//! Contains only types and interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`Analyzer`] - Pure function from an [`AnalyzerContext`] to a [`SignalResult`]
//! - [`AutomationCapability`] - Tier-1 browser automation (Speed Reader backend)
//! - [`VisualResolver`] - Tier-2 vision-capable interaction (Visual Resolver backend)

pub mod analyzer;
pub mod automation;
pub mod context;
pub mod error;
pub mod escalation;
pub mod interaction;
pub mod report;
pub mod signal;
pub mod visual;

pub use analyzer::Analyzer;
pub use automation::{AutomationCapability, AutomationSession, NavigationOutcome};
pub use context::{AnalyzerContext, DirectiveFile};
pub use error::{
    AggregationError, AuditError, AuditErrorKind, CaptureError, VisualResolutionError,
};
pub use escalation::{CostEstimate, EscalationDecision, EscalationState, SuppressionReason, Tier};
pub use interaction::{InteractionFailure, InteractionFailureKind, InteractionGoal, Locator};
pub use report::{AggregateReport, AuditReport, InteractionOutcome};
pub use signal::{Signal, SignalResult, SignalStatus};
pub use visual::{VisualResolution, VisualResolutionRequest, VisualResolver};
