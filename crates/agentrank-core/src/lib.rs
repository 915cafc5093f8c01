//! # AgentRank Core
//!
//! Signal scoring engine for agent-visibility audits.
//!
//! An audit captures a page through the Tier-1 [`SpeedReader`], runs the
//! five signal analyzers concurrently over the captured context, aggregates
//! their results into a 0-100 score, and optionally checks interaction goals.
//! Failed Tier-1 interactions are routed through the [`EscalationPolicy`],
//! which alone decides whether the Tier-2 visual resolver gets a turn.

pub mod aggregator;
pub mod analyzers;
pub mod budget;
pub mod engine;
pub mod escalation;
pub mod speed_reader;

pub use aggregator::{ScoreAggregator, WeightCatalog};
pub use analyzers::AnalyzerSet;
pub use budget::{AuditBudget, clamp_timeout};
pub use engine::AuditEngine;
pub use escalation::{ESCALATABLE, EscalationPolicy, EscalationTracker};
pub use speed_reader::{Capture, SessionGuard, SpeedReader};
