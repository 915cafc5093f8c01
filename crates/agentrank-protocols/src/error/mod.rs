//! Error types for the AgentRank engine.

mod aggregation;
mod audit;
mod capture;
mod visual;

pub use aggregation::AggregationError;
pub use audit::{AuditError, AuditErrorKind};
pub use capture::CaptureError;
pub use visual::VisualResolutionError;
