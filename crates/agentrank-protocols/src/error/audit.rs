//! Terminal audit failures returned to the hosting application.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AggregationError, CaptureError};

/// Stable, classifiable kind of an [`AuditError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditErrorKind {
    ResourceUnreachable,
    Timeout,
    InternalError,
    Configuration,
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Resource unreachable: {0}")]
    ResourceUnreachable(String),

    #[error("Audit timed out after {0:?}")]
    Timeout(Duration),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid engine configuration: {0}")]
    Configuration(String),
}

impl AuditError {
    pub fn kind(&self) -> AuditErrorKind {
        match self {
            AuditError::ResourceUnreachable(_) => AuditErrorKind::ResourceUnreachable,
            AuditError::Timeout(_) => AuditErrorKind::Timeout,
            AuditError::Internal(_) => AuditErrorKind::InternalError,
            AuditError::Configuration(_) => AuditErrorKind::Configuration,
        }
    }
}

impl From<CaptureError> for AuditError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::ResourceUnreachable(msg) => AuditError::ResourceUnreachable(msg),
            CaptureError::Timeout(d) => AuditError::Timeout(d),
            CaptureError::Session(msg) => AuditError::Internal(format!("Automation session: {}", msg)),
        }
    }
}

impl From<AggregationError> for AuditError {
    fn from(e: AggregationError) -> Self {
        match e {
            AggregationError::WeightSum(_) | AggregationError::InvalidWeight { .. } => {
                AuditError::Configuration(e.to_string())
            }
            other => AuditError::Internal(other.to_string()),
        }
    }
}
