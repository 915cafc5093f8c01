//! Tier-2 resolution errors.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisualResolutionError {
    #[error("Visual resolver unavailable: {0}")]
    Unavailable(String),

    #[error("Visual resolver rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Visual resolution failed: {0}")]
    Failed(String),

    #[error("Visual resolver transport error: {0}")]
    Transport(String),

    #[error("Visual resolution timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid visual resolver response: {0}")]
    InvalidResponse(String),
}
