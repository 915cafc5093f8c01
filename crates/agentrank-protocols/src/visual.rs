//! Tier-2 (Visual Resolver) contract.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::VisualResolutionError;

/// A request to resolve one interaction visually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualResolutionRequest {
    pub url: String,
    /// Natural-language description of the action to take.
    pub action_description: String,
    /// Hard deadline for the whole resolution.
    pub timeout: Duration,
}

/// Structured result from a Visual Resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualResolution {
    pub success: bool,
    pub element_found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
    /// Number of agent steps the resolver used.
    #[serde(default)]
    pub steps: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transcript: Vec<String>,
    /// Session recording, when the backend records one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_id: Option<String>,
    /// Backend confidence in `0.0..=1.0`, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Vision-capable interaction backend.
///
/// Backends may be unavailable; callers treat unavailability exactly like
/// a resolution failure and never retry.
#[async_trait]
pub trait VisualResolver: Send + Sync {
    /// Backend identifier for logs.
    fn id(&self) -> &str;

    /// Cheap health check. Must not block longer than the backend's health timeout.
    async fn is_available(&self) -> bool;

    /// Attempt the action described in the request.
    async fn resolve(
        &self,
        request: &VisualResolutionRequest,
    ) -> Result<VisualResolution, VisualResolutionError>;
}
