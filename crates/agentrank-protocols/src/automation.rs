//! Tier-1 automation capability contract.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CaptureError;
use crate::interaction::{InteractionFailure, InteractionGoal};

/// Result of navigating the session to a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationOutcome {
    /// Rendered markup. Empty when no response was obtained.
    pub html: String,
    /// Whether any response arrived (false on DNS/connection failure).
    pub response_present: bool,
    /// URL after redirects.
    pub final_url: String,
    /// Backend error text when `response_present` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
}

/// One browser session, exclusively owned by one audit.
#[async_trait]
pub trait AutomationSession: Send + Sync {
    /// Navigate and wait for the page to become interactive.
    async fn navigate(&self, url: &str, timeout: Duration)
        -> Result<NavigationOutcome, CaptureError>;

    /// Fetch a side resource as text. Absent on any failure; never fails the audit.
    async fn fetch_optional(&self, url: &str) -> Option<String>;

    /// Locate the goal's target and click it.
    async fn interact(
        &self,
        goal: &InteractionGoal,
        timeout: Duration,
    ) -> Result<(), InteractionFailure>;

    /// Release the session. Called exactly once by the owning guard.
    async fn close(&self) -> Result<(), CaptureError>;
}

/// Factory for automation sessions (e.g. a Chrome instance).
#[async_trait]
pub trait AutomationCapability: Send + Sync {
    /// Backend identifier for logs.
    fn id(&self) -> &str;

    /// Open a fresh, unshared session.
    async fn open_session(&self) -> Result<Box<dyn AutomationSession>, CaptureError>;
}
