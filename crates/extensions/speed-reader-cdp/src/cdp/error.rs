//! CDP error types.

use std::time::Duration;

use thiserror::Error;

use agentrank_protocols::{CaptureError, InteractionFailure, InteractionFailureKind};

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to connect to Chrome.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not running with remote debugging and not allowed to launch it.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    #[error("Chrome not found. Please install Google Chrome or Chromium.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JavaScript execution error.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("Timed out after {after:?}: {operation}")]
    Timeout { operation: String, after: Duration },

    /// The browser connection is gone.
    #[error("Session closed")]
    SessionClosed,

    /// Invalid response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}

impl From<CdpError> for CaptureError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::Timeout { after, .. } => CaptureError::Timeout(after),
            other => CaptureError::Session(other.to_string()),
        }
    }
}

impl From<CdpError> for InteractionFailure {
    fn from(e: CdpError) -> Self {
        let kind = match &e {
            CdpError::Timeout { .. } => InteractionFailureKind::Timeout,
            // A probe that throws means the locator itself is unusable.
            CdpError::JavaScript(_) => InteractionFailureKind::ElementNotFound,
            _ => InteractionFailureKind::SessionCrashed,
        };
        InteractionFailure::new(kind, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_capture_timeout() {
        let err = CdpError::Timeout {
            operation: "Page.navigate".into(),
            after: Duration::from_secs(5),
        };
        assert!(matches!(
            CaptureError::from(err),
            CaptureError::Timeout(d) if d == Duration::from_secs(5)
        ));
    }

    #[test]
    fn test_connection_errors_map_to_session() {
        let err: CaptureError = CdpError::SessionClosed.into();
        assert!(matches!(err, CaptureError::Session(_)));
    }

    #[test]
    fn test_interaction_failure_mapping() {
        let failure: InteractionFailure = CdpError::SessionClosed.into();
        assert_eq!(failure.kind, InteractionFailureKind::SessionCrashed);

        let failure: InteractionFailure =
            CdpError::JavaScript("SyntaxError: '#[' is not a valid selector".into()).into();
        assert_eq!(failure.kind, InteractionFailureKind::ElementNotFound);
        assert!(failure.detail.contains("valid selector"));

        let failure: InteractionFailure = CdpError::Timeout {
            operation: "Runtime.evaluate".into(),
            after: Duration::from_secs(30),
        }
        .into();
        assert_eq!(failure.kind, InteractionFailureKind::Timeout);
    }
}
