//! Tier-1 capture errors.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    /// No response at all (DNS, connection refused, TLS failure).
    #[error("Resource unreachable: {0}")]
    ResourceUnreachable(String),

    #[error("Capture timed out after {0:?}")]
    Timeout(Duration),

    /// The automation backend itself failed.
    #[error("Session error: {0}")]
    Session(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = CaptureError::ResourceUnreachable("https://nowhere.invalid".into());
        assert!(err.to_string().contains("nowhere.invalid"));
        let err = CaptureError::Timeout(Duration::from_secs(12));
        assert!(err.to_string().contains("12s"));
    }
}
