//! Resolver used when Tier-2 is disabled.

use async_trait::async_trait;

use agentrank_protocols::error::VisualResolutionError;
use agentrank_protocols::{VisualResolution, VisualResolutionRequest, VisualResolver};

/// Never available. Every resolution reports unavailability.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableResolver;

#[async_trait]
impl VisualResolver for UnavailableResolver {
    fn id(&self) -> &str {
        "disabled"
    }

    async fn is_available(&self) -> bool {
        false
    }

    async fn resolve(
        &self,
        _request: &VisualResolutionRequest,
    ) -> Result<VisualResolution, VisualResolutionError> {
        Err(VisualResolutionError::Unavailable(
            "Tier-2 is disabled in configuration".to_string(),
        ))
    }
}
