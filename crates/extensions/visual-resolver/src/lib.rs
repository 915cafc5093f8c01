//! Tier-2 visual resolver backends for AgentRank.

mod api;
mod http;
mod unavailable;

use std::sync::Arc;

use tracing::info;

use agentrank_config::Tier2Config;
use agentrank_protocols::VisualResolver;

pub use http::HttpVisualResolver;
pub use unavailable::UnavailableResolver;

/// Resolver selected by `[tier2].mode`.
pub fn from_config(config: &Tier2Config) -> Arc<dyn VisualResolver> {
    match HttpVisualResolver::from_config(config) {
        Some(resolver) => {
            info!("Tier-2 resolver: {} at {}", resolver.id(), resolver.endpoint());
            Arc::new(resolver)
        }
        None => {
            info!("Tier-2 resolver disabled");
            Arc::new(UnavailableResolver)
        }
    }
}
