//! Plain HTTP fetches for directive files.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use agentrank_config::FetchConfig;

use crate::cdp::CdpError;

/// Fetches robots.txt and agent-permission files outside the browser.
#[derive(Clone)]
pub struct HttpDirectiveFetcher {
    client: Client,
}

impl HttpDirectiveFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, CdpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Body of `url` as text, or `None` on any failure or non-2xx status.
    pub async fn fetch_optional(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("Directive fetch {} failed: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!("Directive fetch {} returned {}", url, status);
            return None;
        }

        let bytes = response.bytes().await.ok()?;
        String::from_utf8(bytes.to_vec()).ok()
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
