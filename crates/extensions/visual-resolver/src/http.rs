//! HTTP client for a self-hosted or hosted visual resolver.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use agentrank_config::{Tier2Config, Tier2Mode};
use agentrank_protocols::error::VisualResolutionError;
use agentrank_protocols::{VisualResolution, VisualResolutionRequest, VisualResolver};

use crate::api::{HealthResponse, TaskRequest, TaskResponse};

/// Visual resolver reached over HTTP.
pub struct HttpVisualResolver {
    id: String,
    endpoint: String,
    api_key: Option<String>,
    record_video: bool,
    health_timeout: Duration,
    client: reqwest::Client,
}

impl HttpVisualResolver {
    /// Self-hosted engine, no authentication.
    pub fn local(endpoint: impl Into<String>) -> Self {
        Self::build("visual-local", endpoint.into(), None)
    }

    /// Hosted service authenticated with a bearer token.
    pub fn remote(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::build("visual-remote", endpoint.into(), Some(api_key.into()))
    }

    fn build(id: &str, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            id: id.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            record_video: true,
            health_timeout: Duration::from_secs(5),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_record_video(mut self, record_video: bool) -> Self {
        self.record_video = record_video;
        self
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Build from `[tier2]`. Returns `None` in disabled mode.
    pub fn from_config(config: &Tier2Config) -> Option<Self> {
        let resolver = match config.mode {
            Tier2Mode::Disabled => return None,
            Tier2Mode::Local => Self::local(&config.endpoint),
            Tier2Mode::Remote => {
                Self::remote(&config.endpoint, config.api_key.clone().unwrap_or_default())
            }
        };
        Some(
            resolver
                .with_record_video(config.record_video)
                .with_health_timeout(Duration::from_secs(config.health_timeout_seconds)),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.endpoint, path));
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl VisualResolver for HttpVisualResolver {
    fn id(&self) -> &str {
        &self.id
    }

    async fn is_available(&self) -> bool {
        let response = match self
            .request(reqwest::Method::GET, "/health")
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Visual resolver {} health check failed: {}", self.endpoint, e);
                return false;
            }
        };

        if !response.status().is_success() {
            warn!(
                "Visual resolver {} health check returned {}",
                self.endpoint,
                response.status()
            );
            return false;
        }

        match response.json::<HealthResponse>().await {
            Ok(health) => health.status == "ok",
            Err(e) => {
                warn!("Visual resolver {} health body unreadable: {}", self.endpoint, e);
                false
            }
        }
    }

    async fn resolve(
        &self,
        request: &VisualResolutionRequest,
    ) -> Result<VisualResolution, VisualResolutionError> {
        let body = TaskRequest {
            task: &request.action_description,
            url: &request.url,
            record_video: self.record_video,
        };
        info!("Dispatching visual resolution for {} to {}", request.url, self.id);

        let response = self
            .request(reqwest::Method::POST, "/task")
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify(e, request.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisualResolutionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| classify(e, request.timeout))?;
        let task: TaskResponse = serde_json::from_str(&text)
            .map_err(|e| VisualResolutionError::InvalidResponse(e.to_string()))?;

        if !task.success {
            let reason = task
                .error
                .unwrap_or_else(|| "resolver reported failure without a reason".to_string());
            return Err(VisualResolutionError::Failed(reason));
        }

        debug!("Visual resolution finished in {} steps", task.steps);
        Ok(task.into_resolution())
    }
}

fn classify(e: reqwest::Error, timeout: Duration) -> VisualResolutionError {
    if e.is_timeout() {
        VisualResolutionError::Timeout(timeout)
    } else {
        VisualResolutionError::Transport(e.to_string())
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
