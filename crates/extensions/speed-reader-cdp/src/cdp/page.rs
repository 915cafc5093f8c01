//! A session attached to a single page target.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::debug;

use super::client::Transport;
use super::error::CdpError;
use super::protocol::{MouseButton, MouseEventType, NavigateResult};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A page target plus its CDP session.
pub struct PageSession {
    target_id: String,
    session_id: String,
    browser_context_id: String,
    transport: Arc<Transport>,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        browser_context_id: String,
        transport: Arc<Transport>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            browser_context_id,
            transport,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn browser_context_id(&self) -> &str {
        &self.browser_context_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    pub async fn set_viewport(&self, width: u32, height: u32) -> Result<(), CdpError> {
        self.call(
            "Emulation.setDeviceMetricsOverride",
            Some(json!({
                "width": width,
                "height": height,
                "deviceScaleFactor": 1,
                "mobile": false,
            })),
        )
        .await?;
        Ok(())
    }

    /// Navigate and wait until the document is interactive.
    ///
    /// Returns the navigation result as-is when Chrome reports that no
    /// response was obtained; readiness is not awaited in that case.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<NavigateResult, CdpError> {
        let started = Instant::now();
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;
        let result: NavigateResult = serde_json::from_value(result)?;

        if let Some(error) = result.failure() {
            debug!("Navigation to {} failed: {}", url, error);
            return Ok(result);
        }

        let remaining = timeout.saturating_sub(started.elapsed());
        self.wait_for_ready(remaining).await?;
        debug!("Navigated to {}", url);
        Ok(result)
    }

    /// Poll `document.readyState` until it reaches `interactive`.
    pub async fn wait_for_ready(&self, timeout: Duration) -> Result<(), CdpError> {
        let deadline = Instant::now() + timeout;
        loop {
            let state = self.evaluate("document.readyState").await?;
            if matches!(state.as_str(), Some("interactive") | Some("complete")) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(CdpError::Timeout {
                    operation: "page load".to_string(),
                    after: timeout,
                });
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }

    /// Get rendered page HTML.
    pub async fn content(&self) -> Result<String, CdpError> {
        let result = self.evaluate("document.documentElement.outerHTML").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Get current URL.
    pub async fn current_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Evaluate JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Click at viewport coordinates.
    pub async fn click(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseMoved,
                "x": x,
                "y": y,
            })),
        )
        .await?;

        for event in [MouseEventType::MousePressed, MouseEventType::MouseReleased] {
            self.call(
                "Input.dispatchMouseEvent",
                Some(json!({
                    "type": event,
                    "x": x,
                    "y": y,
                    "button": MouseButton::Left,
                    "clickCount": 1,
                })),
            )
            .await?;
        }

        debug!("Clicked at ({}, {})", x, y);
        Ok(())
    }
}
