//! Chrome-backed automation capability.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use agentrank_config::{BrowserConfig, FetchConfig};
use agentrank_protocols::{
    AutomationCapability, AutomationSession, CaptureError, InteractionFailure,
    InteractionFailureKind, InteractionGoal, NavigationOutcome,
};

use crate::cdp::{CdpClient, CdpError, PageSession};
use crate::chrome::{ChromeLauncher, ChromeSettings};
use crate::fetcher::HttpDirectiveFetcher;
use crate::probe::{ProbeResult, probe_expression};

const CALL_TIMEOUT: Duration = Duration::from_secs(30);
const PROBE_POLL_INTERVAL: Duration = Duration::from_millis(250);
/// How long a found-but-blocked element may stay blocked before giving up.
const SETTLE_WINDOW: Duration = Duration::from_secs(1);

/// Opens one isolated browser context per audit on a shared Chrome.
pub struct CdpCapability {
    launcher: ChromeLauncher,
    client: RwLock<Option<Arc<CdpClient>>>,
    fetcher: HttpDirectiveFetcher,
    viewport: (u32, u32),
}

impl CdpCapability {
    pub fn new(browser: &BrowserConfig, fetch: &FetchConfig) -> Result<Self, CdpError> {
        Ok(Self {
            launcher: ChromeLauncher::new(ChromeSettings::from_config(browser)),
            client: RwLock::new(None),
            fetcher: HttpDirectiveFetcher::new(fetch)?,
            viewport: (browser.viewport_width, browser.viewport_height),
        })
    }

    /// Connected client, reconnecting when the previous connection dropped.
    async fn client(&self) -> Result<Arc<CdpClient>, CdpError> {
        if let Some(client) = self.client.read().await.as_ref() {
            if !client.is_closed() {
                return Ok(client.clone());
            }
        }

        let mut slot = self.client.write().await;
        if let Some(client) = slot.as_ref() {
            if !client.is_closed() {
                return Ok(client.clone());
            }
            warn!("Chrome connection lost, reconnecting");
        }

        self.launcher.ensure_running().await?;
        let endpoint = self.launcher.settings().endpoint();
        let client = Arc::new(CdpClient::connect(&endpoint, CALL_TIMEOUT).await?);
        info!("Connected to Chrome at {}", endpoint);
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Drop the connection and stop Chrome if it was launched here.
    pub async fn shutdown(&self) {
        let _ = self.client.write().await.take();
        self.launcher.shutdown().await;
    }
}

#[async_trait]
impl AutomationCapability for CdpCapability {
    fn id(&self) -> &str {
        "chrome-cdp"
    }

    async fn open_session(&self) -> Result<Box<dyn AutomationSession>, CaptureError> {
        let client = self.client().await?;
        let page = client.new_isolated_page().await?;
        let (width, height) = self.viewport;
        if let Err(e) = page.set_viewport(width, height).await {
            let _ = client.close_page(&page).await;
            return Err(e.into());
        }
        debug!("Opened CDP session {}", page.session_id());
        Ok(Box::new(CdpSession {
            client,
            page,
            fetcher: self.fetcher.clone(),
        }))
    }
}

/// One page in its own browser context.
pub struct CdpSession {
    client: Arc<CdpClient>,
    page: PageSession,
    fetcher: HttpDirectiveFetcher,
}

impl CdpSession {
    async fn probe(&self, expression: &str) -> Result<ProbeResult, InteractionFailure> {
        let value = self.page.evaluate(expression).await?;
        serde_json::from_value(value).map_err(|e| {
            InteractionFailure::new(
                InteractionFailureKind::SessionCrashed,
                format!("unexpected probe result: {}", e),
            )
        })
    }
}

#[async_trait]
impl AutomationSession for CdpSession {
    async fn navigate(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<NavigationOutcome, CaptureError> {
        let result = self.page.navigate(url, timeout).await?;
        if let Some(error) = result.failure() {
            return Ok(NavigationOutcome {
                html: String::new(),
                response_present: false,
                final_url: url.to_string(),
                error_text: Some(error.to_string()),
            });
        }

        Ok(NavigationOutcome {
            html: self.page.content().await?,
            response_present: true,
            final_url: self.page.current_url().await?,
            error_text: None,
        })
    }

    async fn fetch_optional(&self, url: &str) -> Option<String> {
        self.fetcher.fetch_optional(url).await
    }

    async fn interact(
        &self,
        goal: &InteractionGoal,
        timeout: Duration,
    ) -> Result<(), InteractionFailure> {
        let expression = probe_expression(&goal.locator);
        let deadline = Instant::now() + timeout;
        let mut blocked_since: Option<Instant> = None;

        loop {
            let result = self.probe(&expression).await?;
            let now = Instant::now();

            if let ProbeResult::Ready { x, y } = result {
                self.page.click(x, y).await?;
                debug!("Clicked {} at ({}, {})", goal.locator, x, y);
                return Ok(());
            }

            let settled = match result {
                ProbeResult::NotFound { .. } => false,
                _ => now.duration_since(*blocked_since.get_or_insert(now)) >= SETTLE_WINDOW,
            };
            if settled || now >= deadline {
                if let Some(failure) = result.into_failure(&goal.locator) {
                    return Err(failure);
                }
            }

            tokio::time::sleep(PROBE_POLL_INTERVAL.min(deadline.saturating_duration_since(now)))
                .await;
        }
    }

    async fn close(&self) -> Result<(), CaptureError> {
        self.client.close_page(&self.page).await?;
        debug!("Closed CDP session {}", self.page.session_id());
        Ok(())
    }
}
