//! Tier-1 engine: context capture and structural interaction attempts over
//! an [`AutomationSession`].

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

use agentrank_protocols::{
    AnalyzerContext, AutomationSession, CaptureError, InteractionFailure, InteractionFailureKind,
    InteractionGoal,
};

/// Extra time granted on top of an interaction sub-timeout before the
/// attempt is abandoned as `Timeout`. Sessions report `ElementNotFound`
/// themselves when locating runs out of time.
const INTERACTION_GRACE: Duration = Duration::from_secs(1);

/// Owns the automation session of one audit.
///
/// Call [`SessionGuard::release`] on every normal exit. If the guard is
/// dropped without release (panic, cancelled future) the close is spawned
/// on the current runtime instead.
pub struct SessionGuard {
    session: Arc<dyn AutomationSession>,
    released: bool,
}

impl SessionGuard {
    pub fn new(session: Box<dyn AutomationSession>) -> Self {
        Self {
            session: Arc::from(session),
            released: false,
        }
    }

    pub fn session(&self) -> &dyn AutomationSession {
        self.session.as_ref()
    }

    /// Close the session and wait for it.
    pub async fn release(mut self) -> Result<(), CaptureError> {
        self.released = true;
        self.session.close().await
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let session = Arc::clone(&self.session);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("Session guard dropped without release, closing in background");
                handle.spawn(async move {
                    if let Err(e) = session.close().await {
                        warn!("Background session close failed: {}", e);
                    }
                });
            }
            Err(_) => warn!("Session guard dropped outside a runtime, session not closed"),
        }
    }
}

/// A captured page plus how long it took to become interactive.
#[derive(Debug, Clone)]
pub struct Capture {
    pub context: AnalyzerContext,
    pub time_to_interactive: Duration,
}

/// Tier-1 engine.
#[derive(Debug, Clone)]
pub struct SpeedReader {
    agent_permission_path: String,
}

impl SpeedReader {
    pub fn new(agent_permission_path: impl Into<String>) -> Self {
        Self {
            agent_permission_path: agent_permission_path.into(),
        }
    }

    /// Navigate to `url` and build the analyzer context.
    ///
    /// Directive files and the pre-script response body are fetched
    /// concurrently once the page is interactive; any of them may be absent.
    pub async fn capture(
        &self,
        session: &dyn AutomationSession,
        url: &Url,
        timeout: Duration,
    ) -> Result<Capture, CaptureError> {
        let started = Instant::now();
        let navigation = tokio::time::timeout(timeout, session.navigate(url.as_str(), timeout))
            .await
            .map_err(|_| CaptureError::Timeout(timeout))??;
        if !navigation.response_present {
            return Err(CaptureError::ResourceUnreachable(
                navigation
                    .error_text
                    .unwrap_or_else(|| format!("No response from {}", url)),
            ));
        }
        let time_to_interactive = started.elapsed();
        debug!(
            url = %url,
            final_url = %navigation.final_url,
            tti_ms = time_to_interactive.as_millis() as u64,
            "Page interactive"
        );

        let robots_url = directive_url(url, "/robots.txt");
        let agent_url = directive_url(url, &self.agent_permission_path);
        let (robots_txt, agent_file, initial_html) = tokio::join!(
            fetch_directive(session, robots_url.as_deref()),
            fetch_directive(session, agent_url.as_deref()),
            session.fetch_optional(url.as_str()),
        );

        let mut context = AnalyzerContext::new(url.as_str(), navigation.html);
        context.robots_txt = robots_txt;
        context.initial_html = initial_html;
        if let Some(content) = agent_file {
            context = context.with_agent_permissions(self.agent_file_name(), content);
        }

        Ok(Capture {
            context,
            time_to_interactive,
        })
    }

    /// Try the goal on the live page.
    pub async fn attempt_interaction(
        &self,
        session: &dyn AutomationSession,
        goal: &InteractionGoal,
        timeout: Duration,
    ) -> Result<(), InteractionFailure> {
        match tokio::time::timeout(timeout + INTERACTION_GRACE, session.interact(goal, timeout)).await
        {
            Ok(result) => result,
            Err(_) => Err(InteractionFailure::new(
                InteractionFailureKind::Timeout,
                format!("Interaction did not finish within {:?}", timeout),
            )),
        }
    }

    /// Last path segment of the agent-permission path, e.g. "ai.txt".
    pub fn agent_file_name(&self) -> String {
        self.agent_permission_path
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or("ai.txt")
            .to_string()
    }
}

impl Default for SpeedReader {
    fn default() -> Self {
        Self::new("/ai.txt")
    }
}

/// `path` resolved against the origin of `page`.
pub fn directive_url(page: &Url, path: &str) -> Option<String> {
    page.join(path).ok().map(String::from)
}

async fn fetch_directive(session: &dyn AutomationSession, url: Option<&str>) -> Option<String> {
    match url {
        Some(url) => session.fetch_optional(url).await,
        None => None,
    }
}

#[cfg(test)]
#[path = "speed_reader_tests.rs"]
mod tests;
