//! Immutable page snapshot consumed by analyzers.

use serde::{Deserialize, Serialize};

/// A directive file fetched next to the page (e.g. `ai.txt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveFile {
    /// File name as it should appear in details (e.g. "ai.txt").
    pub name: String,
    pub content: String,
}

/// Snapshot of everything the analyzers read for one audit.
///
/// Built once by the Speed Reader and shared read-only (behind an `Arc`)
/// by all analyzers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerContext {
    /// Audited URL.
    pub url: String,
    /// Rendered markup after scripts ran.
    pub html: String,
    /// `robots.txt` contents, if the site serves one.
    pub robots_txt: Option<String>,
    /// Agent-permission file, if the site serves one.
    pub agent_permissions: Option<DirectiveFile>,
    /// Server response body before any script executed.
    pub initial_html: Option<String>,
}

impl AnalyzerContext {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            ..Default::default()
        }
    }

    pub fn with_robots_txt(mut self, robots: impl Into<String>) -> Self {
        self.robots_txt = Some(robots.into());
        self
    }

    pub fn with_agent_permissions(
        mut self,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.agent_permissions = Some(DirectiveFile {
            name: name.into(),
            content: content.into(),
        });
        self
    }

    pub fn with_initial_html(mut self, html: impl Into<String>) -> Self {
        self.initial_html = Some(html.into());
        self
    }

    /// Whether there is any markup to analyze.
    pub fn has_markup(&self) -> bool {
        !self.html.trim().is_empty()
    }
}
