//! Configuration schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub weights: WeightsConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub tier2: Tier2Config,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Audit budget and directive locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_timeout")]
    pub default_timeout_seconds: u64,

    #[serde(default = "default_min_timeout")]
    pub min_timeout_seconds: u64,

    #[serde(default = "default_max_timeout")]
    pub max_timeout_seconds: u64,

    /// Fraction of the budget given to Tier-1 capture.
    #[serde(default = "default_capture_share")]
    pub capture_share: f64,

    /// Fraction of the budget given to each Tier-1 interaction attempt.
    #[serde(default = "default_interaction_share")]
    pub interaction_share: f64,

    /// Minimum remaining budget for a Tier-2 escalation to be attempted.
    #[serde(default = "default_tier2_min_budget")]
    pub tier2_min_budget_seconds: u64,

    /// Path of the agent-permission file relative to the site origin.
    #[serde(default = "default_agent_permission_path")]
    pub agent_permission_path: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            default_timeout_seconds: default_timeout(),
            min_timeout_seconds: default_min_timeout(),
            max_timeout_seconds: default_max_timeout(),
            capture_share: default_capture_share(),
            interaction_share: default_interaction_share(),
            tier2_min_budget_seconds: default_tier2_min_budget(),
            agent_permission_path: default_agent_permission_path(),
        }
    }
}

fn default_timeout() -> u64 {
    120
}

fn default_min_timeout() -> u64 {
    30
}

fn default_max_timeout() -> u64 {
    600
}

fn default_capture_share() -> f64 {
    0.4
}

fn default_interaction_share() -> f64 {
    0.15
}

fn default_tier2_min_budget() -> u64 {
    10
}

fn default_agent_permission_path() -> String {
    "/ai.txt".to_string()
}

/// Per-signal weights. Must sum to exactly 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_permissions_weight")]
    pub permissions: u8,

    #[serde(default = "default_structure_weight")]
    pub structure: u8,

    #[serde(default = "default_hostility_weight")]
    pub hostility: u8,

    #[serde(default = "default_accessibility_weight")]
    pub accessibility: u8,

    #[serde(default = "default_hydration_weight")]
    pub hydration: u8,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            permissions: default_permissions_weight(),
            structure: default_structure_weight(),
            hostility: default_hostility_weight(),
            accessibility: default_accessibility_weight(),
            hydration: default_hydration_weight(),
        }
    }
}

impl WeightsConfig {
    /// Weights keyed by analyzer name.
    pub fn entries(&self) -> [(&'static str, u8); 5] {
        [
            ("permissions", self.permissions),
            ("structure", self.structure),
            ("hostility", self.hostility),
            ("accessibility", self.accessibility),
            ("hydration", self.hydration),
        ]
    }

    pub fn total(&self) -> u32 {
        self.entries().iter().map(|(_, w)| *w as u32).sum()
    }
}

fn default_permissions_weight() -> u8 {
    20
}

fn default_structure_weight() -> u8 {
    25
}

fn default_hostility_weight() -> u8 {
    15
}

fn default_accessibility_weight() -> u8 {
    20
}

fn default_hydration_weight() -> u8 {
    20
}

/// Chrome settings for the Speed Reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Chrome profile directory. `~` is expanded.
    #[serde(default)]
    pub profile_dir: Option<String>,

    /// Launch Chrome when nothing listens on `debug_port`.
    #[serde(default = "default_true")]
    pub launch: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: true,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            profile_dir: None,
            launch: true,
        }
    }
}

impl BrowserConfig {
    /// Profile directory, defaulting to `~/.agentrank/browser-profile`.
    pub fn profile_path(&self) -> PathBuf {
        match &self.profile_dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).to_string()),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".agentrank")
                .join("browser-profile"),
        }
    }
}

fn default_debug_port() -> u16 {
    9222
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    720
}

pub(crate) fn default_true() -> bool {
    true
}

/// HTTP settings for optional directive fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "AgentRank/0.1".to_string()
}

/// Which Visual Resolver backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier2Mode {
    /// No backend; every escalation reports unavailability.
    #[default]
    Disabled,
    /// Self-hosted engine, no authentication.
    Local,
    /// Hosted container service, bearer-token authentication.
    Remote,
}

/// Visual Resolver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tier2Config {
    #[serde(default)]
    pub mode: Tier2Mode,

    #[serde(default = "default_tier2_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_true")]
    pub record_video: bool,

    #[serde(default = "default_health_timeout")]
    pub health_timeout_seconds: u64,
}

impl Default for Tier2Config {
    fn default() -> Self {
        Self {
            mode: Tier2Mode::default(),
            endpoint: default_tier2_endpoint(),
            api_key: None,
            record_video: true,
            health_timeout_seconds: default_health_timeout(),
        }
    }
}

fn default_tier2_endpoint() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_health_timeout() -> u64 {
    5
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory. `~` is expanded. Defaults to `~/.agentrank/logs`.
    #[serde(default)]
    pub dir: Option<String>,

    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
            max_files: default_max_log_files(),
        }
    }
}

impl LoggingConfig {
    pub fn dir_path(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).to_string()),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".agentrank")
                .join("logs"),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    30
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
