//! AgentRank - agent-readiness scoring for web pages
//!
//! Main entry point for the AgentRank CLI.

mod cli;
mod render;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use agentrank_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};
use agentrank_core::AuditEngine;
use agentrank_protocols::{AutomationCapability, InteractionGoal, VisualResolver};
use agentrank_speed_reader_cdp::{ChromeLauncher, ChromeSettings, CdpCapability};

use cli::{Cli, Commands};

fn init_tracing(
    logging: &LoggingConfig,
    level: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = logging.dir_path();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("agentrank")
        .filename_suffix("log")
        .max_log_files(logging.max_files)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&logging.level)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = ConfigLoader::load_or_default(&cli.config)?;
    init_tracing(&config.logging, cli.log_level.as_deref())?;

    match cli.command {
        Commands::Audit {
            url,
            timeout,
            clicks,
            json,
        } => run_audit(&config, &url, timeout, &clicks, json).await,
        Commands::Health => run_health(&config).await,
        Commands::CheckConfig => check_config(&cli.config, &config),
    }
}

/// Refuse to run with an invalid configuration; log warnings.
fn ensure_valid(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        warn!("Config warning at {}: {}", warning.path, warning.message);
    }
    if !result.is_valid() {
        for err in &result.errors {
            error!("Config error at {}: {}", err.path, err.message);
        }
        return Err(format!(
            "configuration has {} error(s); run `agentrank check-config`",
            result.errors.len()
        )
        .into());
    }
    Ok(())
}

async fn run_audit(
    config: &Config,
    url: &str,
    timeout: Option<u64>,
    goals: &[InteractionGoal],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_valid(config)?;
    info!("Starting AgentRank v{}", env!("CARGO_PKG_VERSION"));

    let capability = Arc::new(CdpCapability::new(&config.browser, &config.fetch)?);
    let resolver = agentrank_visual_resolver::from_config(&config.tier2);
    let engine = AuditEngine::new(
        config,
        capability.clone() as Arc<dyn AutomationCapability>,
        resolver,
    )?;

    let result = engine
        .run_audit_with_goals(url, timeout.map(Duration::from_secs), goals)
        .await;
    capability.shutdown().await;

    let report = result?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render_text(&report));
    }
    Ok(())
}

async fn run_health(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = agentrank_visual_resolver::from_config(&config.tier2);
    let available = resolver.is_available().await;
    println!(
        "Tier-2 ({}): {}",
        resolver.id(),
        if available { "available" } else { "unavailable" }
    );

    let launcher = ChromeLauncher::new(ChromeSettings::from_config(&config.browser));
    let chrome = if launcher.is_running().await {
        "running".to_string()
    } else if config.browser.launch {
        match ChromeLauncher::find_chrome() {
            Some(path) => format!("not running, will launch {}", path.display()),
            None => "not running and no Chrome installation found".to_string(),
        }
    } else {
        "not running (launch disabled)".to_string()
    };
    println!("Chrome ({}): {}", launcher.settings().endpoint(), chrome);
    Ok(())
}

fn check_config(path: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        println!("Config: {}", path.display());
    } else {
        println!("Config: {} not found, using defaults", path.display());
    }

    let result = ConfigValidator::validate(config);
    for err in &result.errors {
        println!("error: {}: {}", err.path, err.message);
    }
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }

    if result.is_valid() {
        println!("OK ({} warning(s))", result.warnings.len());
        Ok(())
    } else {
        Err(format!("{} configuration error(s)", result.errors.len()).into())
    }
}
