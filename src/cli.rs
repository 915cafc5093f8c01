//! CLI definitions for AgentRank.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use agentrank_protocols::{InteractionGoal, Locator};

/// AgentRank CLI.
#[derive(Parser)]
#[command(name = "agentrank")]
#[command(about = "Score how usable a web page is for AI agents")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Log filter (overrides RUST_LOG and the config file)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Audit a URL
    Audit {
        /// Page to audit (http or https)
        url: String,

        /// Outer deadline in seconds, clamped to the configured window
        #[arg(long)]
        timeout: Option<u64>,

        /// Interaction check as DESCRIPTION=LOCATOR; repeatable.
        /// Locators take a `css:` or `text:` prefix, or are inferred.
        #[arg(long = "click", value_name = "DESCRIPTION=LOCATOR", value_parser = parse_goal)]
        clicks: Vec<InteractionGoal>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report Tier-2 and Chrome availability
    Health,

    /// Validate the configuration file
    CheckConfig,
}

fn parse_goal(raw: &str) -> Result<InteractionGoal, String> {
    let (description, locator) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected DESCRIPTION=LOCATOR, got '{}'", raw))?;
    let (description, locator) = (description.trim(), locator.trim());
    if description.is_empty() || locator.is_empty() {
        return Err(format!("expected DESCRIPTION=LOCATOR, got '{}'", raw));
    }
    Ok(InteractionGoal::new(description, Locator::parse(locator)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_goal() {
        let goal = parse_goal("sign up=css:#signup").unwrap();
        assert_eq!(goal.description, "sign up");
        assert_eq!(goal.locator, Locator::Selector("#signup".into()));

        let goal = parse_goal("pricing = text:See plans").unwrap();
        assert_eq!(goal.locator, Locator::Semantic("See plans".into()));
    }

    #[test]
    fn test_parse_goal_keeps_equals_in_locator() {
        let goal = parse_goal("email=input[name=email]").unwrap();
        assert_eq!(goal.locator, Locator::Selector("input[name=email]".into()));
    }

    #[test]
    fn test_parse_goal_rejects_malformed() {
        assert!(parse_goal("no separator").is_err());
        assert!(parse_goal("=css:#x").is_err());
        assert!(parse_goal("desc=").is_err());
    }

    #[test]
    fn test_cli_parses_audit() {
        let cli = Cli::try_parse_from([
            "agentrank",
            "--log-level",
            "debug",
            "audit",
            "https://example.com",
            "--timeout",
            "60",
            "--click",
            "sign up=#signup",
            "--click",
            "docs=text:Documentation",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Audit {
                url,
                timeout,
                clicks,
                json,
            } => {
                assert_eq!(url, "https://example.com");
                assert_eq!(timeout, Some(60));
                assert_eq!(clicks.len(), 2);
                assert!(json);
            }
            _ => panic!("expected audit command"),
        }
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["agentrank"]).is_err());
    }
}
