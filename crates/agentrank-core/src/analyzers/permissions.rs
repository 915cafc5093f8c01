//! Permissions analyzer: robots directives and the agent-permission file.

use agentrank_protocols::{Analyzer, AnalyzerContext, Signal, SignalResult, SignalStatus};

/// One `User-agent` group of a robots-style file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveGroup {
    pub agents: Vec<String>,
    pub disallows_root: bool,
    pub allows_root: bool,
}

impl DirectiveGroup {
    /// Root is blocked when `Disallow: /` is present without an `Allow: /` override.
    pub fn blocks_root(&self) -> bool {
        self.disallows_root && !self.allows_root
    }

    fn has_wildcard(&self) -> bool {
        self.agents.iter().any(|a| a == "*")
    }
}

fn is_root_path(path: &str) -> bool {
    matches!(path, "/" | "/*")
}

/// Parse robots-style text into groups.
///
/// Consecutive `User-agent` lines share the rules that follow them. Rules
/// before the first `User-agent` line, comments and unknown keys are ignored.
pub fn parse_groups(text: &str) -> Vec<DirectiveGroup> {
    let mut groups = Vec::new();
    let mut current: Option<DirectiveGroup> = None;
    let mut seen_rule = false;

    for raw in text.lines() {
        let line = raw.split('#').next().unwrap_or("").trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                if seen_rule {
                    if let Some(group) = current.take() {
                        groups.push(group);
                    }
                    seen_rule = false;
                }
                current
                    .get_or_insert_with(DirectiveGroup::default)
                    .agents
                    .push(value.to_string());
            }
            "disallow" | "allow" => {
                let Some(group) = current.as_mut() else {
                    continue;
                };
                seen_rule = true;
                if is_root_path(value) {
                    if key == "disallow" {
                        group.disallows_root = true;
                    } else {
                        group.allows_root = true;
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(group) = current {
        groups.push(group);
    }
    groups
}

/// Whether the wildcard agent is blocked from the root path.
pub fn wildcard_blocks_root(groups: &[DirectiveGroup]) -> bool {
    groups.iter().any(|g| g.has_wildcard() && g.blocks_root())
}

/// Named (non-wildcard) agents blocked from the root path, first-seen order.
pub fn blocked_named_agents(groups: &[DirectiveGroup]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for group in groups.iter().filter(|g| g.blocks_root()) {
        for agent in group.agents.iter().filter(|a| a.as_str() != "*") {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(agent)) {
                names.push(agent.clone());
            }
        }
    }
    names
}

/// Whether an agent-permission file declares that agents are not allowed.
///
/// Either an explicit `Allow: false` line or a robots-style wildcard block.
pub fn agent_file_denies(text: &str) -> bool {
    let explicit = text.lines().any(|raw| {
        let line = raw.split('#').next().unwrap_or("").trim();
        line.split_once(':').is_some_and(|(key, value)| {
            key.trim().eq_ignore_ascii_case("allow") && value.trim().eq_ignore_ascii_case("false")
        })
    });
    explicit || wildcard_blocks_root(&parse_groups(text))
}

pub struct PermissionsAnalyzer {
    weight: u8,
}

impl PermissionsAnalyzer {
    pub fn new(weight: u8) -> Self {
        Self { weight }
    }

    fn result(&self, status: SignalStatus, score: u8, detail: impl Into<String>) -> SignalResult {
        SignalResult::new(Signal::Permissions, self.weight, status, score, detail)
    }
}

impl Default for PermissionsAnalyzer {
    fn default() -> Self {
        Self::new(Signal::Permissions.default_weight())
    }
}

impl Analyzer for PermissionsAnalyzer {
    fn signal(&self) -> Signal {
        Signal::Permissions
    }

    fn weight(&self) -> u8 {
        self.weight
    }

    fn analyze(&self, ctx: &AnalyzerContext) -> SignalResult {
        if ctx.robots_txt.is_none() && ctx.agent_permissions.is_none() {
            return self.result(
                SignalStatus::Pass,
                100,
                "No restriction declared: no robots.txt or agent-permission file",
            );
        }

        let groups = ctx.robots_txt.as_deref().map(parse_groups).unwrap_or_default();

        if wildcard_blocks_root(&groups) {
            return self
                .result(
                    SignalStatus::Fail,
                    0,
                    "robots.txt blocks all agents (User-agent: * / Disallow: /)",
                )
                .with_recommendations([
                    "Remove the site-wide Disallow for User-agent: * or add Allow rules for public pages",
                    "Declare explicit rules for the AI agents you want to admit",
                ]);
        }

        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let named = blocked_named_agents(&groups);
        if !named.is_empty() {
            issues.push(format!("robots.txt blocks named agents: {}", named.join(", ")));
            recommendations.push(format!(
                "Review whether blocking {} is intended; blocked agents cannot read or act on this page",
                named.join(", ")
            ));
        }

        if let Some(file) = &ctx.agent_permissions {
            if agent_file_denies(&file.content) {
                issues.push(format!("{} declares that agents are not allowed", file.name));
                recommendations.push(format!(
                    "Update {} if automated agents should be permitted",
                    file.name
                ));
            }
        }

        if issues.is_empty() {
            return self.result(SignalStatus::Pass, 100, "Agents are permitted by declared directives");
        }

        self.result(SignalStatus::Warn, 50, issues.join("; "))
            .with_recommendations(recommendations)
    }
}

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;
