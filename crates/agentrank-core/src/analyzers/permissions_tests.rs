use super::*;

fn ctx() -> AnalyzerContext {
    AnalyzerContext::new("https://example.com", "<main></main>")
}

fn analyze(ctx: &AnalyzerContext) -> SignalResult {
    PermissionsAnalyzer::default().analyze(ctx)
}

#[test]
fn test_no_directives_pass() {
    let result = analyze(&ctx());
    assert_eq!(result.status, SignalStatus::Pass);
    assert_eq!(result.score, 100);
    assert!(result.detail.to_lowercase().contains("no restriction"));
}

#[test]
fn test_wildcard_disallow_root_fails() {
    let result = analyze(&ctx().with_robots_txt("User-agent: *\nDisallow: /"));
    assert_eq!(result.status, SignalStatus::Fail);
    assert_eq!(result.score, 0);
    assert!(result.detail.to_lowercase().contains("blocks all"));
}

#[test]
fn test_named_agent_blocked_warns() {
    let robots = "User-agent: *\nAllow: /\n\nUser-agent: GPTBot\nDisallow: /\n";
    let result = analyze(&ctx().with_robots_txt(robots));
    assert_eq!(result.status, SignalStatus::Warn);
    assert_eq!(result.score, 50);
    assert!(result.detail.contains("GPTBot"));
}

#[test]
fn test_multiple_named_agents_listed_once() {
    let robots = "\
User-agent: GPTBot
User-agent: ClaudeBot
Disallow: /

User-agent: gptbot
Disallow: /

User-agent: *
Disallow: /admin
";
    let result = analyze(&ctx().with_robots_txt(robots));
    assert_eq!(result.status, SignalStatus::Warn);
    assert!(result.detail.contains("GPTBot, ClaudeBot"));
    assert_eq!(result.detail.matches("GPTBot").count(), 1);
}

#[test]
fn test_partial_disallow_passes() {
    let robots = "User-agent: *\nDisallow: /private\n\nUser-agent: CCBot\nDisallow: /tmp";
    let result = analyze(&ctx().with_robots_txt(robots));
    assert_eq!(result.status, SignalStatus::Pass);
    assert_eq!(result.score, 100);
}

#[test]
fn test_allow_root_overrides_disallow() {
    let robots = "User-agent: *\nDisallow: /\nAllow: /";
    let result = analyze(&ctx().with_robots_txt(robots));
    assert_eq!(result.status, SignalStatus::Pass);
}

#[test]
fn test_agent_file_allow_false_warns_and_names_file() {
    let ctx = ctx()
        .with_robots_txt("User-agent: *\nAllow: /")
        .with_agent_permissions("ai.txt", "# agents\nAllow: false\n");
    let result = analyze(&ctx);
    assert_eq!(result.status, SignalStatus::Warn);
    assert!(result.detail.contains("ai.txt"));
}

#[test]
fn test_agent_file_without_robots() {
    let ctx = ctx().with_agent_permissions("ai.txt", "User-agent: *\nDisallow: /");
    let result = analyze(&ctx);
    assert_eq!(result.status, SignalStatus::Warn);
    assert!(result.detail.contains("ai.txt"));
}

#[test]
fn test_agent_file_permissive_passes() {
    let ctx = ctx().with_agent_permissions("ai.txt", "Allow: true");
    let result = analyze(&ctx);
    assert_eq!(result.status, SignalStatus::Pass);
}

#[test]
fn test_named_block_and_agent_file_combined() {
    let ctx = ctx()
        .with_robots_txt("User-agent: PerplexityBot\nDisallow: /")
        .with_agent_permissions("ai.txt", "allow: FALSE");
    let result = analyze(&ctx);
    assert_eq!(result.status, SignalStatus::Warn);
    assert!(result.detail.contains("PerplexityBot"));
    assert!(result.detail.contains("ai.txt"));
    assert_eq!(result.recommendations.len(), 2);
}

#[test]
fn test_wildcard_fail_takes_precedence_over_agent_file() {
    let ctx = ctx()
        .with_robots_txt("User-agent: *\nDisallow: /")
        .with_agent_permissions("ai.txt", "Allow: false");
    let result = analyze(&ctx);
    assert_eq!(result.status, SignalStatus::Fail);
}

#[test]
fn test_empty_robots_passes() {
    let result = analyze(&ctx().with_robots_txt(""));
    assert_eq!(result.status, SignalStatus::Pass);
    assert_eq!(result.score, 100);
}

#[test]
fn test_parse_groups_ignores_comments_and_orphan_rules() {
    let groups = parse_groups(
        "Disallow: /\n# comment\nUSER-AGENT: Bot # trailing\nDISALLOW: / # all\nSitemap: https://x/s.xml",
    );
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].agents, vec!["Bot".to_string()]);
    assert!(groups[0].blocks_root());
}

#[test]
fn test_parse_groups_splits_on_agent_after_rules() {
    let groups = parse_groups("User-agent: a\nUser-agent: b\nDisallow: /x\nUser-agent: c\nAllow: /");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].agents.len(), 2);
    assert_eq!(groups[1].agents, vec!["c".to_string()]);
}

#[test]
fn test_idempotent() {
    let ctx = ctx().with_robots_txt("User-agent: GPTBot\nDisallow: /");
    assert_eq!(analyze(&ctx), analyze(&ctx));
}
