//! Plain-text audit summary.

use std::fmt::Write;

use agentrank_protocols::{AuditReport, InteractionOutcome};

pub(crate) fn render_text(report: &AuditReport) -> String {
    let mut out = String::new();
    let aggregate = &report.aggregate;

    let _ = writeln!(out, "AgentRank audit {}", report.audit_id);
    let _ = writeln!(out, "URL:      {}", report.url);
    let _ = writeln!(out, "Started:  {}", report.started_at);
    let _ = writeln!(out, "Ready in: {} ms", report.time_to_interactive_ms);
    let _ = writeln!(
        out,
        "Score:    {}/100 ({})",
        aggregate.score,
        aggregate.verdict.as_str().to_uppercase()
    );
    let _ = writeln!(out);

    for signal in &aggregate.signals {
        let _ = writeln!(
            out,
            "[{:<4}] {:<13} {:>3}  (weight {:>2})  {}",
            signal.status.as_str(),
            signal.signal.name(),
            signal.score,
            signal.weight,
            signal.detail
        );
        for rec in &signal.recommendations {
            let _ = writeln!(out, "        - {}", rec);
        }
    }

    if !report.interactions.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Interactions:");
        for outcome in &report.interactions {
            render_interaction(&mut out, outcome);
        }
    }

    out
}

fn render_interaction(out: &mut String, outcome: &InteractionOutcome) {
    let verdict = if outcome.succeeded() { "ok" } else { "FAILED" };
    let _ = writeln!(
        out,
        "  {} \"{}\" ({}) via {}",
        verdict, outcome.goal.description, outcome.goal.locator, outcome.tier
    );
    if let Some(failure) = &outcome.tier1_failure {
        let _ = writeln!(out, "      tier1: {}", failure);
    }
    if let Some(decision) = &outcome.decision {
        match decision.suppressed_by {
            Some(reason) => {
                let _ = writeln!(out, "      escalation suppressed: {:?}", reason);
            }
            None if decision.escalates() => {
                let _ = writeln!(
                    out,
                    "      escalated (est. {:.0}s, {} units)",
                    decision.estimated_cost.seconds, decision.estimated_cost.units
                );
            }
            None => {}
        }
    }
    if let Some(error) = &outcome.tier2_error {
        let _ = writeln!(out, "      tier2: {}", error);
    }
    if let Some(resolution) = &outcome.resolution {
        if let Some(action) = &resolution.action_taken {
            let _ = writeln!(out, "      tier2: {} ({} steps)", action, resolution.steps);
        }
        if let Some(recording) = &resolution.recording_url {
            let _ = writeln!(out, "      recording: {}", recording);
        }
    }
}
