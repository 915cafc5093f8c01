//! Signal analyzers and the fixed registry that runs them.

mod accessibility;
mod hostility;
mod hydration;
mod markup;
mod permissions;
mod structure;

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use agentrank_protocols::{Analyzer, AnalyzerContext, AuditError, Signal, SignalResult};

use crate::aggregator::WeightCatalog;

pub use accessibility::AccessibilityAnalyzer;
pub use hostility::{BOT_BLOCKERS, HostilityAnalyzer};
pub use hydration::HydrationAnalyzer;
pub use permissions::{
    DirectiveGroup, PermissionsAnalyzer, agent_file_denies, blocked_named_agents, parse_groups,
    wildcard_blocks_root,
};
pub use structure::{NON_SEMANTIC_TAGS, SEMANTIC_TAGS, StructureAnalyzer};

/// The closed set of analyzers, one per [`Signal`].
#[derive(Clone)]
pub struct AnalyzerSet {
    analyzers: Vec<Arc<dyn Analyzer>>,
}

impl AnalyzerSet {
    /// Build every analyzer with its catalog weight.
    pub fn new(catalog: &WeightCatalog) -> Self {
        let analyzers = Signal::ALL
            .iter()
            .map(|signal| {
                let weight = catalog.weight(*signal);
                let analyzer: Arc<dyn Analyzer> = match signal {
                    Signal::Permissions => Arc::new(PermissionsAnalyzer::new(weight)),
                    Signal::Structure => Arc::new(StructureAnalyzer::new(weight)),
                    Signal::Hostility => Arc::new(HostilityAnalyzer::new(weight)),
                    Signal::Accessibility => Arc::new(AccessibilityAnalyzer::new(weight)),
                    Signal::Hydration => Arc::new(HydrationAnalyzer::new(weight)),
                };
                analyzer
            })
            .collect();
        Self { analyzers }
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.analyzers.iter().map(|a| a.signal()).collect()
    }

    /// Run every analyzer sequentially on the current task.
    pub fn run_sequential(&self, ctx: &AnalyzerContext) -> Vec<SignalResult> {
        self.analyzers.iter().map(|a| a.analyze(ctx)).collect()
    }

    /// Run every analyzer concurrently over the shared context.
    ///
    /// Results are returned in signal order regardless of completion order.
    /// A panicking analyzer is a defect and aborts the audit.
    pub async fn run_all(&self, ctx: Arc<AnalyzerContext>) -> Result<Vec<SignalResult>, AuditError> {
        let mut tasks = JoinSet::new();
        for analyzer in &self.analyzers {
            let analyzer = Arc::clone(analyzer);
            let ctx = Arc::clone(&ctx);
            tasks.spawn(async move { analyzer.analyze(&ctx) });
        }

        let mut results = Vec::with_capacity(self.analyzers.len());
        while let Some(joined) = tasks.join_next().await {
            let result = joined
                .map_err(|e| AuditError::Internal(format!("Analyzer task failed: {}", e)))?;
            debug!(
                signal = %result.signal,
                status = %result.status,
                score = result.score,
                "Analyzer finished"
            );
            results.push(result);
        }

        results.sort_by_key(|r| r.signal);
        Ok(results)
    }
}

impl Default for AnalyzerSet {
    fn default() -> Self {
        Self::new(&WeightCatalog::default())
    }
}
