//! Analyzer trait.

use crate::context::AnalyzerContext;
use crate::signal::{Signal, SignalResult};

/// A pure function from a page snapshot to one signal result.
///
/// Implementations must not perform I/O, must not panic on any input, and
/// must return the same result for the same context. Analyzers are run
/// concurrently, so they are `Send + Sync`.
pub trait Analyzer: Send + Sync {
    /// The signal this analyzer produces.
    fn signal(&self) -> Signal;

    /// Weight attached to every result of this analyzer.
    fn weight(&self) -> u8 {
        self.signal().default_weight()
    }

    /// Analyze the snapshot.
    fn analyze(&self, ctx: &AnalyzerContext) -> SignalResult;
}
