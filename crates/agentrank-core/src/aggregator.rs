//! Weight catalog and score aggregation.

use std::collections::BTreeMap;

use agentrank_config::WeightsConfig;
use agentrank_protocols::{AggregateReport, AggregationError, Signal, SignalResult, SignalStatus};

/// Validated signal weights.
///
/// Every signal has exactly one weight in `1..=100` and the weights sum to 100.
/// A catalog can only be obtained through [`WeightCatalog::new`], so an engine
/// holding one never needs to re-check the invariant per audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightCatalog {
    weights: BTreeMap<Signal, u8>,
}

impl WeightCatalog {
    pub fn new(
        entries: impl IntoIterator<Item = (Signal, u8)>,
    ) -> Result<Self, AggregationError> {
        let mut weights = BTreeMap::new();
        for (signal, weight) in entries {
            if !(1..=100).contains(&weight) {
                return Err(AggregationError::InvalidWeight {
                    signal: signal.name().to_string(),
                    weight,
                });
            }
            if weights.insert(signal, weight).is_some() {
                return Err(AggregationError::DuplicateSignal(signal.name().to_string()));
            }
        }

        if let Some(missing) = Signal::ALL.iter().find(|s| !weights.contains_key(s)) {
            return Err(AggregationError::MissingSignal(missing.name().to_string()));
        }

        let total: u32 = weights.values().map(|w| u32::from(*w)).sum();
        if total != 100 {
            return Err(AggregationError::WeightSum(total));
        }

        Ok(Self { weights })
    }

    pub fn from_config(config: &WeightsConfig) -> Result<Self, AggregationError> {
        Self::new([
            (Signal::Permissions, config.permissions),
            (Signal::Structure, config.structure),
            (Signal::Hostility, config.hostility),
            (Signal::Accessibility, config.accessibility),
            (Signal::Hydration, config.hydration),
        ])
    }

    pub fn weight(&self, signal: Signal) -> u8 {
        self.weights
            .get(&signal)
            .copied()
            .unwrap_or_else(|| signal.default_weight())
    }
}

impl Default for WeightCatalog {
    fn default() -> Self {
        let weights = Signal::ALL
            .iter()
            .map(|s| (*s, s.default_weight()))
            .collect();
        Self { weights }
    }
}

/// Combines one result per signal into an [`AggregateReport`].
#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    catalog: WeightCatalog,
}

impl ScoreAggregator {
    pub fn new(catalog: WeightCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &WeightCatalog {
        &self.catalog
    }

    /// Aggregate a complete result set.
    ///
    /// The set must contain exactly one result per signal, each carrying the
    /// catalog weight. Results may arrive in any order; the report lists them
    /// in signal order. The score is the weighted mean rounded half-up, and
    /// the verdict is the most severe status present.
    pub fn aggregate(
        &self,
        results: Vec<SignalResult>,
    ) -> Result<AggregateReport, AggregationError> {
        let mut by_signal: BTreeMap<Signal, SignalResult> = BTreeMap::new();
        for result in results {
            let expected = self.catalog.weight(result.signal);
            if result.weight != expected {
                return Err(AggregationError::WeightMismatch {
                    signal: result.signal.name().to_string(),
                    expected,
                    actual: result.weight,
                });
            }
            let signal = result.signal;
            if by_signal.insert(signal, result).is_some() {
                return Err(AggregationError::DuplicateSignal(signal.name().to_string()));
            }
        }

        if let Some(missing) = Signal::ALL.iter().find(|s| !by_signal.contains_key(s)) {
            return Err(AggregationError::MissingSignal(missing.name().to_string()));
        }

        let signals: Vec<SignalResult> = by_signal.into_values().collect();

        // Weights sum to 100, so the weighted mean is the weighted sum / 100.
        let weighted: u32 = signals
            .iter()
            .map(|r| u32::from(r.score) * u32::from(r.weight))
            .sum();
        let score = ((weighted + 50) / 100).min(100) as u8;

        let verdict = signals
            .iter()
            .map(|r| r.status)
            .max()
            .unwrap_or(SignalStatus::Pass);

        Ok(AggregateReport {
            score,
            verdict,
            signals,
        })
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
