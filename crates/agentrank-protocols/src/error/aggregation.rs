//! Aggregation errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregationError {
    /// The weight catalog does not sum to 100.
    #[error("Signal weights sum to {0}, expected 100")]
    WeightSum(u32),

    /// A catalog weight lies outside `1..=100`.
    #[error("Weight {weight} for {signal} is outside 1..=100")]
    InvalidWeight { signal: String, weight: u8 },

    #[error("Missing result for signal: {0}")]
    MissingSignal(String),

    #[error("Duplicate result for signal: {0}")]
    DuplicateSignal(String),

    #[error("Result for {signal} carries weight {actual}, catalog says {expected}")]
    WeightMismatch {
        signal: String,
        expected: u8,
        actual: u8,
    },
}
