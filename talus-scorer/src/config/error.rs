//! Error type raised when validating scoring configuration.

use thiserror::Error;

/// Errors returned by [`ScoringConfig::validate`](crate::ScoringConfig::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    /// A tunable was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Dotted path of the offending setting.
        field: String,
        /// Value read from the configuration.
        value: f64,
    },
    /// A tunable fell outside its permitted range.
    #[error("{field} = {value} is outside the permitted range {expected}")]
    OutOfRange {
        /// Dotted path of the offending setting.
        field: String,
        /// Value read from the configuration.
        value: f64,
        /// Human-readable description of the permitted range.
        expected: &'static str,
    },
    /// Every weather factor weight was zero.
    #[error("at least one weather factor weight must be positive")]
    ZeroFactorWeights,
    /// Severity multipliers were not ordered fatal, serious, minor, unknown.
    #[error("severity multipliers must not increase from fatal to unknown")]
    SeverityOrder,
    /// Batch chunks must hold at least one reference point.
    #[error("batch chunk size must be at least one")]
    ZeroChunkSize,
}
