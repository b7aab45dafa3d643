//! Score a consumer's exposure at a reference point.
//!
//! The `RiskScorer` trait maps a [`ScoreRequest`](crate::ScoreRequest) to a
//! [`ScoreResult`](crate::ScoreResult) in `0.0..=100.0`.

use crate::{MAX_RISK_SCORE, ScoreRequest, ScoreResult};

/// Calculate a risk score for one consumer at one reference point.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so scorers can be
/// shared across worker threads. The method is infallible; implementers
/// return a zero-risk result carrying an explanatory note when no evidence
/// is available.
///
/// Implementations must:
/// - Produce finite scores.
/// - Return values within `0.0..=100.0`.
/// - Return bit-identical results for identical inputs.
///
/// Use [`RiskScorer::sanitise`] to apply the first two guards.
///
/// # Examples
///
/// ```rust
/// use talus_core::{RiskScorer, ScoreNote, ScoreRequest, ScoreResult};
///
/// struct NullScorer;
///
/// impl RiskScorer for NullScorer {
///     fn score(&self, request: &ScoreRequest<'_>) -> ScoreResult {
///         ScoreResult::empty(
///             request.reference_point.id,
///             request.target_date,
///             ScoreNote::NoIncidents,
///         )
///     }
/// }
///
/// assert_eq!(NullScorer::sanitise(f64::NAN), 0.0);
/// assert_eq!(NullScorer::sanitise(140.0), 100.0);
/// assert!(NullScorer::sanitise(-0.0).is_sign_positive());
/// ```
pub trait RiskScorer: Send + Sync {
    /// Score `request`.
    fn score(&self, request: &ScoreRequest<'_>) -> ScoreResult;

    /// Clamp and validate a raw risk score.
    ///
    /// Returns a positive `0.0` for non-finite, negative and signed-zero
    /// values and clamps the rest to `0.0..=100.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if !score.is_finite() || score <= 0.0 {
            return 0.0;
        }
        score.min(MAX_RISK_SCORE)
    }
}
