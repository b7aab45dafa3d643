//! Turn adjusted influences into the bounded score and ranked breakdown.

use talus_core::{IncidentContribution, MAX_RISK_SCORE, ScoreMetadata, ScoreResult};

use crate::NormalizerConfig;

/// `risk = clamp(Σ influence × k, 0, 100)` plus a top-N ranking.
///
/// `k` is an empirically tuned constant exposed through
/// [`NormalizerConfig::scale`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskNormalizer {
    scale: f64,
    top_n: usize,
    epsilon: f64,
}

impl RiskNormalizer {
    /// Build from configuration.
    #[must_use]
    pub const fn new(config: &NormalizerConfig) -> Self {
        Self {
            scale: config.scale,
            top_n: config.top_n,
            epsilon: config.epsilon,
        }
    }

    /// Influences below this are not counted as contributing.
    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of incidents kept in the breakdown.
    #[must_use]
    pub const fn top_n(&self) -> usize {
        self.top_n
    }

    /// Whether an adjusted influence counts as contributing.
    #[must_use]
    pub fn contributes(&self, influence: f64) -> bool {
        influence >= self.epsilon && influence > 0.0
    }

    /// Scale and clamp a summed influence. Non-finite and non-positive sums,
    /// including the `-0.0` of an empty sum, score a positive zero.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "risk scales the influence sum")]
    pub fn risk(&self, influence_sum: f64) -> f64 {
        let risk = influence_sum * self.scale;
        if risk.is_finite() && risk > 0.0 {
            risk.min(MAX_RISK_SCORE)
        } else {
            0.0
        }
    }

    /// Build the final result from adjusted contributions in snapshot order.
    #[must_use]
    pub fn finish(
        &self,
        contributions: Vec<IncidentContribution>,
        metadata: ScoreMetadata,
    ) -> ScoreResult {
        let sum: f64 = contributions.iter().map(|c| c.influence).sum();
        self.finish_with_sum(sum, contributions, metadata)
    }

    /// Build the final result from an influence sum taken in snapshot order
    /// and the contributions that may appear in the breakdown, also in
    /// snapshot order. Contributions below the threshold are dropped.
    #[must_use]
    pub fn finish_with_sum(
        &self,
        influence_sum: f64,
        mut contributions: Vec<IncidentContribution>,
        metadata: ScoreMetadata,
    ) -> ScoreResult {
        contributions.retain(|c| self.contributes(c.influence));
        let contributing_incidents = contributions.len();
        rank(&mut contributions);
        contributions.truncate(self.top_n);
        ScoreResult {
            risk_score: self.risk(influence_sum),
            contributing_incidents,
            top_incidents: contributions,
            metadata,
        }
    }
}

/// Sort by influence, strongest first; the stable sort keeps snapshot order
/// among ties.
pub fn rank(contributions: &mut [IncidentContribution]) {
    contributions.sort_by(|a, b| b.influence.total_cmp(&a.influence));
}
