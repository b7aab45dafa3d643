//! The configured scoring pipeline.

use std::collections::BTreeMap;

use talus_core::{BatchRequest, ConsumerId, RiskScorer, ScoreNote, ScoreRequest, ScoreResult};

use crate::{
    AccidentInfluenceModel, BatchScorer, LocationPrecomputationEngine, RiskNormalizer,
    RouteAdjustmentEngine, ScoringConfig, TuningError,
};

/// Deterministic incident-and-weather risk scorer.
///
/// Single requests and batches run the same precompute and adjustment
/// stages, so a consumer scored alone receives the bits it would receive in
/// a batch.
///
/// # Examples
/// ```
/// use talus_core::test_support::{date, incident, reference_point};
/// use talus_core::{ConsumerAdjustment, PointConditions, RiskScorer, RouteCategory, ScoreRequest};
/// use talus_scorer::RiskEngine;
///
/// let engine = RiskEngine::default();
/// let point = reference_point(1, 46.0, 7.0);
/// let consumer = ConsumerAdjustment::new(RouteCategory::Alpine);
/// let incidents = [incident(1, 46.0, 7.0, date(2024, 7, 1)).with_category(RouteCategory::Alpine)];
/// let result = engine.score(&ScoreRequest {
///     reference_point: &point,
///     consumer: &consumer,
///     target_date: date(2024, 7, 8),
///     incidents: &incidents,
///     conditions: &PointConditions::unavailable(),
/// });
/// assert!(result.risk_score > 0.0 && result.risk_score <= 100.0);
/// assert_eq!(result.contributing_incidents, 1);
/// ```
#[derive(Debug, Clone)]
pub struct RiskEngine {
    config: ScoringConfig,
    model: AccidentInfluenceModel,
    adjuster: RouteAdjustmentEngine,
}

impl RiskEngine {
    /// Validate `config` and build every stage from it.
    ///
    /// # Errors
    /// Returns [`TuningError`] when a tunable is out of range.
    pub fn new(config: ScoringConfig) -> Result<Self, TuningError> {
        config.validate().map(Self::assemble)
    }

    /// Build every stage from an already validated `config`.
    fn assemble(config: ScoringConfig) -> Self {
        let model = AccidentInfluenceModel::new(&config);
        let adjuster = RouteAdjustmentEngine::new(
            *model.route_type(),
            *model.grade(),
            RiskNormalizer::new(&config.normalizer),
        );
        Self {
            config,
            model,
            adjuster,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// The influence model shared by both paths.
    #[must_use]
    pub const fn model(&self) -> &AccidentInfluenceModel {
        &self.model
    }

    /// Score every consumer of every point in `request`.
    #[must_use]
    pub fn score_batch(&self, request: &BatchRequest<'_>) -> BTreeMap<ConsumerId, ScoreResult> {
        log::debug!(
            "scoring {} points against {} incidents",
            request.points.len(),
            request.incidents.len()
        );
        BatchScorer::new(&self.model, self.adjuster, self.config.batch.chunk_size).score(request)
    }
}

impl Default for RiskEngine {
    /// Engine over [`ScoringConfig::default`], whose tunables are in range.
    fn default() -> Self {
        Self::assemble(ScoringConfig::default())
    }
}

impl RiskScorer for RiskEngine {
    fn score(&self, request: &ScoreRequest<'_>) -> ScoreResult {
        if request.incidents.is_empty() {
            return ScoreResult::empty(
                request.reference_point.id,
                request.target_date,
                ScoreNote::NoIncidents,
            );
        }
        let mut precompute =
            LocationPrecomputationEngine::new(&self.model, self.adjuster.normalizer().epsilon());
        let bundle = precompute.precompute(
            request.reference_point,
            request.target_date,
            request.incidents,
            request.conditions,
        );
        let mut result = self.adjuster.adjust(&bundle, request.consumer);
        result.risk_score = Self::sanitise(result.risk_score);
        result
    }
}
