//! Deterministic risk scoring for the Talus engine.
//!
//! The pipeline turns a snapshot of historical incidents and the weather at
//! a reference point into a 0-100 risk score per consumer:
//! - **Weighting** decays each incident by distance, recency, elevation and
//!   severity, and compares its week of weather with the current week.
//! - **Precomputation** freezes those consumer-independent weights into a
//!   [`LocationBaseScoreBundle`] once per reference point.
//! - **Adjustment** applies each consumer's route category and grade to the
//!   bundle, then the [`RiskNormalizer`] scales, clamps and ranks.
//!
//! [`RiskEngine`] wires the stages together, implements
//! [`RiskScorer`](talus_core::RiskScorer) for single requests and scores
//! batches in parallel chunks with identical results.
//!
//! # Examples
//!
//! ```
//! use talus_core::test_support::{date, incident, reference_point};
//! use talus_core::{
//!     BatchPoint, BatchRequest, Consumer, ConsumerAdjustment, ConsumerId, RouteCategory,
//! };
//! use talus_scorer::{RiskEngine, ScoringConfig};
//!
//! let engine = RiskEngine::new(ScoringConfig::default()).expect("default tuning");
//! let incidents = [incident(1, 45.83, 6.86, date(2024, 1, 20)).with_category(RouteCategory::Ice)];
//! let points = [BatchPoint::new(
//!     reference_point(1, 45.83, 6.86),
//!     vec![Consumer::new(ConsumerId(7), ConsumerAdjustment::new(RouteCategory::Ice))],
//! )];
//! let results = engine.score_batch(&BatchRequest {
//!     target_date: date(2024, 1, 27),
//!     incidents: &incidents,
//!     points: &points,
//! });
//! assert!(results[&ConsumerId(7)].risk_score > 0.0);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod adjust;
mod batch;
mod config;
mod correlation;
mod engine;
mod influence;
mod normalize;
mod precompute;
mod similarity;
pub mod weighting;

pub use adjust::{BundleColumns, RouteAdjustmentEngine};
pub use batch::BatchScorer;
pub use config::{
    BatchConfig, CategoryTable, ElevationConfig, ExtremePenalties, FactorWeights, GradeConfig,
    NormalizerConfig, RouteAffinity, RouteTypeConfig, ScoringConfig, SeverityConfig,
    SpatialConfig, TemporalConfig, TuningError, WEATHER_EXPONENT, WeatherConfig,
};
pub use correlation::{CorrelationError, pearson, weighted_pearson};
pub use engine::RiskEngine;
pub use influence::{AccidentInfluenceModel, BaseInfluence, Influence, WeatherWeight};
pub use normalize::{RiskNormalizer, rank};
pub use precompute::{
    BundleEntry, CacheStats, LocationBaseScoreBundle, LocationPrecomputationEngine,
    SimilarityCache,
};
pub use similarity::{FactorScores, SimilarityBreakdown, WeatherPatternSimilarity};
