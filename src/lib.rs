//! Facade crate for the Talus risk engine.
//!
//! This crate re-exports the core domain types and the scoring engine, and
//! exposes the data-access layer (weather sources, caching, ingestion)
//! behind the `data` feature.
//!
//! # Examples
//! ```
//! use chrono::NaiveDate;
//! use geo::Coord;
//! use talus_engine::{
//!     ConsumerAdjustment, HistoricalIncident, PointConditions, ReferencePoint, RiskEngine,
//!     RiskScorer, RouteCategory, ScoreRequest,
//! };
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date");
//! let point = ReferencePoint::new(1, Coord { x: -105.0, y: 40.0 });
//! let incidents = [HistoricalIncident::new(7, Coord { x: -105.0, y: 40.0 }, day(2))
//!     .with_category(RouteCategory::Ice)];
//! let result = RiskEngine::default().score(&ScoreRequest {
//!     reference_point: &point,
//!     consumer: &ConsumerAdjustment::new(RouteCategory::Ice),
//!     target_date: day(9),
//!     incidents: &incidents,
//!     conditions: &PointConditions::unavailable(),
//! });
//! assert_eq!(result.contributing_incidents, 1);
//! ```

#![forbid(unsafe_code)]

pub use talus_core::{
    BatchPoint, BatchRequest, CategoryClassifier, Consumer, ConsumerAdjustment, ConsumerId,
    DailyWeather, Grade, HistoricalIncident, HistoricalWeatherStatistics, IncidentContribution,
    IncidentText, PointConditions, ReferencePoint, RiskScorer, RouteCategory, ScoreMetadata,
    ScoreNote, ScoreRequest, ScoreResult, Season, SeverityClass, WeatherPattern,
};
pub use talus_scorer::{RiskEngine, ScoringConfig, TuningError};

#[cfg(feature = "test-support")]
pub use talus_core::test_support;

#[cfg(feature = "data")]
pub use talus_data::{
    ConditionsFetcher, ElevationSource, FetchConfig, HttpWeatherSource, IncidentRecord,
    KeyValueCache, MemoryCache, PhraseRuleClassifier, WeatherSource, ingest_records,
};
