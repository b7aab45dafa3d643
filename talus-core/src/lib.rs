//! Core domain types for the Talus risk engine.
//!
//! Scoring combines historical incidents with weather, spatial, temporal and
//! categorical signals into a 0-100 risk score for a reference point. This
//! crate holds the immutable inputs and outputs of that computation along
//! with the [`RiskScorer`] trait implemented by the scoring crate.
//!
//! Optional fields are modelled as `Option` throughout. Each absent value has
//! a documented neutral fallback during scoring; none of them is an error.
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod geodesy;

mod category;
mod consumer;
mod grade;
mod incident;
mod request;
mod result;
mod scorer;
mod season;
mod weather;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use category::{CategoryClassifier, IncidentText, RouteCategory, SeverityClass};
pub use consumer::{Consumer, ConsumerAdjustment, ConsumerId};
pub use grade::{Grade, GradeParseError, GradeSystem};
pub use incident::{HistoricalIncident, ReferencePoint};
pub use request::{BatchPoint, BatchRequest, ScoreRequest};
pub use result::{
    IncidentContribution, InfluenceWeights, MAX_RISK_SCORE, ScoreMetadata, ScoreNote, ScoreResult,
};
pub use scorer::RiskScorer;
pub use season::{Season, same_season};
pub use weather::{
    ConditionsFingerprint, DailyWeather, FactorStatistics, HistoricalWeatherStatistics,
    MIN_PRESENT_DAYS, PATTERN_DAYS, PointConditions, TemperatureRange, WeatherFactor,
    WeatherPattern, WeatherPatternError,
};
