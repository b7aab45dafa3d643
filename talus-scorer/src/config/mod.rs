//! Tunable constants for every scoring stage.
//!
//! [`ScoringConfig::default`] reproduces the hand-tuned heuristic. Callers
//! may override any section from JSON; omitted sections and fields keep
//! their defaults. Always run [`ScoringConfig::validate`] on loaded values.
//!
//! # Examples
//! ```
//! use talus_scorer::ScoringConfig;
//!
//! let json = r#"{ "normalizer": { "scale": 12.5 } }"#;
//! let config: ScoringConfig = serde_json::from_str(json).expect("valid json");
//! let config = config.validate().expect("valid tuning");
//! assert_eq!(config.normalizer.scale, 12.5);
//! assert_eq!(config.normalizer.top_n, 10);
//! ```

mod error;
mod sections;
mod table;

use serde::{Deserialize, Serialize};

pub use error::TuningError;
pub use sections::{
    BatchConfig, ElevationConfig, ExtremePenalties, FactorWeights, GradeConfig, NormalizerConfig,
    RouteTypeConfig, SeverityConfig, SpatialConfig, TemporalConfig, WeatherConfig,
};
pub use table::{CategoryTable, RouteAffinity};

/// Exponent applied to weather similarity in the influence product.
pub const WEATHER_EXPONENT: i32 = 2;

/// Complete scoring configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Distance decay.
    pub spatial: SpatialConfig,
    /// Recency decay and seasonal boost.
    pub temporal: TemporalConfig,
    /// Elevation bonus.
    pub elevation: ElevationConfig,
    /// Consumer/incident category affinities.
    pub route_type: RouteTypeConfig,
    /// Severity multipliers.
    pub severity: SeverityConfig,
    /// Grade proximity.
    pub grade: GradeConfig,
    /// Weather similarity and veto.
    pub weather: WeatherConfig,
    /// Score scaling and ranking.
    pub normalizer: NormalizerConfig,
    /// Bulk scoring layout.
    pub batch: BatchConfig,
}

impl ScoringConfig {
    /// Check every tunable and return the configuration unchanged.
    ///
    /// # Errors
    /// Returns the first [`TuningError`] found, checking sections in
    /// declaration order.
    pub fn validate(self) -> Result<Self, TuningError> {
        self.validate_spatial_temporal()?;
        self.validate_categorical()?;
        self.validate_weather()?;
        ensure("normalizer.scale", self.normalizer.scale, positive, "(0, inf)")?;
        ensure("normalizer.epsilon", self.normalizer.epsilon, non_negative, "[0, inf)")?;
        if self.batch.chunk_size == 0 {
            return Err(TuningError::ZeroChunkSize);
        }
        Ok(self)
    }

    fn validate_spatial_temporal(&self) -> Result<(), TuningError> {
        for (name, value) in self.spatial.bandwidth_km.entries() {
            ensure(&format!("spatial.bandwidth_km.{name}"), value, positive, "(0, inf)")?;
        }
        for (name, value) in self.temporal.daily_decay.entries() {
            ensure(
                &format!("temporal.daily_decay.{name}"),
                value,
                |lambda| lambda > 0.0 && lambda < 1.0,
                "(0, 1)",
            )?;
        }
        ensure(
            "temporal.seasonal_boost",
            self.temporal.seasonal_boost,
            |boost| boost >= 1.0,
            "[1, inf)",
        )?;
        ensure("elevation.bonus_max", self.elevation.bonus_max, non_negative, "[0, inf)")?;
        ensure("elevation.decay_m", self.elevation.decay_m, positive, "(0, inf)")
    }

    fn validate_categorical(&self) -> Result<(), TuningError> {
        for affinity in &self.route_type.affinities {
            ensure(
                &format!(
                    "route_type.affinities.{}.{}",
                    affinity.consumer, affinity.incident
                ),
                affinity.weight,
                non_negative,
                "[0, inf)",
            )?;
        }
        ensure(
            "route_type.default_weight",
            self.route_type.default_weight,
            non_negative,
            "[0, inf)",
        )?;
        let severity = self.severity;
        for (name, value) in [
            ("fatal", severity.fatal),
            ("serious", severity.serious),
            ("minor", severity.minor),
            ("unknown", severity.unknown),
        ] {
            ensure(&format!("severity.{name}"), value, |m| m >= 1.0, "[1, inf)")?;
        }
        if !(severity.fatal >= severity.serious
            && severity.serious >= severity.minor
            && severity.minor >= severity.unknown)
        {
            return Err(TuningError::SeverityOrder);
        }
        ensure(
            "grade.half_weight_difference",
            self.grade.half_weight_difference,
            positive,
            "(0, inf)",
        )?;
        ensure("grade.floor", self.grade.floor, unit_interval, "[0, 1]")
    }

    fn validate_weather(&self) -> Result<(), TuningError> {
        let weather = &self.weather;
        ensure("weather.recency_decay", weather.recency_decay, non_negative, "[0, inf)")?;
        for (name, value) in weather.factor_weights.named() {
            ensure(&format!("weather.factor_weights.{name}"), value, non_negative, "[0, inf)")?;
        }
        if weather
            .factor_weights
            .named()
            .iter()
            .all(|(_, value)| *value == 0.0)
        {
            return Err(TuningError::ZeroFactorWeights);
        }
        ensure("weather.veto_threshold", weather.veto_threshold, unit_interval, "[0, 1]")?;
        ensure(
            "weather.neutral_similarity",
            weather.neutral_similarity,
            unit_interval,
            "[0, 1]",
        )?;
        ensure(
            "weather.extreme_threshold_sigma",
            weather.extreme_threshold_sigma,
            non_negative,
            "[0, inf)",
        )?;
        for (name, value) in weather.penalties.named() {
            ensure(&format!("weather.penalties.{name}"), value, non_negative, "[0, inf)")?;
        }
        Ok(())
    }
}

fn ensure(
    field: &str,
    value: f64,
    valid: impl Fn(f64) -> bool,
    expected: &'static str,
) -> Result<(), TuningError> {
    if !value.is_finite() {
        return Err(TuningError::NonFinite {
            field: field.to_owned(),
            value,
        });
    }
    if valid(value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field: field.to_owned(),
            value,
            expected,
        })
    }
}

fn positive(value: f64) -> bool {
    value > 0.0
}

fn non_negative(value: f64) -> bool {
    value >= 0.0
}

fn unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use talus_core::RouteCategory;

    #[rstest]
    fn defaults_validate() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[rstest]
    fn rejects_non_finite_bandwidth() {
        let mut config = ScoringConfig::default();
        config.spatial.bandwidth_km = config
            .spatial
            .bandwidth_km
            .with(RouteCategory::Ice, f64::NAN);
        let err = config.validate().expect_err("NaN bandwidth");
        assert!(matches!(
            err,
            TuningError::NonFinite { ref field, .. } if field == "spatial.bandwidth_km.ice"
        ));
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(1.2)]
    fn rejects_decay_outside_unit_interval(#[case] lambda: f64) {
        let mut config = ScoringConfig::default();
        config.temporal.daily_decay.default = lambda;
        assert!(matches!(
            config.validate(),
            Err(TuningError::OutOfRange { .. })
        ));
    }

    #[rstest]
    fn rejects_inverted_severity() {
        let mut config = ScoringConfig::default();
        config.severity.minor = 1.25;
        assert_eq!(config.validate(), Err(TuningError::SeverityOrder));
    }

    #[rstest]
    fn rejects_all_zero_factor_weights() {
        let mut config = ScoringConfig::default();
        config.weather.factor_weights = FactorWeights {
            temperature: 0.0,
            precipitation: 0.0,
            wind_speed: 0.0,
            visibility: 0.0,
            cloud_cover: 0.0,
            freeze_thaw: 0.0,
        };
        assert_eq!(config.validate(), Err(TuningError::ZeroFactorWeights));
    }

    #[rstest]
    fn rejects_empty_chunks() {
        let mut config = ScoringConfig::default();
        config.batch.chunk_size = 0;
        assert_eq!(config.validate(), Err(TuningError::ZeroChunkSize));
    }

    #[rstest]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "temporal": { "seasonal_boost": 1.2 }, "batch": { "chunk_size": 64 } }"#;
        let config: ScoringConfig = serde_json::from_str(json).expect("decode config");
        assert_eq!(config.temporal.seasonal_boost, 1.2);
        assert_eq!(config.temporal.daily_decay.get(RouteCategory::Ice), 0.995);
        assert_eq!(config.batch.chunk_size, 64);
    }
}
