//! Combine every weighting into one influence per (point, incident) pair.
//!
//! The product is evaluated in a fixed order so the per-request and bulk
//! paths produce the same bits:
//!
//! `spatial × temporal × elevation × severity × weather` gives the base
//! influence shared by every consumer at a point, and
//! `base × route_type × grade` gives the consumer-specific influence.

use chrono::NaiveDate;
use talus_core::{
    ConsumerAdjustment, Grade, HistoricalIncident, InfluenceWeights, PointConditions,
    ReferencePoint, RouteCategory, geodesy,
};

use crate::weighting::{
    ElevationWeighting, GradeWeighting, RouteTypeWeighting, SeverityWeighting, SpatialWeighting,
    TemporalWeighting,
};
use crate::{ScoringConfig, WEATHER_EXPONENT, WeatherPatternSimilarity};

/// How weather entered an incident's influence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherWeight {
    /// Similarity used, or the neutral value when weather was unavailable.
    pub similarity: f64,
    /// Multiplier applied to the influence.
    pub factor: f64,
    /// Whether both weeks were known.
    pub available: bool,
    /// Whether the similarity fell below the veto threshold.
    pub vetoed: bool,
}

/// Consumer-independent part of an incident's influence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseInfluence {
    /// Great-circle distance in kilometres.
    pub distance_km: f64,
    /// Days from incident to target date.
    pub days_elapsed: i64,
    /// Distance decay.
    pub spatial: f64,
    /// Recency decay.
    pub temporal: f64,
    /// Elevation bonus.
    pub elevation: f64,
    /// Severity booster.
    pub severity: f64,
    /// Weather contribution.
    pub weather: WeatherWeight,
}

impl BaseInfluence {
    /// Product of the weights that do not depend on weather.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "influence is a product of weights")]
    pub fn non_weather(&self) -> f64 {
        self.spatial * self.temporal * self.elevation * self.severity
    }

    /// Product of every consumer-independent weight.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "influence is a product of weights")]
    pub fn influence(&self) -> f64 {
        self.non_weather() * self.weather.factor
    }

    /// Component weights with the consumer-specific factors filled in.
    #[must_use]
    pub const fn weights(&self, route_type: f64, grade: f64) -> InfluenceWeights {
        InfluenceWeights {
            spatial: self.spatial,
            temporal: self.temporal,
            elevation: self.elevation,
            route_type,
            severity: self.severity,
            grade,
            weather_similarity: self.weather.similarity,
            weather: self.weather.factor,
        }
    }
}

/// Full influence of one incident for one consumer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Influence {
    /// Adjusted influence.
    pub total: f64,
    /// Great-circle distance in kilometres.
    pub distance_km: f64,
    /// Days from incident to target date.
    pub days_elapsed: i64,
    /// Every component weight.
    pub weights: InfluenceWeights,
}

/// Fuses spatial, temporal, elevation, categorical and weather signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccidentInfluenceModel {
    spatial: SpatialWeighting,
    temporal: TemporalWeighting,
    elevation: ElevationWeighting,
    route_type: RouteTypeWeighting,
    severity: SeverityWeighting,
    grade: GradeWeighting,
    similarity: WeatherPatternSimilarity,
    veto_threshold: f64,
    neutral_similarity: f64,
}

impl AccidentInfluenceModel {
    /// Build every weighting from `config`.
    ///
    /// The configuration is assumed validated.
    #[must_use]
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            spatial: SpatialWeighting::new(&config.spatial),
            temporal: TemporalWeighting::new(&config.temporal),
            elevation: ElevationWeighting::new(&config.elevation),
            route_type: RouteTypeWeighting::new(&config.route_type),
            severity: SeverityWeighting::new(&config.severity),
            grade: GradeWeighting::new(&config.grade),
            similarity: WeatherPatternSimilarity::new(&config.weather),
            veto_threshold: config.weather.veto_threshold,
            neutral_similarity: config.weather.neutral_similarity,
        }
    }

    /// Category affinity lookup.
    #[must_use]
    pub const fn route_type(&self) -> &RouteTypeWeighting {
        &self.route_type
    }

    /// Grade proximity weighting.
    #[must_use]
    pub const fn grade(&self) -> &GradeWeighting {
        &self.grade
    }

    /// Weather similarity between the point's current week and the
    /// incident's week, or `None` when either is missing.
    #[must_use]
    pub fn weather_similarity(
        &self,
        conditions: &PointConditions,
        incident: &HistoricalIncident,
    ) -> Option<f64> {
        let current = conditions.current_weather.as_ref()?;
        let past = incident.weather.as_ref()?;
        Some(
            self.similarity
                .compare(current, past, conditions.statistics.as_ref())
                .similarity,
        )
    }

    /// Turn a similarity into the influence multiplier.
    ///
    /// `None` uses the neutral similarity, which is never vetoed. Known
    /// similarities below the veto threshold zero the influence.
    #[must_use]
    pub fn weather_weight(&self, similarity: Option<f64>) -> WeatherWeight {
        let Some(known) = similarity else {
            return WeatherWeight {
                similarity: self.neutral_similarity,
                factor: self.neutral_similarity.powi(WEATHER_EXPONENT),
                available: false,
                vetoed: false,
            };
        };
        let vetoed = !(known >= self.veto_threshold);
        WeatherWeight {
            similarity: known,
            factor: if vetoed {
                0.0
            } else {
                known.powi(WEATHER_EXPONENT)
            },
            available: true,
            vetoed,
        }
    }

    /// Consumer-independent influence of `incident` at `point`.
    #[must_use]
    pub fn base(
        &self,
        point: &ReferencePoint,
        incident: &HistoricalIncident,
        target_date: NaiveDate,
        weather: WeatherWeight,
    ) -> BaseInfluence {
        let distance_km = geodesy::great_circle_distance_km(point.location, incident.location);
        let temporal = self
            .temporal
            .weight(incident.occurred_on, target_date, incident.category);
        BaseInfluence {
            distance_km,
            days_elapsed: temporal.days_elapsed,
            spatial: self.spatial.weight(distance_km, incident.category),
            temporal: temporal.weight,
            elevation: self.elevation.weight(point.elevation_m, incident.elevation_m),
            severity: self.severity.weight(incident.severity),
            weather,
        }
    }

    /// Route-type and grade weights for one consumer against one incident.
    #[must_use]
    pub fn consumer_weights(
        &self,
        consumer_category: RouteCategory,
        consumer_grade: Option<&Grade>,
        incident_category: RouteCategory,
        incident_grade: Option<&Grade>,
    ) -> (f64, f64) {
        (
            self.route_type.weight(consumer_category, incident_category),
            self.grade.weight(consumer_grade, incident_grade),
        )
    }

    /// Evaluate the complete influence of `incident` for `consumer` at
    /// `point`.
    ///
    /// # Examples
    /// ```
    /// use talus_core::test_support::{date, incident, reference_point};
    /// use talus_core::{ConsumerAdjustment, PointConditions, RouteCategory};
    /// use talus_scorer::{AccidentInfluenceModel, ScoringConfig};
    ///
    /// let model = AccidentInfluenceModel::new(&ScoringConfig::default());
    /// let point = reference_point(1, 40.0, -105.0);
    /// let nearby = incident(7, 40.0, -105.0, date(2024, 1, 1))
    ///     .with_category(RouteCategory::Ice);
    /// let consumer = ConsumerAdjustment::new(RouteCategory::Ice);
    /// let influence = model.evaluate(
    ///     &point,
    ///     &consumer,
    ///     &nearby,
    ///     date(2024, 1, 1),
    ///     &PointConditions::unavailable(),
    /// );
    /// // Same place, same day, same season, neutral weather 0.5².
    /// assert!((influence.total - 1.5 * 0.25).abs() < 1e-12);
    /// ```
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "consumer factors scale the base")]
    pub fn evaluate(
        &self,
        point: &ReferencePoint,
        consumer: &ConsumerAdjustment,
        incident: &HistoricalIncident,
        target_date: NaiveDate,
        conditions: &PointConditions,
    ) -> Influence {
        let weather = self.weather_weight(self.weather_similarity(conditions, incident));
        let base = self.base(point, incident, target_date, weather);
        let (route_type, grade) = self.consumer_weights(
            consumer.category,
            consumer.parsed_grade().as_ref(),
            incident.category,
            incident.parsed_grade().as_ref(),
        );
        Influence {
            total: base.influence() * route_type * grade,
            distance_km: base.distance_km,
            days_elapsed: base.days_elapsed,
            weights: base.weights(route_type, grade),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use talus_core::test_support::{
        COOLING, WARMING, conditions, date, incident, reference_point, trend_pattern,
    };
    use talus_core::{RouteCategory, SeverityClass};

    #[fixture]
    fn model() -> AccidentInfluenceModel {
        AccidentInfluenceModel::new(&ScoringConfig::default())
    }

    #[rstest]
    fn missing_weather_is_neutral_not_vetoed(model: AccidentInfluenceModel) {
        let weight = model.weather_weight(None);
        assert_eq!(weight.similarity, 0.5);
        assert_eq!(weight.factor, 0.25);
        assert!(!weight.vetoed);
    }

    #[rstest]
    #[case(0.249_999)]
    #[case(0.0)]
    #[case(f64::NAN)]
    fn low_similarity_is_vetoed(model: AccidentInfluenceModel, #[case] similarity: f64) {
        let weight = model.weather_weight(Some(similarity));
        assert!(weight.vetoed);
        assert_eq!(weight.factor, 0.0);
    }

    #[rstest]
    fn threshold_similarity_survives(model: AccidentInfluenceModel) {
        let weight = model.weather_weight(Some(0.25));
        assert!(!weight.vetoed);
        assert_eq!(weight.factor, 0.0625);
    }

    #[rstest]
    fn veto_zeroes_an_otherwise_strong_incident(model: AccidentInfluenceModel) {
        let point = reference_point(1, 40.0, -105.0);
        let strong = incident(1, 40.0, -105.0, date(2024, 1, 5))
            .with_category(RouteCategory::Ice)
            .with_severity(SeverityClass::Fatal)
            .with_weather(trend_pattern(COOLING));
        let consumer = ConsumerAdjustment::new(RouteCategory::Ice);
        let influence = model.evaluate(
            &point,
            &consumer,
            &strong,
            date(2024, 1, 5),
            &conditions(trend_pattern(WARMING)),
        );
        assert_eq!(influence.total, 0.0);
        assert!(influence.weights.spatial > 0.99);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
    fn matching_weather_squares_the_similarity(model: AccidentInfluenceModel) {
        let point = reference_point(1, 40.0, -105.0);
        let matched = incident(1, 40.0, -105.0, date(2024, 1, 5))
            .with_weather(trend_pattern(WARMING));
        let weather = model.weather_weight(
            model.weather_similarity(&conditions(trend_pattern(WARMING)), &matched),
        );
        let base = model.base(&point, &matched, date(2024, 1, 5), weather);
        assert!((base.weather.factor - 1.0).abs() < 1e-9);
        assert!(base.weather.available);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "recompute the expected product")]
    fn components_multiply_in_canonical_order(model: AccidentInfluenceModel) {
        let point = reference_point(1, 40.0, -105.0).with_elevation(3000.0);
        let event = incident(3, 40.02, -105.01, date(2023, 12, 1))
            .with_elevation(3100.0)
            .with_category(RouteCategory::Ice)
            .with_severity(SeverityClass::Serious)
            .with_grade("WI4");
        let consumer = ConsumerAdjustment::new(RouteCategory::Alpine).with_grade("WI5");
        let influence = model.evaluate(
            &point,
            &consumer,
            &event,
            date(2024, 1, 15),
            &PointConditions::unavailable(),
        );
        let w = influence.weights;
        let expected =
            w.spatial * w.temporal * w.elevation * w.severity * w.weather * w.route_type * w.grade;
        assert_eq!(influence.total, expected);
        assert_eq!(w.route_type, 0.8);
        assert_eq!(w.severity, 1.2);
        assert!(w.elevation > 1.0);
    }
}
