//! Historical incidents and the reference points they are scored against.

use chrono::NaiveDate;
use geo::Coord;

use crate::{Grade, RouteCategory, SeverityClass, WeatherPattern};

/// A historical incident snapshot used as scoring evidence.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Optional
/// fields fall back to neutral weights during scoring: a missing elevation
/// disables the elevation bonus, a missing grade yields a neutral grade
/// weight, and a missing weather pattern yields neutral weather similarity.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use geo::Coord;
/// use talus_core::{HistoricalIncident, RouteCategory, SeverityClass};
///
/// let date = NaiveDate::from_ymd_opt(2024, 2, 3).expect("valid date");
/// let incident = HistoricalIncident::new(7, Coord { x: -105.0, y: 40.0 }, date)
///     .with_category(RouteCategory::Ice)
///     .with_severity(SeverityClass::Serious)
///     .with_grade("WI4");
/// assert_eq!(incident.category, RouteCategory::Ice);
/// assert!(incident.parsed_grade().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoricalIncident {
    /// Identifier reported in score breakdowns. Scoring never relies on it
    /// being unique.
    pub id: u64,
    /// Where the incident happened.
    pub location: Coord<f64>,
    /// Elevation in metres, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation_m: Option<f64>,
    /// Date the incident occurred.
    pub occurred_on: NaiveDate,
    /// Inferred route category.
    #[cfg_attr(feature = "serde", serde(default = "unknown_category"))]
    pub category: RouteCategory,
    /// Outcome class.
    #[cfg_attr(feature = "serde", serde(default))]
    pub severity: SeverityClass,
    /// Difficulty grade as reported.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grade: Option<String>,
    /// Weather over the week leading up to the incident.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weather: Option<WeatherPattern>,
}

#[cfg(feature = "serde")]
const fn unknown_category() -> RouteCategory {
    RouteCategory::Unknown
}

impl HistoricalIncident {
    /// Construct an incident with unknown category, severity and grade.
    #[must_use]
    pub const fn new(id: u64, location: Coord<f64>, occurred_on: NaiveDate) -> Self {
        Self {
            id,
            location,
            elevation_m: None,
            occurred_on,
            category: RouteCategory::Unknown,
            severity: SeverityClass::Unknown,
            grade: None,
            weather: None,
        }
    }

    /// Set the elevation in metres.
    #[must_use]
    pub fn with_elevation(mut self, elevation_m: f64) -> Self {
        self.elevation_m = Some(elevation_m);
        self
    }

    /// Set the route category.
    #[must_use]
    pub fn with_category(mut self, category: RouteCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the severity class.
    #[must_use]
    pub fn with_severity(mut self, severity: SeverityClass) -> Self {
        self.severity = severity;
        self
    }

    /// Set the reported grade text.
    #[must_use]
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    /// Attach the week of weather leading up to the incident.
    #[must_use]
    pub fn with_weather(mut self, weather: WeatherPattern) -> Self {
        self.weather = Some(weather);
        self
    }

    /// Parse the reported grade, if any.
    #[must_use]
    pub fn parsed_grade(&self) -> Option<Grade> {
        Grade::parse_optional(self.grade.as_deref())
    }
}

/// A geographic point shared by many consumers.
///
/// Its identity is independent of any consumer; precomputation happens once
/// per reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferencePoint {
    /// Unique identifier.
    pub id: u64,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Elevation in metres, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation_m: Option<f64>,
}

impl ReferencePoint {
    /// Construct a reference point without elevation.
    #[must_use]
    pub const fn new(id: u64, location: Coord<f64>) -> Self {
        Self {
            id,
            location,
            elevation_m: None,
        }
    }

    /// Set the elevation in metres.
    #[must_use]
    pub const fn with_elevation(mut self, elevation_m: f64) -> Self {
        self.elevation_m = Some(elevation_m);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn new_incident_is_neutral() {
        let date = NaiveDate::from_ymd_opt(2020, 6, 1).expect("valid date");
        let incident = HistoricalIncident::new(1, Coord { x: 0.0, y: 0.0 }, date);
        assert_eq!(incident.category, RouteCategory::Unknown);
        assert_eq!(incident.severity, SeverityClass::Unknown);
        assert!(incident.parsed_grade().is_none());
        assert!(incident.weather.is_none());
    }

    #[rstest]
    fn unparseable_grade_is_absent() {
        let date = NaiveDate::from_ymd_opt(2020, 6, 1).expect("valid date");
        let incident =
            HistoricalIncident::new(1, Coord { x: 0.0, y: 0.0 }, date).with_grade("steep");
        assert!(incident.parsed_grade().is_none());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn deserialises_with_defaults() {
        let json = r#"{"id":3,"location":{"x":-105.0,"y":40.0},"occurred_on":"2023-01-15"}"#;
        let incident: HistoricalIncident = serde_json::from_str(json).expect("decode incident");
        assert_eq!(incident.id, 3);
        assert_eq!(incident.category, RouteCategory::Unknown);
        assert!(incident.elevation_m.is_none());
    }
}
