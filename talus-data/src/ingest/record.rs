//! Raw incident rows as delivered by upstream reporting feeds.

use chrono::NaiveDate;
use geo::Coord;
use serde::{Deserialize, Serialize};
use talus_core::{
    CategoryClassifier, HistoricalIncident, IncidentText, RouteCategory, SeverityClass,
    WeatherPattern,
};

use super::{IngestError, infer_severity};

/// One incident row before classification.
///
/// Category and severity may be supplied directly; when absent they are
/// inferred from the free-text fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Identifier, unique within a snapshot.
    pub id: u64,
    /// WGS84 latitude in degrees.
    pub latitude: f64,
    /// WGS84 longitude in degrees.
    pub longitude: f64,
    /// Elevation in metres.
    #[serde(default)]
    pub elevation_m: Option<f64>,
    /// Date of the incident.
    pub date: NaiveDate,
    /// Structured route type from the source, if any.
    #[serde(default)]
    pub route_type: Option<String>,
    /// Report headline.
    #[serde(default)]
    pub title: Option<String>,
    /// Narrative text.
    #[serde(default)]
    pub description: Option<String>,
    /// Category recorded upstream, bypassing inference.
    #[serde(default)]
    pub category: Option<RouteCategory>,
    /// Severity recorded upstream, bypassing inference.
    #[serde(default)]
    pub severity: Option<SeverityClass>,
    /// Difficulty grade as written.
    #[serde(default)]
    pub grade: Option<String>,
    /// Weather over the preceding week.
    #[serde(default)]
    pub weather: Option<WeatherPattern>,
}

impl IncidentRecord {
    /// Text fields in classification priority order.
    #[must_use]
    pub fn text(&self) -> IncidentText<'_> {
        IncidentText {
            route_type: self.route_type.as_deref(),
            title: self.title.as_deref(),
            description: self.description.as_deref(),
        }
    }

    /// Validate the row and convert it into a scoring snapshot entry.
    ///
    /// # Errors
    /// Returns [`IngestError::InvalidCoordinate`] for coordinates outside
    /// WGS84 bounds and [`IngestError::InvalidElevation`] for a non-finite
    /// elevation.
    pub fn into_incident(
        self,
        classifier: &dyn CategoryClassifier,
    ) -> Result<HistoricalIncident, IngestError> {
        if !valid_coordinate(self.longitude, self.latitude) {
            return Err(IngestError::InvalidCoordinate {
                id: self.id,
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        if let Some(value) = self.elevation_m.filter(|metres| !metres.is_finite()) {
            return Err(IngestError::InvalidElevation { id: self.id, value });
        }
        let text = self.text();
        let category = self
            .category
            .unwrap_or_else(|| classifier.classify(&text));
        let severity = self.severity.unwrap_or_else(|| infer_severity(&text));

        let mut incident = HistoricalIncident::new(
            self.id,
            Coord {
                x: self.longitude,
                y: self.latitude,
            },
            self.date,
        )
        .with_category(category)
        .with_severity(severity);
        incident.elevation_m = self.elevation_m;
        incident.grade = self.grade.filter(|grade| !grade.trim().is_empty());
        incident.weather = self.weather;
        Ok(incident)
    }
}

fn valid_coordinate(lon: f64, lat: f64) -> bool {
    lon.is_finite()
        && lat.is_finite()
        && (-180.0..=180.0).contains(&lon)
        && (-90.0..=90.0).contains(&lat)
}
