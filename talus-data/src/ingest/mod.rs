//! Turn raw incident rows into a scoring snapshot.
//!
//! Rows are validated one by one. A malformed row is logged and skipped so a
//! single bad report cannot block a snapshot rebuild.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use talus_core::{CategoryClassifier, HistoricalIncident};
use thiserror::Error;

mod classify;
mod record;
mod severity;

pub use classify::PhraseRuleClassifier;
pub use record::IncidentRecord;
pub use severity::infer_severity;

/// Errors raised while reading or validating incident rows.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    /// The input file could not be opened.
    #[error("failed to open incident records at {path:?}")]
    Open {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
        /// File that failed to open.
        path: PathBuf,
    },
    /// The input was not a JSON array of records.
    #[error("failed to decode incident records")]
    Decode {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A row's coordinates fall outside WGS84 bounds.
    #[error("incident {id} has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// Offending row.
        id: u64,
        /// Latitude as supplied.
        latitude: f64,
        /// Longitude as supplied.
        longitude: f64,
    },
    /// A row's elevation is NaN or infinite.
    #[error("incident {id} has non-finite elevation {value}")]
    InvalidElevation {
        /// Offending row.
        id: u64,
        /// Elevation as supplied.
        value: f64,
    },
}

/// Outcome of converting a batch of rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncidentIngestReport {
    /// Converted incidents, in input order.
    pub incidents: Vec<HistoricalIncident>,
    /// Identifiers of skipped rows.
    pub rejected: Vec<u64>,
}

/// Convert `records`, skipping rows that fail validation.
#[must_use]
pub fn ingest_records<I>(records: I, classifier: &dyn CategoryClassifier) -> IncidentIngestReport
where
    I: IntoIterator<Item = IncidentRecord>,
{
    let mut report = IncidentIngestReport::default();
    for record in records {
        let id = record.id;
        match record.into_incident(classifier) {
            Ok(incident) => report.incidents.push(incident),
            Err(err) => {
                warn!("skipping incident record: {err}");
                report.rejected.push(id);
            }
        }
    }
    debug!(
        "ingested {} incidents, rejected {}",
        report.incidents.len(),
        report.rejected.len()
    );
    report
}

/// Read a JSON array of [`IncidentRecord`] rows and convert them.
///
/// # Errors
/// Returns [`IngestError::Decode`] when the input is not a JSON array of
/// records. Individual invalid rows are skipped, not reported as errors.
pub fn ingest_reader<R: Read>(
    reader: R,
    classifier: &dyn CategoryClassifier,
) -> Result<IncidentIngestReport, IngestError> {
    let records: Vec<IncidentRecord> =
        serde_json::from_reader(reader).map_err(|source| IngestError::Decode { source })?;
    Ok(ingest_records(records, classifier))
}

/// Read and convert the JSON records stored at `path`.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
/// use talus_data::{PhraseRuleClassifier, ingest_incident_file};
///
/// # fn main() -> Result<(), talus_data::IngestError> {
/// let report = ingest_incident_file(Path::new("incidents.json"), &PhraseRuleClassifier::default())?;
/// println!("Loaded {} incidents", report.incidents.len());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns [`IngestError::Open`] when the file cannot be opened and
/// [`IngestError::Decode`] when it does not hold a JSON array of records.
pub fn ingest_incident_file(
    path: &Path,
    classifier: &dyn CategoryClassifier,
) -> Result<IncidentIngestReport, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        source,
        path: path.to_path_buf(),
    })?;
    ingest_reader(BufReader::new(file), classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use talus_core::{RouteCategory, SeverityClass};

    const ROWS: &str = r#"[
        {
            "id": 1,
            "latitude": 40.0,
            "longitude": -105.0,
            "date": "2024-01-05",
            "route_type": "Water ice",
            "title": "Climber seriously injured when pillar collapsed"
        },
        {
            "id": 2,
            "latitude": 123.0,
            "longitude": -105.0,
            "date": "2024-01-06"
        },
        {
            "id": 3,
            "latitude": 46.0,
            "longitude": 7.7,
            "date": "2023-07-30",
            "description": "Party roped up on the glacier; one member fell into a crevasse",
            "grade": "AD"
        }
    ]"#;

    #[rstest]
    fn skips_invalid_rows() {
        let report =
            ingest_reader(ROWS.as_bytes(), &PhraseRuleClassifier::default()).expect("valid json");
        let ids: Vec<u64> = report.incidents.iter().map(|incident| incident.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(report.rejected, vec![2]);

        let categories: Vec<RouteCategory> = report
            .incidents
            .iter()
            .map(|incident| incident.category)
            .collect();
        assert_eq!(categories, vec![RouteCategory::Ice, RouteCategory::Alpine]);
        assert_eq!(
            report.incidents.first().map(|incident| incident.severity),
            Some(SeverityClass::Serious)
        );
    }

    #[rstest]
    fn malformed_json_is_an_error() {
        let err = ingest_reader(br#"{"id": 1}"#.as_slice(), &PhraseRuleClassifier::default())
            .expect_err("not an array");
        assert!(matches!(err, IngestError::Decode { .. }));
    }

    #[rstest]
    fn missing_file_is_an_error() {
        let err = ingest_incident_file(
            Path::new("/nonexistent/incidents.json"),
            &PhraseRuleClassifier::default(),
        )
        .expect_err("missing file");
        assert!(matches!(err, IngestError::Open { .. }));
    }
}
