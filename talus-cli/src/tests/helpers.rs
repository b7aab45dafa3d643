//! Temporary workspaces and fixture files for CLI tests.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use talus_core::test_support::{date, incident, reference_point};
use talus_core::{
    BatchPoint, Consumer, ConsumerAdjustment, ConsumerId, HistoricalIncident, PointConditions,
    RouteCategory,
};
use tempfile::TempDir;

use crate::batch::BatchRequestFile;
use crate::score::ScoreRequestFile;

pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

pub(super) fn write_json_file<T: Serialize>(path: &Utf8Path, value: &T) {
    let payload = serde_json::to_vec_pretty(value).expect("serialize fixture");
    write_utf8(path, &payload);
}

pub(super) fn alpine_incidents() -> Vec<HistoricalIncident> {
    vec![
        incident(1, 46.0, 7.0, date(2024, 7, 1)).with_category(RouteCategory::Alpine),
        incident(2, 46.001, 7.0, date(2024, 6, 20)).with_category(RouteCategory::Alpine),
    ]
}

pub(super) const ALPINE_RECORDS: &str = r#"[
    {
        "id": 1,
        "latitude": 46.0,
        "longitude": 7.0,
        "date": "2024-07-01",
        "title": "Roped party fell into a crevasse on the glacier"
    },
    {
        "id": 2,
        "latitude": 146.0,
        "longitude": 7.0,
        "date": "2024-07-02",
        "title": "Misplaced report"
    }
]"#;

pub(super) fn score_request() -> ScoreRequestFile {
    ScoreRequestFile {
        reference_point: reference_point(10, 46.0, 7.0),
        consumer: ConsumerAdjustment::new(RouteCategory::Alpine),
        target_date: date(2024, 7, 8),
        conditions: PointConditions::unavailable(),
    }
}

pub(super) fn batch_request() -> BatchRequestFile {
    let alpine = Consumer::new(ConsumerId(1), ConsumerAdjustment::new(RouteCategory::Alpine));
    let sport = Consumer::new(ConsumerId(2), ConsumerAdjustment::new(RouteCategory::Sport));
    let distant = Consumer::new(ConsumerId(3), ConsumerAdjustment::new(RouteCategory::Alpine));
    BatchRequestFile {
        target_date: date(2024, 7, 8),
        points: vec![
            BatchPoint::new(reference_point(10, 46.0, 7.0), vec![alpine, sport]),
            BatchPoint::new(reference_point(11, 40.0, -105.0), vec![distant]),
        ],
    }
}

/// Workspace holding a request file and an incident snapshot.
pub(super) struct ScoreFixture {
    pub(super) _dir: TempDir,
    pub(super) root: Utf8PathBuf,
    pub(super) request: Utf8PathBuf,
    pub(super) incidents: Utf8PathBuf,
}

impl ScoreFixture {
    pub(super) fn new<T: Serialize>(request: &T) -> Self {
        let (dir, root) = workspace();
        let request_path = root.join("request.json");
        let incidents_path = root.join("incidents.json");
        write_json_file(&request_path, request);
        write_json_file(&incidents_path, &alpine_incidents());
        Self {
            _dir: dir,
            root,
            request: request_path,
            incidents: incidents_path,
        }
    }
}
