//! Focused unit tests covering score CLI configuration and execution.

use super::helpers::{ALPINE_RECORDS, ScoreFixture, score_request, workspace, write_utf8};
use super::*;
use crate::inputs::IncidentSource;
use crate::score::{ScoreConfig, config_from_layers_for_test, execute_score};
use rstest::rstest;
use talus_core::{ScoreNote, ScoreResult};
use talus_scorer::TuningError;

fn config_for(fixture: &ScoreFixture) -> ScoreConfig {
    ScoreConfig {
        request_path: fixture.request.clone(),
        incidents: IncidentSource::Snapshot(fixture.incidents.clone()),
        tuning: None,
    }
}

#[rstest]
fn converting_score_without_request_errors() {
    let args = ScoreArgs {
        incidents: Some("incidents.json".into()),
        ..ScoreArgs::default()
    };
    let err = ScoreConfig::try_from(args).expect_err("missing request should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(env, ENV_SCORE_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn converting_score_without_incidents_errors() {
    let args = ScoreArgs {
        request_path: Some("request.json".into()),
        ..ScoreArgs::default()
    };
    let err = ScoreConfig::try_from(args).expect_err("missing incidents should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_INCIDENTS);
            assert_eq!(env, ENV_SCORE_INCIDENTS);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn incidents_and_records_conflict() {
    let args = ScoreArgs {
        request_path: Some("request.json".into()),
        incidents: Some("incidents.json".into()),
        records: Some("records.json".into()),
        tuning: None,
    };
    let err = ScoreConfig::try_from(args).expect_err("conflicting inputs should error");
    assert!(matches!(
        err,
        CliError::ConflictingArguments {
            first: ARG_INCIDENTS,
            second: ARG_RECORDS
        }
    ));
}

#[rstest]
fn validate_sources_reports_missing_incidents() {
    let fixture = ScoreFixture::new(&score_request());
    let config = ScoreConfig {
        incidents: IncidentSource::Snapshot(fixture.root.join("absent.json")),
        ..config_for(&fixture)
    };
    match config.validate_sources().expect_err("expected failure") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_INCIDENTS),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_not_file() {
    let fixture = ScoreFixture::new(&score_request());
    let directory = fixture.root.join("tuning.json");
    std::fs::create_dir(&directory).expect("tuning directory");
    let config = ScoreConfig {
        tuning: Some(directory.clone()),
        ..config_for(&fixture)
    };
    match config.validate_sources().expect_err("expected failure") {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_TUNING);
            assert_eq!(path, directory);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn scores_the_request_against_the_snapshot() {
    let fixture = ScoreFixture::new(&score_request());
    let result = execute_score(&config_for(&fixture)).expect("score should succeed");
    assert!(result.risk_score > 0.0 && result.risk_score <= 100.0);
    assert_eq!(result.contributing_incidents, 2);
    assert_eq!(result.metadata.reference_point_id, 10);
    assert!(result.metadata.notes.contains(&ScoreNote::WeatherUnavailable));
}

#[rstest]
fn raw_records_are_classified_before_scoring() {
    let fixture = ScoreFixture::new(&score_request());
    let records = fixture.root.join("records.json");
    write_utf8(&records, ALPINE_RECORDS.as_bytes());
    let config = ScoreConfig {
        incidents: IncidentSource::Records(records),
        ..config_for(&fixture)
    };
    let result = execute_score(&config).expect("score should succeed");
    assert_eq!(result.contributing_incidents, 1);
    assert_eq!(result.metadata.incidents_considered, 1);
}

#[rstest]
fn invalid_tuning_is_reported() {
    let fixture = ScoreFixture::new(&score_request());
    let tuning = fixture.root.join("tuning.json");
    write_utf8(&tuning, br#"{ "normalizer": { "scale": -1.0 } }"#);
    let config = ScoreConfig {
        tuning: Some(tuning),
        ..config_for(&fixture)
    };
    let err = execute_score(&config).expect_err("negative scale should fail");
    assert!(matches!(
        err,
        CliError::InvalidTuning(TuningError::OutOfRange { .. })
    ));
}

#[rstest]
fn malformed_request_json_is_reported() {
    let fixture = ScoreFixture::new(&score_request());
    write_utf8(&fixture.request, b"{ not valid json");
    match execute_score(&config_for(&fixture)).expect_err("invalid json should error") {
        CliError::ParseInput { field, path, .. } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(path, fixture.request);
        }
        other => panic!("expected ParseInput, found {other:?}"),
    }
}

#[rstest]
fn output_is_pretty_json() {
    let fixture = ScoreFixture::new(&score_request());
    let result = execute_score(&config_for(&fixture)).expect("score should succeed");
    let mut buffer = Vec::new();
    write_json(&mut buffer, &result).expect("write output");
    let text = String::from_utf8(buffer).expect("utf-8 output");
    assert!(text.ends_with("}\n"));
    let decoded: ScoreResult = serde_json::from_str(&text).expect("decode output");
    assert_eq!(decoded, result);
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "request_path": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let (_tmp, root) = workspace();
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "incidents": root.join("from-file.json").as_str(),
            "tuning": root.join("tuning.json").as_str(),
        }),
        None,
    );
    composer.push_environment(json!({
        "request_path": root.join("from-env-request.json").as_str(),
        "incidents": root.join("from-env.json").as_str(),
    }));
    composer.push_cli(json!({
        "incidents": root.join("from-cli.json").as_str(),
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.request_path, root.join("from-env-request.json"));
    assert_eq!(
        config.incidents,
        IncidentSource::Snapshot(root.join("from-cli.json"))
    );
    assert_eq!(config.tuning, Some(root.join("tuning.json")));
}
