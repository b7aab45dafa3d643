//! `score` command: one consumer at one reference point.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use talus_core::{
    ConsumerAdjustment, PointConditions, ReferencePoint, RiskScorer, ScoreRequest, ScoreResult,
};

use crate::fs::{load_json, require_existing};
use crate::inputs::{IncidentSource, build_engine};
use crate::{
    ARG_INCIDENTS, ARG_RECORDS, ARG_REQUEST, ARG_TUNING, CliError, ENV_SCORE_INCIDENTS,
    ENV_SCORE_REQUEST, write_json,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "score",
    long_about = "Score one consumer at one reference point. The request is a \
                 JSON object with `reference_point`, `consumer`, \
                 `target_date` and optional `conditions`; the incident \
                 snapshot is read from --incidents or, as raw reports, from \
                 --records.",
    about = "Score one consumer at one reference point"
)]
#[ortho_config(prefix = "TALUS")]
pub(crate) struct ScoreArgs {
    /// Path to a JSON file containing the score request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Path to a JSON array of classified incidents.
    #[arg(long = ARG_INCIDENTS, value_name = "path")]
    #[serde(default)]
    pub(crate) incidents: Option<Utf8PathBuf>,
    /// Path to a JSON array of raw incident reports to classify.
    #[arg(long = ARG_RECORDS, value_name = "path")]
    #[serde(default)]
    pub(crate) records: Option<Utf8PathBuf>,
    /// Path to a JSON scoring configuration overriding the defaults.
    #[arg(long = ARG_TUNING, value_name = "path")]
    #[serde(default)]
    pub(crate) tuning: Option<Utf8PathBuf>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) incidents: IncidentSource,
    pub(crate) tuning: Option<Utf8PathBuf>,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_REQUEST)?;
        self.incidents.validate()?;
        if let Some(tuning) = &self.tuning {
            require_existing(tuning, ARG_TUNING)?;
        }
        Ok(())
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_SCORE_REQUEST,
        })?;
        let incidents =
            IncidentSource::from_options(args.incidents, args.records, ENV_SCORE_INCIDENTS)?;
        Ok(Self {
            request_path,
            incidents,
            tuning: args.tuning,
        })
    }
}

/// JSON layout of a `score` request file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct ScoreRequestFile {
    pub(crate) reference_point: ReferencePoint,
    pub(crate) consumer: ConsumerAdjustment,
    pub(crate) target_date: NaiveDate,
    #[serde(default)]
    pub(crate) conditions: PointConditions,
}

pub(crate) fn run_score_with(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let result = execute_score(&config)?;
    write_json(writer, &result)
}

pub(crate) fn execute_score(config: &ScoreConfig) -> Result<ScoreResult, CliError> {
    let request: ScoreRequestFile = load_json(&config.request_path, ARG_REQUEST)?;
    let incidents = config.incidents.load()?;
    let engine = build_engine(config.tuning.as_deref(), None)?;
    Ok(engine.score(&ScoreRequest {
        reference_point: &request.reference_point,
        consumer: &request.consumer,
        target_date: request.target_date,
        incidents: &incidents,
        conditions: &request.conditions,
    }))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
