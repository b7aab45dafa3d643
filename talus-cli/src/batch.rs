//! `batch` command: many reference points against one snapshot.

use std::collections::BTreeMap;
use std::io::Write;

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use talus_core::{BatchPoint, BatchRequest, ConsumerId, HistoricalIncident, ScoreResult};
use talus_data::{
    ConditionsFetcher, DEFAULT_FETCH_CONCURRENCY, FetchConfig, HttpWeatherSource,
    HttpWeatherSourceConfig, MemoryCache,
};

use talus_scorer::RiskEngine;

use crate::fs::{load_json, require_existing};
use crate::inputs::{IncidentSource, build_engine};
use crate::{
    ARG_CHUNK_SIZE, ARG_FETCH_CONCURRENCY, ARG_INCIDENTS, ARG_RECORDS, ARG_REQUEST, ARG_TUNING,
    ARG_WEATHER_BASE_URL, CliError, ENV_BATCH_INCIDENTS, ENV_BATCH_REQUEST, write_json,
};

/// CLI arguments for the `batch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "batch",
    long_about = "Score every consumer at every reference point in a batch \
                 file. Points without weather can be filled from an \
                 Open-Meteo compatible archive by setting \
                 --weather-base-url.",
    about = "Score many consumers and reference points at once"
)]
#[ortho_config(prefix = "TALUS")]
pub(crate) struct BatchArgs {
    /// Path to a JSON file containing the batch request.
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
    /// Reference points scored per parallel work unit.
    #[arg(long = ARG_CHUNK_SIZE, value_name = "n")]
    #[serde(default)]
    pub(crate) chunk_size: Option<usize>,
    /// Base URL of the weather archive used to fill missing conditions.
    #[arg(long = ARG_WEATHER_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) weather_base_url: Option<String>,
    /// Reference points whose weather is fetched concurrently.
    #[arg(long = ARG_FETCH_CONCURRENCY, value_name = "n")]
    #[serde(default)]
    pub(crate) fetch_concurrency: Option<usize>,
}

impl BatchArgs {
    pub(crate) fn into_config(self) -> Result<BatchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        BatchConfig::try_from(merged)
    }
}

/// Where missing weather is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WeatherLookup {
    pub(crate) base_url: String,
    pub(crate) concurrency: usize,
}

/// Resolved `batch` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BatchConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) incidents: IncidentSource,
    pub(crate) tuning: Option<Utf8PathBuf>,
    pub(crate) chunk_size: Option<usize>,
    pub(crate) weather: Option<WeatherLookup>,
}

impl BatchConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_REQUEST)?;
        self.incidents.validate()?;
        if let Some(tuning) = &self.tuning {
            require_existing(tuning, ARG_TUNING)?;
        }
        Ok(())
    }
}

impl TryFrom<BatchArgs> for BatchConfig {
    type Error = CliError;

    fn try_from(args: BatchArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_BATCH_REQUEST,
        })?;
        let incidents =
            IncidentSource::from_options(args.incidents, args.records, ENV_BATCH_INCIDENTS)?;
        let concurrency = args.fetch_concurrency.unwrap_or(DEFAULT_FETCH_CONCURRENCY);
        let weather = args
            .weather_base_url
            .filter(|url| !url.trim().is_empty())
            .map(|base_url| WeatherLookup {
                base_url,
                concurrency,
            });
        Ok(Self {
            request_path,
            incidents,
            tuning: args.tuning,
            chunk_size: args.chunk_size,
            weather,
        })
    }
}

/// JSON layout of a `batch` request file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct BatchRequestFile {
    pub(crate) target_date: NaiveDate,
    pub(crate) points: Vec<BatchPoint>,
}

pub(crate) fn run_batch_with(args: BatchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let results = execute_batch(&config)?;
    write_json(writer, &results)
}

pub(crate) fn execute_batch(
    config: &BatchConfig,
) -> Result<BTreeMap<ConsumerId, ScoreResult>, CliError> {
    let mut request: BatchRequestFile = load_json(&config.request_path, ARG_REQUEST)?;
    let incidents = config.incidents.load()?;
    let engine = build_engine(config.tuning.as_deref(), config.chunk_size)?;
    match &config.weather {
        Some(lookup) => score_with_lookup(lookup, &engine, &incidents, &mut request),
        None => Ok(engine.score_batch(&BatchRequest {
            target_date: request.target_date,
            incidents: &incidents,
            points: &request.points,
        })),
    }
}

/// Fill missing conditions from the weather service, then score through the
/// score cache.
fn score_with_lookup(
    lookup: &WeatherLookup,
    engine: &RiskEngine,
    incidents: &[HistoricalIncident],
    request: &mut BatchRequestFile,
) -> Result<BTreeMap<ConsumerId, ScoreResult>, CliError> {
    let source = HttpWeatherSource::with_config(HttpWeatherSourceConfig::new(
        lookup.base_url.clone(),
    ))
    .map_err(|source| CliError::BuildWeatherSource {
        base_url: lookup.base_url.clone(),
        source,
    })?;
    let cache = MemoryCache::new();
    let fetcher = ConditionsFetcher::new(
        &source,
        &cache,
        FetchConfig::default().with_concurrency(lookup.concurrency),
    )
    .with_elevation(&source);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let target_date = request.target_date;
    Ok(runtime.block_on(async {
        let filled = fetcher.fill_missing(&mut request.points, target_date).await;
        info!("fetched conditions for {filled} reference points");
        fetcher
            .score_with_cache(
                &BatchRequest {
                    target_date,
                    incidents,
                    points: &request.points,
                },
                |pending| engine.score_batch(pending),
            )
            .await
    }))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<BatchConfig, CliError> {
    let merged = BatchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    BatchConfig::try_from(merged)
}
