//! Loading the incident snapshot and scoring configuration shared by every
//! subcommand.

use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use talus_core::HistoricalIncident;
use talus_data::{PhraseRuleClassifier, ingest_reader};
use talus_scorer::{RiskEngine, ScoringConfig};

use crate::fs::{load_json, open_utf8_file, require_existing};
use crate::{ARG_INCIDENTS, ARG_RECORDS, ARG_TUNING, CliError};

/// Where the incident snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IncidentSource {
    /// JSON array of already classified incidents.
    Snapshot(Utf8PathBuf),
    /// JSON array of raw reports to classify on load.
    Records(Utf8PathBuf),
}

impl IncidentSource {
    /// Pick exactly one of the two options.
    pub(crate) fn from_options(
        incidents: Option<Utf8PathBuf>,
        records: Option<Utf8PathBuf>,
        env: &'static str,
    ) -> Result<Self, CliError> {
        match (incidents, records) {
            (Some(path), None) => Ok(Self::Snapshot(path)),
            (None, Some(path)) => Ok(Self::Records(path)),
            (Some(_), Some(_)) => Err(CliError::ConflictingArguments {
                first: ARG_INCIDENTS,
                second: ARG_RECORDS,
            }),
            (None, None) => Err(CliError::MissingArgument {
                field: ARG_INCIDENTS,
                env,
            }),
        }
    }

    /// Path and option name of the source.
    pub(crate) fn path(&self) -> (&Utf8Path, &'static str) {
        match self {
            Self::Snapshot(path) => (path, ARG_INCIDENTS),
            Self::Records(path) => (path, ARG_RECORDS),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), CliError> {
        let (path, field) = self.path();
        require_existing(path, field)
    }

    /// Read the snapshot, classifying raw reports when needed.
    pub(crate) fn load(&self) -> Result<Vec<HistoricalIncident>, CliError> {
        match self {
            Self::Snapshot(path) => load_json(path, ARG_INCIDENTS),
            Self::Records(path) => {
                let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
                    field: ARG_RECORDS,
                    path: path.clone(),
                    source,
                })?;
                let report = ingest_reader(BufReader::new(file), &PhraseRuleClassifier::default())
                    .map_err(|source| CliError::IngestRecords {
                        path: path.clone(),
                        source,
                    })?;
                info!(
                    "classified {} incident records, rejected {}",
                    report.incidents.len(),
                    report.rejected.len()
                );
                Ok(report.incidents)
            }
        }
    }
}

/// Build an engine from an optional tuning file and chunk-size override.
pub(crate) fn build_engine(
    tuning: Option<&Utf8Path>,
    chunk_size: Option<usize>,
) -> Result<RiskEngine, CliError> {
    let mut config = tuning.map_or_else(
        || Ok(ScoringConfig::default()),
        |path| load_json::<ScoringConfig>(path, ARG_TUNING),
    )?;
    if let Some(size) = chunk_size {
        config.batch.chunk_size = size;
    }
    Ok(RiskEngine::new(config)?)
}
