//! Command-line interface for the Talus risk engine.
//!
//! `talus score` rates one consumer at one reference point and `talus batch`
//! rates every consumer in a batch file. Both print pretty JSON on stdout.
//! Options layer CLI flags over `TALUS_*` environment variables and
//! configuration files via `ortho_config`.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod batch;
mod error;
mod fs;
mod inputs;
mod score;

pub use error::CliError;

use batch::BatchArgs;
use score::ScoreArgs;

const ARG_REQUEST: &str = "request";
const ARG_INCIDENTS: &str = "incidents";
const ARG_RECORDS: &str = "records";
const ARG_TUNING: &str = "tuning";
const ARG_CHUNK_SIZE: &str = "chunk-size";
const ARG_WEATHER_BASE_URL: &str = "weather-base-url";
const ARG_FETCH_CONCURRENCY: &str = "fetch-concurrency";
const ENV_SCORE_REQUEST: &str = "TALUS_CMDS_SCORE_REQUEST_PATH";
const ENV_SCORE_INCIDENTS: &str = "TALUS_CMDS_SCORE_INCIDENTS";
const ENV_BATCH_REQUEST: &str = "TALUS_CMDS_BATCH_REQUEST_PATH";
const ENV_BATCH_INCIDENTS: &str = "TALUS_CMDS_BATCH_INCIDENTS";

/// Run the Talus CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] describing the first failure.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Score(args) => score::run_score_with(args, &mut stdout),
        Command::Batch(args) => batch::run_batch_with(args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "talus",
    about = "Deterministic incident and weather risk scoring",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one consumer at one reference point.
    Score(ScoreArgs),
    /// Score every consumer in a batch file.
    Batch(BatchArgs),
}

fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
