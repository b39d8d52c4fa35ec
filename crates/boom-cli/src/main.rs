//! `boom`: replay build-order chromosomes and print their scores.
//!
//! ```text
//! boom evaluate --config boom.yaml orders/a.json orders/b.json
//! boom evaluate --genes --trace genes.json
//! boom show-config --config boom.yaml
//! ```
//!
//! `evaluate` prints one JSON line per chromosome file, in argument order:
//! the terminal report and fitness, or the reason the file was rejected.
//! Files are replayed in parallel. Logs go to stderr (`RUST_LOG`, default
//! `info`).

mod error;
mod input;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::bail;
use boom_core::{Evaluation, Evaluator, SimulationConfig};
use boom_types::{SimulationReport, TickTrace};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::input::{ChromosomeFormat, load_chromosome};

/// Replay and score early-game build orders
#[derive(Parser, Debug)]
#[command(name = "boom", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate chromosome files and print one JSON line per file
    Evaluate {
        /// YAML configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read files as dense gene vectors instead of raw action lists
        #[arg(long)]
        genes: bool,

        /// Include per-tick traces in the output
        #[arg(long)]
        trace: bool,

        /// Chromosome files (JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Validate the configuration and print it as YAML
    ShowConfig {
        /// YAML configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// One output line of `boom evaluate`.
#[derive(Debug, Serialize)]
struct OutputLine<'a> {
    file: String,
    #[serde(flatten)]
    outcome: Outcome<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Outcome<'a> {
    Scored {
        report: &'a SimulationReport,
        fitness: Decimal,
        #[serde(skip_serializing_if = "Option::is_none")]
        traces: Option<&'a [TickTrace]>,
    },
    Rejected {
        error: String,
    },
}

/// A replayed file: its evaluation and, when requested, its traces.
type Replay = (Evaluation, Option<Vec<TickTrace>>);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    match Cli::parse().command {
        Command::Evaluate {
            config,
            genes,
            trace,
            files,
        } => {
            let format = if genes {
                ChromosomeFormat::Genes
            } else {
                ChromosomeFormat::Raw
            };
            let rejected = evaluate(config.as_deref(), format, trace, &files)?;
            ensure_all_scored(rejected, files.len())?;
        }
        Command::ShowConfig { config } => show_config(config.as_deref())?,
    }
    Ok(())
}

/// Fail the process when any file produced no report.
fn ensure_all_scored(rejected: usize, total: usize) -> anyhow::Result<()> {
    if rejected > 0 {
        bail!("{rejected} of {total} chromosome files were rejected");
    }
    Ok(())
}

/// Load configuration from `path`, or the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<SimulationConfig, CliError> {
    if let Some(path) = path {
        let config = SimulationConfig::from_file(path)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    } else {
        info!("No config file given, using defaults");
        let mut config = SimulationConfig::default();
        config.time.apply_env_overrides();
        Ok(config)
    }
}

/// Replay every file and print the results. Returns the number of files
/// that produced no report.
fn evaluate(
    config: Option<&Path>,
    format: ChromosomeFormat,
    trace: bool,
    files: &[PathBuf],
) -> Result<usize, CliError> {
    let evaluator = Evaluator::new(&load_config(config)?)?;
    info!(
        files = files.len(),
        max_ticks = evaluator.config().max_ticks,
        "Evaluating chromosomes"
    );

    let results: Vec<Result<Replay, CliError>> = files
        .par_iter()
        .map(|path| replay_file(&evaluator, path, format, trace))
        .collect();

    let mut out = io::stdout().lock();
    let rejected = write_results(&mut out, files, &results)?;
    out.flush()?;
    Ok(rejected)
}

/// Write one JSON line per file, in `files` order. Returns the number of
/// rejected files.
fn write_results<W: Write>(
    out: &mut W,
    files: &[PathBuf],
    results: &[Result<Replay, CliError>],
) -> Result<usize, CliError> {
    let mut rejected = 0_usize;
    for (path, result) in files.iter().zip(results) {
        let outcome = match result {
            Ok((evaluation, traces)) => Outcome::Scored {
                report: &evaluation.report,
                fitness: evaluation.fitness,
                traces: traces.as_deref(),
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Chromosome rejected");
                rejected = rejected.saturating_add(1);
                Outcome::Rejected {
                    error: err.to_string(),
                }
            }
        };
        let line = OutputLine {
            file: path.display().to_string(),
            outcome,
        };
        serde_json::to_writer(&mut *out, &line)?;
        writeln!(out)?;
    }
    Ok(rejected)
}

fn replay_file(
    evaluator: &Evaluator,
    path: &Path,
    format: ChromosomeFormat,
    trace: bool,
) -> Result<Replay, CliError> {
    let chromosome = load_chromosome(path, format)?;
    if trace {
        let (evaluation, traces) = evaluator.evaluate_traced(&chromosome)?;
        Ok((evaluation, Some(traces)))
    } else {
        Ok((evaluator.evaluate(&chromosome)?, None))
    }
}

fn show_config(path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(path)?;
    config.resolve()?;
    let yaml = serde_yml::to_string(&config)?;
    io::stdout().lock().write_all(yaml.as_bytes())?;
    Ok(())
}
