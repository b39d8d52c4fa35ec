//! Chromosome evaluation: replay plus fitness, singly or in batches.
//!
//! Runs share no state, so a population is evaluated in parallel with
//! `rayon`. Results come back in input order.

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

use boom_types::{SimulationReport, TickTrace};

use crate::chromosome::{Chromosome, SetupError};
use crate::config::{ResolvedConfig, SimulationConfig};
use crate::fitness;
use crate::simulation::Simulation;
use crate::tick::SimulationError;

/// Errors from evaluating one chromosome.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The chromosome or configuration was rejected before any tick ran.
    #[error("setup error: {source}")]
    Setup {
        /// The underlying setup error.
        #[from]
        source: SetupError,
    },

    /// The replay broke an internal invariant.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: SimulationError,
    },
}

/// A terminal report and its fitness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// The terminal report.
    pub report: SimulationReport,
    /// The scalar fitness of the report.
    pub fitness: Decimal,
}

/// Replay one chromosome and score it.
///
/// # Errors
///
/// Returns [`EngineError::Setup`] for an invalid chromosome and
/// [`EngineError::Simulation`] for a broken invariant.
pub fn evaluate_chromosome(
    config: &ResolvedConfig,
    chromosome: &Chromosome,
) -> Result<Evaluation, EngineError> {
    let report = Simulation::new(config, chromosome)?.run()?;
    Ok(score(config, report))
}

fn score(config: &ResolvedConfig, report: SimulationReport) -> Evaluation {
    let fitness = fitness::evaluate(&report, &config.weights);
    Evaluation { report, fitness }
}

/// Evaluates chromosomes under one resolved configuration.
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: ResolvedConfig,
}

impl Evaluator {
    /// Resolve `config` once for all later evaluations.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Config`] if the configuration is invalid.
    pub fn new(config: &SimulationConfig) -> Result<Self, SetupError> {
        Ok(Self {
            config: config.resolve()?,
        })
    }

    /// The resolved configuration.
    pub const fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Replay one chromosome and score it.
    ///
    /// # Errors
    ///
    /// See [`evaluate_chromosome`].
    pub fn evaluate(&self, chromosome: &Chromosome) -> Result<Evaluation, EngineError> {
        evaluate_chromosome(&self.config, chromosome)
    }

    /// Replay one chromosome with per-tick traces.
    ///
    /// # Errors
    ///
    /// See [`evaluate_chromosome`].
    pub fn evaluate_traced(
        &self,
        chromosome: &Chromosome,
    ) -> Result<(Evaluation, Vec<TickTrace>), EngineError> {
        let (report, traces) = Simulation::new(&self.config, chromosome)?.run_traced()?;
        Ok((score(&self.config, report), traces))
    }

    /// Evaluate a population in parallel. The i-th result belongs to the
    /// i-th chromosome; one failure does not affect the others.
    pub fn evaluate_population(
        &self,
        chromosomes: &[Chromosome],
    ) -> Vec<Result<Evaluation, EngineError>> {
        chromosomes
            .par_iter()
            .map(|chromosome| self.evaluate(chromosome))
            .collect()
    }
}
