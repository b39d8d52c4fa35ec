//! Simulation runner.
//!
//! A [`Simulation`] pairs a resolved configuration with a validated
//! chromosome and replays it tick by tick until the horizon or an early
//! victory. Each call to [`Simulation::run`] builds fresh state, so a
//! simulation can be replayed any number of times with identical results.

use boom_ledger::BalanceResult;
use boom_types::{SimulationReport, Tick, TickTrace};
use tracing::{debug, info};

use crate::chromosome::{Chromosome, SetupError};
use crate::config::ResolvedConfig;
use crate::tick::{self, SimulationError, SimulationState};

/// A chromosome ready to replay under a configuration.
#[derive(Debug, Clone, Copy)]
pub struct Simulation<'a> {
    config: &'a ResolvedConfig,
    chromosome: &'a Chromosome,
}

impl<'a> Simulation<'a> {
    /// Check the chromosome against the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::TargetOutOfRange`] if an assignment targets a
    /// villager id that cannot exist in this run.
    pub fn new(config: &'a ResolvedConfig, chromosome: &'a Chromosome) -> Result<Self, SetupError> {
        chromosome.validate_targets(config.initial_villagers)?;
        Ok(Self { config, chromosome })
    }

    /// Replay and return the terminal report.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError`] only if an internal invariant breaks.
    pub fn run(&self) -> Result<SimulationReport, SimulationError> {
        self.execute(None)
    }

    /// Replay and return the terminal report plus one trace per tick.
    ///
    /// The report is identical to the one [`run`](Self::run) returns.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_traced(&self) -> Result<(SimulationReport, Vec<TickTrace>), SimulationError> {
        let mut traces = Vec::new();
        let report = self.execute(Some(&mut traces))?;
        Ok((report, traces))
    }

    fn execute(
        &self,
        mut traces: Option<&mut Vec<TickTrace>>,
    ) -> Result<SimulationReport, SimulationError> {
        let config = self.config;
        let mut state = SimulationState::new(config)?;

        info!(
            max_ticks = config.max_ticks,
            actions = self.chromosome.len(),
            villagers = config.initial_villagers,
            "Simulation started"
        );

        let mut victory = false;
        let mut tick: Tick = 0;
        while tick < config.max_ticks {
            let summary =
                tick::run_tick(&mut state, config, tick, self.chromosome.actions_at(tick))?;

            if let Some(traces) = traces.as_deref_mut() {
                traces.push(state.trace(&summary));
            }

            if state.population.current_count() >= config.victory_target {
                debug!(tick, villagers = state.population.current_count(), "Victory reached");
                victory = true;
                break;
            }
            tick = tick.saturating_add(1);
        }

        let report = finish(&state, config, victory)?;
        info!(
            ticks = report.ticks_elapsed,
            villagers = report.villager_count,
            food = %report.food,
            wood = %report.wood,
            failures = report.failures.len(),
            victory = report.victory,
            "Simulation ended"
        );
        Ok(report)
    }
}

/// Check end-of-run invariants and build the report.
fn finish(
    state: &SimulationState,
    config: &ResolvedConfig,
    victory: bool,
) -> Result<SimulationReport, SimulationError> {
    if let BalanceResult::Anomaly(anomaly) = state.ledger.verify_balance() {
        return Err(SimulationError::Unbalanced {
            message: anomaly.message,
        });
    }

    let live = state.roster.live();
    let count = state.population.current_count();
    if live != count {
        return Err(SimulationError::PopulationMismatch {
            roster: live,
            population: count,
        });
    }

    let built = state.houses.built();
    let expected = config
        .base_cap
        .saturating_add(built.saturating_mul(config.house_bonus));
    let cap = state.population.cap();
    if cap != expected {
        return Err(SimulationError::CapMismatch {
            cap,
            built,
            expected,
        });
    }

    Ok(SimulationReport {
        villager_count: count,
        food: state.ledger.food(),
        wood: state.ledger.wood(),
        population_cap: cap,
        tc_idle_seconds: config.seconds(state.telemetry.tc_idle_ticks),
        pop_block_seconds: config.seconds(state.telemetry.pop_block_ticks),
        failures: state.failures.clone(),
        victory,
        ticks_elapsed: state.telemetry.ticks,
    })
}
