//! Tick cycle: the four-phase loop that drives one replay.
//!
//! Each tick runs through these phases, in order:
//!
//! 1. **Dispatch** -- apply every action scheduled at this tick, in
//!    chromosome order, through the [`dispatch`](crate::dispatch) handlers.
//!    Rejections are recorded and never stop later actions.
//!
//! 2. **Completion** -- resolve queue orders whose completion tick is this
//!    tick: houses first (raising the cap), then the training order (adding
//!    a live, idle villager).
//!
//! 3. **Accrual** -- credit every gathering villager's per-tick yield, in
//!    ascending villager id order.
//!
//! 4. **Telemetry** -- count the tick as Town Center idle and/or
//!    population-blocked.
//!
//! The cycle is deterministic: the same state and actions always produce
//! the same next state.

use boom_ledger::{LedgerError, ResourceLedger};
use boom_types::{
    Action, ActionOutcome, FailureRecord, HouseId, ResourceAmounts, Tick, TickTrace, VillagerId,
};
use tracing::debug;

use crate::config::ResolvedConfig;
use crate::dispatch;
use crate::population::PopulationManager;
use crate::queues::{HouseQueue, Telemetry, TownCenter};
use crate::roster::Roster;

/// Errors that can occur during tick execution.
///
/// Every variant signals a broken internal invariant. Action rejections
/// are not errors; they are recorded as [`FailureRecord`]s.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// A ledger operation failed for a reason other than a short stock.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },

    /// A completing training order referenced a villager not in training.
    #[error("training order for villager {villager} has no reserved roster entry")]
    MissingTrainee {
        /// The reserved id.
        villager: VillagerId,
    },

    /// The Town Center refused an order after it passed validation.
    #[error("town center refused a validated training order at tick {tick}")]
    TrainingConflict {
        /// The tick of the refused order.
        tick: Tick,
    },

    /// The roster and the population count disagree.
    #[error("roster holds {roster} live villagers but population count is {population}")]
    PopulationMismatch {
        /// Live villagers in the roster.
        roster: u32,
        /// The population manager's count.
        population: u32,
    },

    /// The population cap does not match the houses built.
    #[error("population cap is {cap} but {built} built houses give {expected}")]
    CapMismatch {
        /// The population manager's cap.
        cap: u32,
        /// Completed houses.
        built: u32,
        /// Base cap plus one bonus per completed house.
        expected: u32,
    },

    /// The ledger journal does not explain the final stocks.
    #[error("ledger out of balance: {message}")]
    Unbalanced {
        /// The anomaly description.
        message: String,
    },
}

/// What happened during a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick that was executed.
    pub tick: Tick,
    /// Outcome of every dispatched action, in order.
    pub outcomes: Vec<ActionOutcome>,
    /// Houses completed this tick.
    pub houses_completed: Vec<HouseId>,
    /// Villager that finished training this tick.
    pub villager_completed: Option<VillagerId>,
    /// Resources gathered this tick.
    pub income: ResourceAmounts,
    /// Whether the population was at its cap during dispatch.
    pub pop_blocked: bool,
}

/// The mutable state of one run.
///
/// Owned by exactly one [`Simulation`](crate::simulation::Simulation);
/// runs never share state.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Food and wood stocks.
    pub ledger: ResourceLedger,
    /// Live count and cap.
    pub population: PopulationManager,
    /// Every villager and its state.
    pub roster: Roster,
    /// The training slot.
    pub town_center: TownCenter,
    /// Houses built or under construction.
    pub houses: HouseQueue,
    /// Idle and block counters.
    pub telemetry: Telemetry,
    /// Rejected actions, in dispatch order.
    pub failures: Vec<FailureRecord>,
}

impl SimulationState {
    /// The state at tick 0 for a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Ledger`] if the opening stock is negative.
    pub fn new(config: &ResolvedConfig) -> Result<Self, SimulationError> {
        Ok(Self {
            ledger: ResourceLedger::new(config.opening_stock)?,
            population: PopulationManager::new(
                config.initial_villagers,
                config.base_cap,
                config.house_bonus,
            ),
            roster: Roster::new(config.initial_villagers),
            town_center: TownCenter::new(),
            houses: HouseQueue::new(),
            telemetry: Telemetry::default(),
            failures: Vec::new(),
        })
    }

    /// Snapshot the state at the end of a tick.
    pub fn trace(&self, summary: &TickSummary) -> TickTrace {
        let counts = self.roster.counts();
        TickTrace {
            tick: summary.tick,
            food: self.ledger.food(),
            wood: self.ledger.wood(),
            villagers: self.population.current_count(),
            idle_villagers: counts.idle,
            food_workers: counts.food,
            wood_workers: counts.wood,
            population_cap: self.population.cap(),
            houses_under_construction: self.houses.under_construction(),
            training: self.town_center.is_busy(),
            income: summary.income,
            outcomes: summary.outcomes.clone(),
        }
    }
}

/// Execute one complete tick.
///
/// `actions` are the actions scheduled at `tick`, in chromosome order.
pub fn run_tick(
    state: &mut SimulationState,
    config: &ResolvedConfig,
    tick: Tick,
    actions: &[Action],
) -> Result<TickSummary, SimulationError> {
    // Completions happen after dispatch, so the count and cap are fixed
    // for the whole dispatch window.
    let pop_blocked = state.population.is_blocked();

    // --- Phase 1: Dispatch ---
    let outcomes = phase_dispatch(state, config, tick, actions)?;

    // --- Phase 2: Completion ---
    let (houses_completed, villager_completed) = phase_completion(state, tick)?;

    // --- Phase 3: Accrual ---
    let income = phase_accrual(state, config, tick)?;

    // --- Phase 4: Telemetry ---
    state
        .telemetry
        .record_tick(state.town_center.is_busy(), pop_blocked);

    Ok(TickSummary {
        tick,
        outcomes,
        houses_completed,
        villager_completed,
        income,
        pop_blocked,
    })
}

/// Phase 1: Dispatch.
fn phase_dispatch(
    state: &mut SimulationState,
    config: &ResolvedConfig,
    tick: Tick,
    actions: &[Action],
) -> Result<Vec<ActionOutcome>, SimulationError> {
    let mut outcomes = Vec::with_capacity(actions.len());
    for action in actions {
        let kind = action.kind();
        let verdict = dispatch::dispatch(state, config, tick, &action.command)?;
        if let Err(reason) = verdict {
            debug!(tick, action = %kind, %reason, "Action rejected");
            state.failures.push(FailureRecord {
                tick,
                action_kind: kind,
                reason,
            });
        }
        outcomes.push(ActionOutcome {
            kind,
            rejection: verdict.err(),
        });
    }
    Ok(outcomes)
}

/// Phase 2: Completion. Houses resolve before training.
fn phase_completion(
    state: &mut SimulationState,
    tick: Tick,
) -> Result<(Vec<HouseId>, Option<VillagerId>), SimulationError> {
    let houses = state.houses.complete_due(tick);
    for house in &houses {
        let cap = state.population.register_house_completion();
        debug!(tick, %house, cap, "House completed");
    }

    let villager = match state.town_center.take_due(tick) {
        Some(order) => {
            if !state.roster.complete_training(order.villager) {
                return Err(SimulationError::MissingTrainee {
                    villager: order.villager,
                });
            }
            let count = state.population.register_villager_completion();
            debug!(tick, villager = %order.villager, count, "Villager trained");
            Some(order.villager)
        }
        None => None,
    };

    Ok((houses, villager))
}

/// Phase 3: Accrual, in ascending villager id order.
fn phase_accrual(
    state: &mut SimulationState,
    config: &ResolvedConfig,
    tick: Tick,
) -> Result<ResourceAmounts, SimulationError> {
    let mut income = ResourceAmounts::ZERO;
    let gatherers: Vec<_> = state.roster.gatherers().collect();
    for (_, resource) in gatherers {
        let amount = config.gather_per_tick.get(resource);
        if amount.is_zero() {
            continue;
        }
        state.ledger.credit(tick, resource, amount)?;
        let slot = income.get_mut(resource);
        *slot = slot.saturating_add(amount);
    }
    Ok(income)
}
