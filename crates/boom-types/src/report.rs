//! Run outputs: failure records, per-tick traces, and the terminal report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{ActionKind, FailureReason, Resource};
use crate::ids::Tick;

/// A food and wood pair. Used for stocks, costs, and per-tick income.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAmounts {
    /// Food amount.
    pub food: Decimal,
    /// Wood amount.
    pub wood: Decimal,
}

impl ResourceAmounts {
    /// Both amounts zero.
    pub const ZERO: Self = Self {
        food: Decimal::ZERO,
        wood: Decimal::ZERO,
    };

    /// Build a pair from food and wood.
    pub const fn new(food: Decimal, wood: Decimal) -> Self {
        Self { food, wood }
    }

    /// Read the amount for one resource.
    pub const fn get(&self, resource: Resource) -> Decimal {
        match resource {
            Resource::Food => self.food,
            Resource::Wood => self.wood,
        }
    }

    /// Mutable access to one resource's amount.
    pub const fn get_mut(&mut self, resource: Resource) -> &mut Decimal {
        match resource {
            Resource::Food => &mut self.food,
            Resource::Wood => &mut self.wood,
        }
    }

    /// Iterate the non-zero entries, food first.
    pub fn entries(&self) -> impl Iterator<Item = (Resource, Decimal)> + '_ {
        [Resource::Food, Resource::Wood]
            .into_iter()
            .map(move |r| (r, self.get(r)))
            .filter(|(_, amount)| !amount.is_zero())
    }
}

/// One rejected action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// The tick the action was dispatched at.
    pub tick: Tick,
    /// The kind of the rejected action.
    pub action_kind: ActionKind,
    /// Why it was rejected.
    pub reason: FailureReason,
}

/// The result of dispatching a single action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// The kind of the dispatched action.
    pub kind: ActionKind,
    /// The rejection reason, or `None` when the action was applied.
    pub rejection: Option<FailureReason>,
}

impl ActionOutcome {
    /// Whether the action was applied.
    pub const fn applied(&self) -> bool {
        self.rejection.is_none()
    }
}

/// A snapshot of the economy at the end of one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickTrace {
    /// The tick this snapshot closes.
    pub tick: Tick,
    /// Food stock after accrual.
    pub food: Decimal,
    /// Wood stock after accrual.
    pub wood: Decimal,
    /// Live villagers (in-training excluded).
    pub villagers: u32,
    /// Villagers idle at the end of the tick.
    pub idle_villagers: u32,
    /// Villagers gathering food.
    pub food_workers: u32,
    /// Villagers gathering wood.
    pub wood_workers: u32,
    /// Population cap after this tick's completions.
    pub population_cap: u32,
    /// Houses still under construction.
    pub houses_under_construction: u32,
    /// Whether the Town Center holds a training order.
    pub training: bool,
    /// Resources gathered during this tick.
    pub income: ResourceAmounts,
    /// Every action dispatched this tick, in dispatch order.
    pub outcomes: Vec<ActionOutcome>,
}

/// The terminal state of a run, consumed by the fitness function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Live villagers at the end of the run.
    pub villager_count: u32,
    /// Final food stock.
    pub food: Decimal,
    /// Final wood stock.
    pub wood: Decimal,
    /// Final population cap.
    pub population_cap: u32,
    /// Seconds the Town Center spent without a training order.
    pub tc_idle_seconds: u64,
    /// Seconds the economy spent at its population cap.
    pub pop_block_seconds: u64,
    /// Every rejected action, in dispatch order.
    pub failures: Vec<FailureRecord>,
    /// Whether the villager target was reached.
    pub victory: bool,
    /// Ticks actually simulated (fewer than the horizon on an early victory).
    pub ticks_elapsed: u64,
}

impl SimulationReport {
    /// Failures recorded at `tick`.
    pub fn failures_at(&self, tick: Tick) -> impl Iterator<Item = &FailureRecord> + '_ {
        self.failures.iter().filter(move |f| f.tick == tick)
    }
}
