//! Production queues and telemetry.
//!
//! - [`TownCenter`] -- at most one villager training order in flight.
//! - [`HouseQueue`] -- any number of houses under construction, each
//!   resolving independently.
//! - [`Telemetry`] -- idle and population-block tick counters. Telemetry
//!   observes the queues and never feeds back into them.

use std::collections::BTreeMap;

use boom_types::{FailureReason, HouseId, HouseState, Tick, VillagerId};

// ---------------------------------------------------------------------------
// Town Center
// ---------------------------------------------------------------------------

/// An accepted villager training order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingOrder {
    /// The id reserved for the new villager.
    pub villager: VillagerId,
    /// Tick the order was issued at.
    pub issued_at: Tick,
    /// Tick the villager appears at.
    pub completes_at: Tick,
}

/// The Town Center's single training slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TownCenter {
    in_flight: Option<TrainingOrder>,
}

impl TownCenter {
    /// An idle Town Center.
    pub const fn new() -> Self {
        Self { in_flight: None }
    }

    /// Whether an order is in flight.
    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The order in flight, if any.
    pub const fn in_flight(&self) -> Option<&TrainingOrder> {
        self.in_flight.as_ref()
    }

    /// Accept an order.
    ///
    /// # Errors
    ///
    /// Returns [`FailureReason::TownCenterBusy`] if an order is in flight.
    pub const fn start_training(&mut self, order: TrainingOrder) -> Result<(), FailureReason> {
        if self.in_flight.is_some() {
            return Err(FailureReason::TownCenterBusy);
        }
        self.in_flight = Some(order);
        Ok(())
    }

    /// Remove and return the order if it completes at `tick`.
    pub fn take_due(&mut self, tick: Tick) -> Option<TrainingOrder> {
        self.in_flight.take_if(|order| order.completes_at == tick)
    }
}

// ---------------------------------------------------------------------------
// Houses
// ---------------------------------------------------------------------------

/// A house, from issue to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct House {
    /// Construction state.
    pub state: HouseState,
    /// Tick construction started (wood already spent).
    pub issued_at: Tick,
    /// Tick the house completes and raises the cap.
    pub completes_at: Tick,
}

/// All houses, in order of construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HouseQueue {
    houses: BTreeMap<HouseId, House>,
    next_id: u32,
}

impl HouseQueue {
    /// An empty queue.
    pub const fn new() -> Self {
        Self {
            houses: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Start a house. Always succeeds; the wood must already be debited.
    pub fn start_house(&mut self, issued_at: Tick, construction_ticks: u64) -> HouseId {
        let id = HouseId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.houses.insert(
            id,
            House {
                state: HouseState::UnderConstruction,
                issued_at,
                completes_at: issued_at.saturating_add(construction_ticks),
            },
        );
        id
    }

    /// Mark every house completing at `tick` as built and return their ids.
    pub fn complete_due(&mut self, tick: Tick) -> Vec<HouseId> {
        self.houses
            .iter_mut()
            .filter(|(_, house)| {
                house.state == HouseState::UnderConstruction && house.completes_at == tick
            })
            .map(|(id, house)| {
                house.state = HouseState::Built;
                *id
            })
            .collect()
    }

    /// Houses still under construction.
    pub fn under_construction(&self) -> u32 {
        self.count(HouseState::UnderConstruction)
    }

    /// Completed houses.
    pub fn built(&self) -> u32 {
        self.count(HouseState::Built)
    }

    fn count(&self, state: HouseState) -> u32 {
        let n = self.houses.values().filter(|h| h.state == state).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }
}

// ---------------------------------------------------------------------------
// Telemetry
// ---------------------------------------------------------------------------

/// Tick counters behind `tc_idle_seconds` and `pop_block_seconds`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Telemetry {
    /// Ticks ending with no training order in flight.
    pub tc_idle_ticks: u64,
    /// Ticks whose dispatch window saw the population at its cap.
    pub pop_block_ticks: u64,
    /// Ticks closed so far.
    pub ticks: u64,
}

impl Telemetry {
    /// Close one tick.
    pub const fn record_tick(&mut self, tc_busy: bool, pop_blocked: bool) {
        self.ticks = self.ticks.saturating_add(1);
        if !tc_busy {
            self.tc_idle_ticks = self.tc_idle_ticks.saturating_add(1);
        }
        if pop_blocked {
            self.pop_block_ticks = self.pop_block_ticks.saturating_add(1);
        }
    }
}
