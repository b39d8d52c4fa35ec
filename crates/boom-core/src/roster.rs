//! The villager roster.
//!
//! Ids are dense and handed out in creation order: starting villagers take
//! `0..n`, and every accepted training order reserves the next id when it
//! is issued. A reserved id sits in [`VillagerState::InTraining`] until the
//! order completes, so it is never picked as an idle villager and never
//! gathers.

use std::collections::BTreeMap;

use boom_types::{Resource, VillagerId, VillagerState};

/// Every villager ever created, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    villagers: BTreeMap<VillagerId, VillagerState>,
    next_id: u32,
}

/// Head counts by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterCounts {
    /// Idle villagers.
    pub idle: u32,
    /// Villagers gathering food.
    pub food: u32,
    /// Villagers gathering wood.
    pub wood: u32,
    /// Reserved ids still in training.
    pub in_training: u32,
}

impl Roster {
    /// Create `initial` idle villagers with ids `0..initial`.
    pub fn new(initial: u32) -> Self {
        let villagers = (0..initial)
            .map(|i| (VillagerId(i), VillagerState::Idle))
            .collect();
        Self {
            villagers,
            next_id: initial,
        }
    }

    /// State of one villager.
    pub fn state(&self, id: VillagerId) -> Option<VillagerState> {
        self.villagers.get(&id).copied()
    }

    /// The lowest-id idle villager.
    pub fn first_idle(&self) -> Option<VillagerId> {
        self.villagers
            .iter()
            .find(|(_, state)| **state == VillagerState::Idle)
            .map(|(id, _)| *id)
    }

    /// Whether `id` exists and is idle.
    pub fn is_idle(&self, id: VillagerId) -> bool {
        self.state(id) == Some(VillagerState::Idle)
    }

    /// Reserve the next id for a training order.
    pub fn reserve(&mut self) -> VillagerId {
        let id = VillagerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.villagers.insert(id, VillagerState::InTraining);
        id
    }

    /// Turn a reserved id into an idle villager. Returns `false` if `id`
    /// was not in training.
    pub fn complete_training(&mut self, id: VillagerId) -> bool {
        match self.villagers.get_mut(&id) {
            Some(state) if *state == VillagerState::InTraining => {
                *state = VillagerState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Send an idle villager to gather `resource`. Returns `false` if the
    /// villager is missing or not idle.
    pub fn assign(&mut self, id: VillagerId, resource: Resource) -> bool {
        match self.villagers.get_mut(&id) {
            Some(state) if *state == VillagerState::Idle => {
                *state = VillagerState::gathering(resource);
                true
            }
            _ => false,
        }
    }

    /// Gathering villagers and their resource, in ascending id order.
    pub fn gatherers(&self) -> impl Iterator<Item = (VillagerId, Resource)> + '_ {
        self.villagers
            .iter()
            .filter_map(|(id, state)| state.gathered_resource().map(|r| (*id, r)))
    }

    /// Head counts by state.
    pub fn counts(&self) -> RosterCounts {
        let mut counts = RosterCounts::default();
        for state in self.villagers.values() {
            let slot = match state {
                VillagerState::Idle => &mut counts.idle,
                VillagerState::GatheringFood => &mut counts.food,
                VillagerState::GatheringWood => &mut counts.wood,
                VillagerState::InTraining => &mut counts.in_training,
            };
            *slot = slot.saturating_add(1);
        }
        counts
    }

    /// Live villagers (in-training ids excluded).
    pub fn live(&self) -> u32 {
        let counts = self.counts();
        counts
            .idle
            .saturating_add(counts.food)
            .saturating_add(counts.wood)
    }
}
