//! Population count and cap.
//!
//! The cap is checked when a training order is issued, never when it
//! completes. Since only one order can be in flight and the cap never
//! shrinks, `count <= cap` holds at every tick.

/// Live villager count and the cap derived from completed houses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationManager {
    count: u32,
    cap: u32,
    house_bonus: u32,
}

impl PopulationManager {
    /// Start with `initial` live villagers under `base_cap`.
    pub const fn new(initial: u32, base_cap: u32, house_bonus: u32) -> Self {
        Self {
            count: initial,
            cap: base_cap,
            house_bonus,
        }
    }

    /// Live villagers. Villagers in training are not counted.
    pub const fn current_count(&self) -> u32 {
        self.count
    }

    /// Current population cap.
    pub const fn cap(&self) -> u32 {
        self.cap
    }

    /// Whether one more villager fits under the cap.
    pub const fn has_room(&self) -> bool {
        self.count < self.cap
    }

    /// Whether the population is at (or above) its cap.
    pub const fn is_blocked(&self) -> bool {
        !self.has_room()
    }

    /// A house finished: raise the cap by the house bonus.
    pub const fn register_house_completion(&mut self) -> u32 {
        self.cap = self.cap.saturating_add(self.house_bonus);
        self.cap
    }

    /// A training order finished: one more live villager.
    pub const fn register_villager_completion(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }
}
