//! Fitness scoring: a pure function of a terminal report.
//!
//! ```text
//! fitness = villager * villager_count
//!         + food * food_stock
//!         + wood * wood_stock
//!         - tc_idle_per_second * tc_idle_seconds
//!         - pop_block_per_second * pop_block_seconds
//!         + (victory ? victory_bonus : 0)
//! ```
//!
//! Wood carries no value by default; it pays off only through the houses
//! it buys.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use boom_types::SimulationReport;

/// Fitness coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// Reward per live villager.
    #[serde(default = "default_villager_weight")]
    pub villager: Decimal,

    /// Reward per unit of food in stock.
    #[serde(default = "default_food_weight")]
    pub food: Decimal,

    /// Reward per unit of wood in stock.
    #[serde(default)]
    pub wood: Decimal,

    /// Penalty per second of Town Center idle time.
    #[serde(default = "default_penalty_per_second")]
    pub tc_idle_per_second: Decimal,

    /// Penalty per second spent population-blocked.
    #[serde(default = "default_penalty_per_second")]
    pub pop_block_per_second: Decimal,

    /// Flat bonus for reaching the villager target.
    #[serde(default = "default_victory_bonus")]
    pub victory_bonus: Decimal,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            villager: default_villager_weight(),
            food: default_food_weight(),
            wood: Decimal::ZERO,
            tc_idle_per_second: default_penalty_per_second(),
            pop_block_per_second: default_penalty_per_second(),
            victory_bonus: default_victory_bonus(),
        }
    }
}

/// Score a report. Saturates at the decimal range instead of overflowing.
pub fn evaluate(report: &SimulationReport, weights: &FitnessWeights) -> Decimal {
    let bonus = if report.victory {
        weights.victory_bonus
    } else {
        Decimal::ZERO
    };

    weights
        .villager
        .saturating_mul(Decimal::from(report.villager_count))
        .saturating_add(weights.food.saturating_mul(report.food))
        .saturating_add(weights.wood.saturating_mul(report.wood))
        .saturating_sub(
            weights
                .tc_idle_per_second
                .saturating_mul(Decimal::from(report.tc_idle_seconds)),
        )
        .saturating_sub(
            weights
                .pop_block_per_second
                .saturating_mul(Decimal::from(report.pop_block_seconds)),
        )
        .saturating_add(bonus)
}

const fn default_villager_weight() -> Decimal {
    Decimal::from_parts(100, 0, 0, false, 0)
}

const fn default_food_weight() -> Decimal {
    Decimal::from_parts(1, 0, 0, false, 1)
}

const fn default_penalty_per_second() -> Decimal {
    Decimal::ONE
}

const fn default_victory_bonus() -> Decimal {
    Decimal::from_parts(1000, 0, 0, false, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(villagers: u32, food: Decimal, idle: u64, blocked: u64, victory: bool) -> SimulationReport {
        SimulationReport {
            villager_count: villagers,
            food,
            wood: Decimal::new(113, 1),
            population_cap: 5,
            tc_idle_seconds: idle,
            pop_block_seconds: blocked,
            failures: Vec::new(),
            victory,
            ticks_elapsed: 12,
        }
    }

    #[test]
    fn all_noop_score() {
        // 3 * 100 + 200 * 0.1 - 120 = 200
        let r = report(3, Decimal::new(200, 0), 120, 0, false);
        assert_eq!(evaluate(&r, &FitnessWeights::default()), Decimal::new(200, 0));
    }

    #[test]
    fn wood_is_worthless_by_default() {
        let mut r = report(3, Decimal::ZERO, 0, 0, false);
        let base = evaluate(&r, &FitnessWeights::default());
        r.wood = Decimal::new(500, 0);
        assert_eq!(evaluate(&r, &FitnessWeights::default()), base);
    }

    #[test]
    fn victory_adds_bonus() {
        let lost = report(7, Decimal::ZERO, 0, 0, false);
        let won = report(7, Decimal::ZERO, 0, 0, true);
        let weights = FitnessWeights::default();
        assert_eq!(
            evaluate(&won, &weights).saturating_sub(evaluate(&lost, &weights)),
            Decimal::new(1000, 0)
        );
    }

    #[test]
    fn pop_block_is_penalized() {
        // 5 * 100 + 198.8 * 0.1 - 60 - 20 = 439.88
        let r = report(5, Decimal::new(1988, 1), 60, 20, false);
        assert_eq!(
            evaluate(&r, &FitnessWeights::default()),
            Decimal::new(43988, 2)
        );
    }

    #[test]
    fn custom_wood_weight_counts() {
        let r = report(0, Decimal::ZERO, 0, 0, false);
        let weights = FitnessWeights {
            wood: Decimal::ONE,
            ..FitnessWeights::default()
        };
        assert_eq!(evaluate(&r, &weights), Decimal::new(113, 1));
    }
}
