//! Configuration loading and typed config structures for the Boom replay engine.
//!
//! A run is described by a YAML document whose sections mirror the economy
//! model: `time`, `start`, `population`, `actions`, `gather`, `victory`, and
//! `fitness`. Every field is optional and defaults to the standard
//! early-game values, so an empty document is a valid configuration.
//!
//! Configuration is loaded as a [`SimulationConfig`] and then resolved once
//! into a [`ResolvedConfig`]: durations in whole ticks, per-tick gather
//! amounts, and cost vectors. Only a resolved configuration can drive a run.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use boom_types::ResourceAmounts;

use crate::fitness::FitnessWeights;

/// Environment variable that overrides `time.max_ticks` when loading a file.
pub const MAX_TICKS_ENV: &str = "BOOM_MAX_TICKS";

/// Errors that can occur when loading or resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible economy.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Shorthand for an [`ConfigError::Invalid`] with a formatted reason.
fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.into(),
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of the YAML file. All fields have defaults
/// matching the standard early-game economy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Tick length and horizon.
    #[serde(default)]
    pub time: TimeConfig,

    /// Starting villagers and stocks.
    #[serde(default)]
    pub start: StartConfig,

    /// Population cap parameters.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Costs and durations of the two production actions.
    #[serde(default)]
    pub actions: ActionsConfig,

    /// Per-villager gather rates.
    #[serde(default)]
    pub gather: GatherConfig,

    /// The early-termination condition.
    #[serde(default)]
    pub victory: VictoryConfig,

    /// Fitness coefficients.
    #[serde(default)]
    pub fitness: FitnessWeights,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `BOOM_MAX_TICKS` environment variable overrides
    /// `time.max_ticks`. An unparseable value is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.time.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Validate the configuration and convert it to per-tick units.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value cannot describe a
    /// working economy: a zero tick length, a duration that rounds to zero
    /// ticks, a negative cost, stock or rate, or a start population above
    /// the base cap.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let tick_seconds = self.time.tick_seconds;
        if tick_seconds == 0 {
            return Err(invalid("time.tick_seconds must be positive"));
        }

        let start = &self.start;
        non_negative("start.food", start.food)?;
        non_negative("start.wood", start.wood)?;
        if start.villagers > self.population.base_cap {
            return Err(invalid(format!(
                "start.villagers ({}) exceeds population.base_cap ({})",
                start.villagers, self.population.base_cap
            )));
        }

        let train = &self.actions.train_villager;
        let house = &self.actions.build_house;
        non_negative("actions.train_villager.food_cost", train.food_cost)?;
        non_negative("actions.build_house.wood_cost", house.wood_cost)?;
        let training_ticks = duration_ticks(
            "actions.train_villager.train_seconds",
            train.train_seconds,
            tick_seconds,
        )?;
        let construction_ticks = duration_ticks(
            "actions.build_house.build_seconds",
            house.build_seconds,
            tick_seconds,
        )?;

        let food_per_tick = per_tick(
            "gather.food_per_second",
            self.gather.food_per_second,
            tick_seconds,
        )?;
        let wood_per_tick = per_tick(
            "gather.wood_per_second",
            self.gather.wood_per_second,
            tick_seconds,
        )?;

        Ok(ResolvedConfig {
            tick_seconds,
            max_ticks: self.time.max_ticks,
            initial_villagers: start.villagers,
            opening_stock: ResourceAmounts::new(start.food, start.wood),
            base_cap: self.population.base_cap,
            house_bonus: self.population.house_bonus,
            villager_cost: ResourceAmounts::new(train.food_cost, Decimal::ZERO),
            house_cost: ResourceAmounts::new(Decimal::ZERO, house.wood_cost),
            training_ticks,
            construction_ticks,
            gather_per_tick: ResourceAmounts::new(food_per_tick, wood_per_tick),
            victory_target: self.victory.villager_target,
            weights: self.fitness,
        })
    }
}

/// Round `seconds / tick_seconds` to the nearest tick, midpoints away from
/// zero. Zero ticks is an error.
fn duration_ticks(field: &str, seconds: u64, tick_seconds: u64) -> Result<u64, ConfigError> {
    let ticks = seconds
        .checked_mul(2)
        .and_then(|twice| twice.checked_add(tick_seconds))
        .and_then(|numerator| {
            tick_seconds
                .checked_mul(2)
                .and_then(|denominator| numerator.checked_div(denominator))
        })
        .ok_or_else(|| invalid(format!("{field} is out of range")))?;
    if ticks == 0 {
        return Err(invalid(format!(
            "{field} ({seconds}s) rounds to zero ticks at {tick_seconds}s per tick"
        )));
    }
    Ok(ticks)
}

fn per_tick(field: &str, rate: Decimal, tick_seconds: u64) -> Result<Decimal, ConfigError> {
    non_negative(field, rate)?;
    rate.checked_mul(Decimal::from(tick_seconds))
        .ok_or_else(|| invalid(format!("{field} is out of range")))
}

fn non_negative(field: &str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO {
        return Err(invalid(format!("{field} must not be negative, got {value}")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Time configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Simulated seconds per tick.
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: u64,

    /// Number of ticks in the horizon.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl TimeConfig {
    /// Apply the `BOOM_MAX_TICKS` override, if set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(MAX_TICKS_ENV) {
            match val.trim().parse::<u64>() {
                Ok(max_ticks) => self.max_ticks = max_ticks,
                Err(err) => warn!(
                    value = %val,
                    error = %err,
                    "Ignoring invalid {MAX_TICKS_ENV}"
                ),
            }
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            tick_seconds: default_tick_seconds(),
            max_ticks: default_max_ticks(),
        }
    }
}

/// Starting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartConfig {
    /// Idle villagers at tick 0.
    #[serde(default = "default_start_villagers")]
    pub villagers: u32,

    /// Opening food stock.
    #[serde(default = "default_start_food")]
    pub food: Decimal,

    /// Opening wood stock.
    #[serde(default)]
    pub wood: Decimal,
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            villagers: default_start_villagers(),
            food: default_start_food(),
            wood: Decimal::ZERO,
        }
    }
}

/// Population cap configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Cap with no houses built.
    #[serde(default = "default_base_cap")]
    pub base_cap: u32,

    /// Cap added by each completed house.
    #[serde(default = "default_house_bonus")]
    pub house_bonus: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            base_cap: default_base_cap(),
            house_bonus: default_house_bonus(),
        }
    }
}

/// Production action parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsConfig {
    /// Villager training at the Town Center.
    #[serde(default)]
    pub train_villager: TrainVillagerConfig,

    /// House construction.
    #[serde(default)]
    pub build_house: BuildHouseConfig,
}

/// Villager training parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainVillagerConfig {
    /// Food debited when training starts.
    #[serde(default = "default_villager_food_cost")]
    pub food_cost: Decimal,

    /// Training time in seconds.
    #[serde(default = "default_train_seconds")]
    pub train_seconds: u64,
}

impl Default for TrainVillagerConfig {
    fn default() -> Self {
        Self {
            food_cost: default_villager_food_cost(),
            train_seconds: default_train_seconds(),
        }
    }
}

/// House construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildHouseConfig {
    /// Wood debited when construction starts.
    #[serde(default = "default_house_wood_cost")]
    pub wood_cost: Decimal,

    /// Construction time in seconds.
    #[serde(default = "default_build_seconds")]
    pub build_seconds: u64,
}

impl Default for BuildHouseConfig {
    fn default() -> Self {
        Self {
            wood_cost: default_house_wood_cost(),
            build_seconds: default_build_seconds(),
        }
    }
}

/// Gather rates, per villager per second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatherConfig {
    /// Food per second for one food gatherer.
    #[serde(default = "default_food_per_second")]
    pub food_per_second: Decimal,

    /// Wood per second for one wood gatherer.
    #[serde(default = "default_wood_per_second")]
    pub wood_per_second: Decimal,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            food_per_second: default_food_per_second(),
            wood_per_second: default_wood_per_second(),
        }
    }
}

/// Victory condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryConfig {
    /// Live villagers that end the run early with a victory.
    #[serde(default = "default_villager_target")]
    pub villager_target: u32,
}

impl Default for VictoryConfig {
    fn default() -> Self {
        Self {
            villager_target: default_villager_target(),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved form
// ---------------------------------------------------------------------------

/// A validated configuration in per-tick units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Simulated seconds per tick.
    pub tick_seconds: u64,
    /// Ticks in the horizon.
    pub max_ticks: u64,
    /// Idle villagers at tick 0.
    pub initial_villagers: u32,
    /// Opening stocks.
    pub opening_stock: ResourceAmounts,
    /// Cap with no houses.
    pub base_cap: u32,
    /// Cap added per completed house.
    pub house_bonus: u32,
    /// Cost of one villager.
    pub villager_cost: ResourceAmounts,
    /// Cost of one house.
    pub house_cost: ResourceAmounts,
    /// Ticks from issue to villager completion.
    pub training_ticks: u64,
    /// Ticks from issue to house completion.
    pub construction_ticks: u64,
    /// Amount one gathering villager adds per tick.
    pub gather_per_tick: ResourceAmounts,
    /// Live villagers needed for victory.
    pub victory_target: u32,
    /// Fitness coefficients.
    pub weights: FitnessWeights,
}

impl ResolvedConfig {
    /// Convert a tick count to simulated seconds, saturating.
    pub const fn seconds(&self, ticks: u64) -> u64 {
        ticks.saturating_mul(self.tick_seconds)
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_tick_seconds() -> u64 {
    10
}

const fn default_max_ticks() -> u64 {
    12
}

const fn default_start_villagers() -> u32 {
    3
}

const fn default_start_food() -> Decimal {
    Decimal::from_parts(200, 0, 0, false, 0)
}

const fn default_base_cap() -> u32 {
    5
}

const fn default_house_bonus() -> u32 {
    5
}

const fn default_villager_food_cost() -> Decimal {
    Decimal::from_parts(50, 0, 0, false, 0)
}

const fn default_train_seconds() -> u64 {
    25
}

const fn default_house_wood_cost() -> Decimal {
    Decimal::from_parts(25, 0, 0, false, 0)
}

const fn default_build_seconds() -> u64 {
    20
}

const fn default_food_per_second() -> Decimal {
    Decimal::from_parts(38, 0, 0, false, 2)
}

const fn default_wood_per_second() -> Decimal {
    Decimal::from_parts(33, 0, 0, false, 2)
}

const fn default_villager_target() -> u32 {
    7
}
