//! Replay engine for the Boom early-game economy.
//!
//! A chromosome is an ordered list of timed economic actions. This crate
//! replays one against a deterministic model of food, wood, villagers,
//! houses, and the Town Center, and scores the terminal state.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration and its resolved per-tick form
//! - [`chromosome`] -- Raw and gene decoding, setup validation
//! - [`population`] -- Live count and population cap
//! - [`roster`] -- Villager ids and states
//! - [`queues`] -- Town Center, house queue, telemetry counters
//! - [`dispatch`] -- Per-kind validation and side effects
//! - [`tick`] -- The four-phase tick cycle and the per-run state bundle
//! - [`simulation`] -- The runner: horizon, victory, terminal report
//! - [`fitness`] -- The scoring function
//! - [`evaluation`] -- Replay plus score, single or parallel batch
//!
//! # Usage
//!
//! ```
//! use boom_core::{Chromosome, Evaluator, SimulationConfig};
//!
//! let evaluator = Evaluator::new(&SimulationConfig::default()).ok();
//! let chromosome = Chromosome::from_genes(&[2, 3, 1]).ok();
//!
//! if let (Some(evaluator), Some(chromosome)) = (evaluator, chromosome) {
//!     let evaluation = evaluator.evaluate(&chromosome).ok();
//!     assert_eq!(evaluation.map(|e| e.report.villager_count), Some(4));
//! }
//! ```

pub mod chromosome;
pub mod config;
pub mod dispatch;
pub mod evaluation;
pub mod fitness;
pub mod population;
pub mod queues;
pub mod roster;
pub mod simulation;
pub mod tick;

pub use chromosome::{Chromosome, RawAction, SetupError};
pub use config::{ConfigError, ResolvedConfig, SimulationConfig};
pub use evaluation::{EngineError, Evaluation, Evaluator, evaluate_chromosome};
pub use fitness::{FitnessWeights, evaluate};
pub use simulation::Simulation;
pub use tick::{SimulationError, SimulationState};
