//! Shared type definitions for the Boom economy replay engine.
//!
//! This crate is the single source of truth for the types exchanged between
//! the ledger, the replay engine, and whatever drives it (the command line
//! tool, or an external genetic-algorithm driver).
//!
//! # Modules
//!
//! - [`ids`] -- Typed identifiers and the [`Tick`] alias
//! - [`enums`] -- Resources, action kinds, failure reasons, entity states
//! - [`actions`] -- The closed [`Command`] variant and timed [`Action`]
//! - [`report`] -- Failure records, per-tick traces, and the terminal report

pub mod actions;
pub mod enums;
pub mod ids;
pub mod report;

// Re-export all public types at crate root for convenience.
pub use actions::{Action, Command};
pub use enums::{ActionKind, FailureReason, HouseState, Resource, VillagerState};
pub use ids::{HouseId, Tick, VillagerId};
pub use report::{
    ActionOutcome, FailureRecord, ResourceAmounts, SimulationReport, TickTrace,
};
