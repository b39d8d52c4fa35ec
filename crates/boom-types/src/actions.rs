//! Timed actions scheduled by a chromosome.
//!
//! String-typed action kinds are decoded once, at setup time, into the
//! closed [`Command`] variant. Each variant carries exactly the fields its
//! kind needs, so the per-tick dispatcher never has to re-parse anything.

use serde::Serialize;

use crate::enums::ActionKind;
use crate::ids::{Tick, VillagerId};

/// What an action does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    /// Send an idle villager to gather food.
    AssignFood {
        /// A specific villager to assign; the lowest-id idle villager when `None`.
        target: Option<VillagerId>,
    },
    /// Send an idle villager to gather wood.
    AssignWood {
        /// A specific villager to assign; the lowest-id idle villager when `None`.
        target: Option<VillagerId>,
    },
    /// Spend wood to start a house.
    BuildHouse,
    /// Spend food to start training a villager.
    TrainVillager,
}

impl Command {
    /// The kind of this command.
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::AssignFood { .. } => ActionKind::AssignFood,
            Self::AssignWood { .. } => ActionKind::AssignWood,
            Self::BuildHouse => ActionKind::BuildHouse,
            Self::TrainVillager => ActionKind::TrainVillager,
        }
    }

    /// The villager target, for assignment commands that carry one.
    pub const fn target(&self) -> Option<VillagerId> {
        match self {
            Self::AssignFood { target } | Self::AssignWood { target } => *target,
            Self::BuildHouse | Self::TrainVillager => None,
        }
    }
}

/// A command scheduled at a tick. Immutable once issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Action {
    /// The tick at which the action is dispatched.
    pub tick: Tick,
    /// What the action does.
    #[serde(flatten)]
    pub command: Command,
}

impl Action {
    /// Create an action at `tick`.
    pub const fn new(tick: Tick, command: Command) -> Self {
        Self { tick, command }
    }

    /// The kind of this action.
    pub const fn kind(&self) -> ActionKind {
        self.command.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_reports_kind_and_target() {
        let cmd = Command::AssignWood {
            target: Some(VillagerId(2)),
        };
        assert_eq!(cmd.kind(), ActionKind::AssignWood);
        assert_eq!(cmd.target(), Some(VillagerId(2)));
        assert_eq!(Command::TrainVillager.target(), None);
    }

    #[test]
    fn action_serializes_flat() {
        let action = Action::new(4, Command::BuildHouse);
        let json = serde_json::to_string(&action).ok();
        assert_eq!(json.as_deref(), Some(r#"{"tick":4,"kind":"build_house"}"#));
    }
}
