//! Enumeration types for the Boom economy model.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A resource tracked by the economy. Gold and stone are not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Food, spent on villager training.
    Food,
    /// Wood, spent on house construction.
    Wood,
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Food => f.write_str("food"),
            Self::Wood => f.write_str("wood"),
        }
    }
}

// ---------------------------------------------------------------------------
// Action kinds
// ---------------------------------------------------------------------------

/// The four kinds of action a chromosome can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Send an idle villager to gather food.
    AssignFood,
    /// Send an idle villager to gather wood.
    AssignWood,
    /// Spend wood to start a house.
    BuildHouse,
    /// Spend food to start training a villager at the Town Center.
    TrainVillager,
}

impl ActionKind {
    /// All action kinds, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::AssignFood,
        Self::AssignWood,
        Self::BuildHouse,
        Self::TrainVillager,
    ];

    /// The wire name of this kind (`assign_food`, `build_house`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::AssignFood => "assign_food",
            Self::AssignWood => "assign_wood",
            Self::BuildHouse => "build_house",
            Self::TrainVillager => "train_villager",
        }
    }

    /// Look up a kind by its wire name. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether this kind accepts a villager target.
    pub const fn takes_target(self) -> bool {
        matches!(self, Self::AssignFood | Self::AssignWood)
    }
}

impl core::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Failure reasons
// ---------------------------------------------------------------------------

/// Why a dispatched action was rejected.
///
/// The vocabulary is fixed; the serialized form is the human-readable
/// message so failure logs read the same everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// The wood stock cannot cover the cost.
    #[serde(rename = "not enough wood")]
    NotEnoughWood,
    /// The food stock cannot cover the cost.
    #[serde(rename = "not enough food")]
    NotEnoughFood,
    /// The live villager count has reached the population cap.
    #[serde(rename = "population capped")]
    PopulationCapped,
    /// The Town Center already has a training order in flight.
    #[serde(rename = "town center busy")]
    TownCenterBusy,
    /// No idle villager (or the targeted villager is not idle).
    #[serde(rename = "no idle villager")]
    NoIdleVillager,
}

impl FailureReason {
    /// The fixed message for this reason.
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotEnoughWood => "not enough wood",
            Self::NotEnoughFood => "not enough food",
            Self::PopulationCapped => "population capped",
            Self::TownCenterBusy => "town center busy",
            Self::NoIdleVillager => "no idle villager",
        }
    }

    /// The reason reported when a debit of `resource` falls short.
    pub const fn shortage_of(resource: Resource) -> Self {
        match resource {
            Resource::Food => Self::NotEnoughFood,
            Resource::Wood => Self::NotEnoughWood,
        }
    }
}

impl core::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

// ---------------------------------------------------------------------------
// Entity states
// ---------------------------------------------------------------------------

/// What a villager is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VillagerState {
    /// Available for assignment.
    Idle,
    /// Producing food every tick.
    GatheringFood,
    /// Producing wood every tick.
    GatheringWood,
    /// Reserved by an in-flight training order; not yet part of the population.
    InTraining,
}

impl VillagerState {
    /// The resource this state produces, if any.
    pub const fn gathered_resource(self) -> Option<Resource> {
        match self {
            Self::GatheringFood => Some(Resource::Food),
            Self::GatheringWood => Some(Resource::Wood),
            Self::Idle | Self::InTraining => None,
        }
    }

    /// The gathering state for a resource.
    pub const fn gathering(resource: Resource) -> Self {
        match resource {
            Resource::Food => Self::GatheringFood,
            Resource::Wood => Self::GatheringWood,
        }
    }
}

/// Construction state of a house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseState {
    /// Wood has been spent; the cap is not raised yet.
    UnderConstruction,
    /// Complete; the cap has been raised.
    Built,
}
