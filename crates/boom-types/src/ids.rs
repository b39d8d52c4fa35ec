//! Typed identifier wrappers.
//!
//! Identifiers are dense integers handed out in creation order, so a run
//! is fully reproducible: the same chromosome always produces the same
//! villager and house ids. Wrapping them in newtypes keeps a villager id
//! from being mixed up with a house id at compile time.

use serde::{Deserialize, Serialize};

/// A simulation tick. One tick is a fixed quantum of simulated time.
pub type Tick = u64;

/// Generates a newtype wrapper around a dense `u32` index.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Return the inner index.
            pub const fn into_inner(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self(index)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a villager. Starting villagers take ids `0..n`; each
    /// training order reserves the next id when it is issued.
    VillagerId
}

define_id! {
    /// Identifier of a house, in order of construction.
    HouseId
}
