//! Resource ledger for the Boom economy replay engine.
//!
//! The ledger owns the food and wood stocks of a single run. Stocks only
//! move through two doors: [`ResourceLedger::credit`] (gathering) and
//! [`ResourceLedger::debit`] (spending on a villager or a house). Every
//! movement is appended to a [`Journal`], so the closing stock can always
//! be re-derived from the opening stock and the journal.
//!
//! # Modules
//!
//! - [`ledger`] -- The [`ResourceLedger`]: stocks, credit, atomic debit.
//! - [`journal`] -- The append-only [`Journal`] of gathers and spends.
//! - [`balance`] -- Balance verification and anomaly reporting.
//!
//! # Balance Law
//!
//! For every resource R:
//!
//! ```text
//! stock(R) == opening(R) + sum(gathers of R) - sum(spends of R)
//! ```
//!
//! A violation produces a [`BalanceAnomaly`]. The ledger never panics; it
//! returns errors.
//!
//! # Usage
//!
//! ```
//! use boom_ledger::{BalanceResult, ResourceLedger};
//! use boom_types::{Resource, ResourceAmounts};
//! use rust_decimal::Decimal;
//!
//! let opening = ResourceAmounts::new(Decimal::new(200, 0), Decimal::ZERO);
//! let mut ledger = ResourceLedger::new(opening).ok();
//!
//! if let Some(ledger) = ledger.as_mut() {
//!     ledger.credit(0, Resource::Wood, Decimal::new(33, 1)).ok();
//!     ledger
//!         .debit(1, &ResourceAmounts::new(Decimal::new(50, 0), Decimal::ZERO))
//!         .ok();
//!     assert_eq!(ledger.food(), Decimal::new(150, 0));
//!     assert_eq!(ledger.verify_balance(), BalanceResult::Balanced);
//! }
//! ```

pub mod balance;
pub mod journal;
pub mod ledger;

// Re-export primary types at crate root.
pub use balance::BalanceResult;
pub use journal::{EntryKind, Journal, JournalEntry};
pub use ledger::ResourceLedger;

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use boom_types::Resource;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when moving resources through the ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A credit must move a strictly positive amount.
    #[error("credit of {resource} must be positive, got {amount}")]
    NonPositiveCredit {
        /// The resource being credited.
        resource: Resource,
        /// The invalid amount.
        amount: Decimal,
    },

    /// Costs and opening stocks must not be negative.
    #[error("{resource} amount must not be negative, got {amount}")]
    NegativeAmount {
        /// The resource with the negative amount.
        resource: Resource,
        /// The invalid amount.
        amount: Decimal,
    },

    /// The stock cannot cover a spend. Neither stock was altered.
    #[error("insufficient {resource}: requested {requested}, available {available}")]
    Insufficient {
        /// The first resource found short (food is checked before wood).
        resource: Resource,
        /// The amount the spend asked for.
        requested: Decimal,
        /// The amount in stock.
        available: Decimal,
    },

    /// A credit would overflow the decimal range.
    #[error("{resource} stock overflow")]
    Overflow {
        /// The resource whose stock would overflow.
        resource: Resource,
    },
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A balance law violation found by [`ResourceLedger::verify_balance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceAnomaly {
    /// Per-resource mismatch: (expected from the journal, actual stock).
    pub mismatches: BTreeMap<Resource, (Decimal, Decimal)>,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for BalanceAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
