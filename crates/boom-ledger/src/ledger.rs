//! The resource ledger: food and wood stocks for one run.
//!
//! # Design
//!
//! - **Non-negative**: a stock never goes below zero. A spend that cannot
//!   be covered is refused whole.
//! - **Atomic**: [`ResourceLedger::debit`] checks every component before
//!   touching any stock.
//! - **Journaled**: every movement is appended to the [`Journal`].
//! - **Precision**: all amounts use [`Decimal`] -- no floating point.

use rust_decimal::Decimal;
use tracing::debug;

use boom_types::{Resource, ResourceAmounts, Tick};

use crate::balance::{BalanceResult, verify_balance};
use crate::journal::{EntryKind, Journal, JournalEntry};
use crate::LedgerError;

/// Food and wood stocks plus the journal that explains them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLedger {
    /// Stocks at the start of the run.
    opening: ResourceAmounts,
    /// Current stocks.
    stock: ResourceAmounts,
    /// Every credit and debit, in order.
    journal: Journal,
}

impl ResourceLedger {
    /// Open a ledger with the given starting stocks.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NegativeAmount`] if either opening stock is
    /// negative.
    pub fn new(opening: ResourceAmounts) -> Result<Self, LedgerError> {
        reject_negative(&opening)?;
        Ok(Self {
            opening,
            stock: opening,
            journal: Journal::new(),
        })
    }

    /// Current stocks.
    pub const fn stock(&self) -> ResourceAmounts {
        self.stock
    }

    /// Current food stock.
    pub const fn food(&self) -> Decimal {
        self.stock.food
    }

    /// Current wood stock.
    pub const fn wood(&self) -> Decimal {
        self.stock.wood
    }

    /// The journal of movements so far.
    pub const fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Add a gathered amount to one stock.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NonPositiveCredit`] for a zero or negative
    /// amount and [`LedgerError::Overflow`] if the stock would leave the
    /// decimal range. The stock is unchanged on error.
    pub fn credit(
        &mut self,
        tick: Tick,
        resource: Resource,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveCredit { resource, amount });
        }
        let slot = self.stock.get_mut(resource);
        let updated = slot
            .checked_add(amount)
            .ok_or(LedgerError::Overflow { resource })?;
        *slot = updated;
        self.journal.record(JournalEntry {
            tick,
            kind: EntryKind::Gather,
            resource,
            amount,
        });
        Ok(updated)
    }

    /// Check whether `cost` could be paid without paying it.
    ///
    /// # Errors
    ///
    /// Same as [`debit`](Self::debit).
    pub fn can_afford(&self, cost: &ResourceAmounts) -> Result<(), LedgerError> {
        reject_negative(cost)?;
        for (resource, requested) in cost.entries() {
            let available = self.stock.get(resource);
            if available < requested {
                return Err(LedgerError::Insufficient {
                    resource,
                    requested,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Withdraw `cost` from the stocks, all or nothing.
    ///
    /// Food is checked before wood, so the error names the first short
    /// resource in that order. Zero components are skipped and produce no
    /// journal entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Insufficient`] when a stock cannot cover its
    /// component and [`LedgerError::NegativeAmount`] for a negative
    /// component. Neither stock is altered on error.
    pub fn debit(&mut self, tick: Tick, cost: &ResourceAmounts) -> Result<(), LedgerError> {
        if let Err(err) = self.can_afford(cost) {
            debug!(tick, error = %err, "Debit refused");
            return Err(err);
        }
        for (resource, amount) in cost.entries() {
            let slot = self.stock.get_mut(resource);
            // can_afford guarantees slot >= amount, so this cannot go negative.
            *slot = slot.saturating_sub(amount);
            self.journal.record(JournalEntry {
                tick,
                kind: EntryKind::Spend,
                resource,
                amount,
            });
        }
        Ok(())
    }

    /// Verify that the stocks match the opening stocks plus the journal.
    pub fn verify_balance(&self) -> BalanceResult {
        verify_balance(&self.opening, &self.stock, &self.journal)
    }
}

/// Fail on the first negative component, food first.
fn reject_negative(amounts: &ResourceAmounts) -> Result<(), LedgerError> {
    for resource in [Resource::Food, Resource::Wood] {
        let amount = amounts.get(resource);
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount { resource, amount });
        }
    }
    Ok(())
}
