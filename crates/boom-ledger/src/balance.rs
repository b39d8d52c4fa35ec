//! Balance law verification for the resource ledger.
//!
//! For each resource R the closing stock must equal the opening stock
//! plus every gather minus every spend recorded in the journal:
//!
//! ```text
//! stock(R) == opening(R) + sum(gathers of R) - sum(spends of R)
//! ```
//!
//! The ledger maintains this by construction. The check exists so a run
//! can assert it at the end and report a [`BalanceAnomaly`] instead of
//! silently producing a corrupted report.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use boom_types::{Resource, ResourceAmounts};

use crate::journal::{EntryKind, Journal};
use crate::BalanceAnomaly;

/// The result of a balance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceResult {
    /// Every stock is explained by the journal.
    Balanced,
    /// One or more stocks disagree with the journal.
    Anomaly(BalanceAnomaly),
}

impl BalanceResult {
    /// Whether the check passed.
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

/// Check `closing` against `opening` and the journal.
///
/// A negative closing stock is reported as a mismatch even when the
/// journal explains it.
pub fn verify_balance(
    opening: &ResourceAmounts,
    closing: &ResourceAmounts,
    journal: &Journal,
) -> BalanceResult {
    let gathered = journal.totals(EntryKind::Gather, None);
    let spent = journal.totals(EntryKind::Spend, None);

    let mut mismatches: BTreeMap<Resource, (Decimal, Decimal)> = BTreeMap::new();

    for resource in [Resource::Food, Resource::Wood] {
        let expected = opening
            .get(resource)
            .checked_add(gathered.get(resource))
            .and_then(|v| v.checked_sub(spent.get(resource)));
        let actual = closing.get(resource);

        match expected {
            Some(expected) if expected == actual && actual >= Decimal::ZERO => {}
            Some(expected) => {
                mismatches.insert(resource, (expected, actual));
            }
            // Overflow while summing: nothing sensible to compare against.
            None => {
                mismatches.insert(resource, (Decimal::MAX, actual));
            }
        }
    }

    if mismatches.is_empty() {
        BalanceResult::Balanced
    } else {
        let detail = mismatches
            .iter()
            .map(|(r, (expected, actual))| format!("{r}: expected {expected}, found {actual}"))
            .collect::<Vec<_>>()
            .join("; ");
        BalanceResult::Anomaly(BalanceAnomaly {
            mismatches,
            message: format!("ledger out of balance: {detail}"),
        })
    }
}
