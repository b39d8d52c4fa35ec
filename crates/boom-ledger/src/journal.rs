//! The append-only journal of resource movements.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use boom_types::{Resource, ResourceAmounts, Tick};

/// The direction of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Resources produced by a gathering villager.
    Gather,
    /// Resources consumed by a training order or a house.
    Spend,
}

/// One resource movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// The tick the movement happened at.
    pub tick: Tick,
    /// Gather or spend.
    pub kind: EntryKind,
    /// The resource moved.
    pub resource: Resource,
    /// The amount moved. Always strictly positive.
    pub amount: Decimal,
}

/// Entries in insertion order. Entries are never modified or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Create an empty journal.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry.
    pub(crate) fn record(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    /// All entries, in insertion order.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Entries recorded at `tick`.
    pub fn entries_for_tick(&self, tick: Tick) -> impl Iterator<Item = &JournalEntry> + '_ {
        self.entries.iter().filter(move |e| e.tick == tick)
    }

    /// Sum of one kind of movement per resource, optionally limited to a tick.
    ///
    /// Saturates rather than overflowing; the balance check treats a
    /// saturated sum as a mismatch.
    pub fn totals(&self, kind: EntryKind, tick: Option<Tick>) -> ResourceAmounts {
        let mut totals = ResourceAmounts::ZERO;
        for entry in &self.entries {
            if entry.kind != kind || tick.is_some_and(|t| t != entry.tick) {
                continue;
            }
            let slot = totals.get_mut(entry.resource);
            *slot = slot.saturating_add(entry.amount);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tick: Tick, kind: EntryKind, resource: Resource, amount: Decimal) -> JournalEntry {
        JournalEntry {
            tick,
            kind,
            resource,
            amount,
        }
    }

    #[test]
    fn new_journal_is_empty() {
        let journal = Journal::new();
        assert!(journal.is_empty());
        assert_eq!(journal.len(), 0);
    }

    #[test]
    fn totals_split_by_kind_and_resource() {
        let mut journal = Journal::new();
        journal.record(entry(0, EntryKind::Gather, Resource::Food, Decimal::new(38, 1)));
        journal.record(entry(1, EntryKind::Gather, Resource::Food, Decimal::new(38, 1)));
        journal.record(entry(1, EntryKind::Gather, Resource::Wood, Decimal::new(33, 1)));
        journal.record(entry(1, EntryKind::Spend, Resource::Food, Decimal::new(50, 0)));

        let gathered = journal.totals(EntryKind::Gather, None);
        assert_eq!(gathered.food, Decimal::new(76, 1));
        assert_eq!(gathered.wood, Decimal::new(33, 1));

        let spent = journal.totals(EntryKind::Spend, None);
        assert_eq!(spent.food, Decimal::new(50, 0));
        assert_eq!(spent.wood, Decimal::ZERO);
    }

    #[test]
    fn totals_can_be_limited_to_one_tick() {
        let mut journal = Journal::new();
        journal.record(entry(0, EntryKind::Gather, Resource::Wood, Decimal::new(33, 1)));
        journal.record(entry(1, EntryKind::Gather, Resource::Wood, Decimal::new(33, 1)));
        journal.record(entry(1, EntryKind::Gather, Resource::Wood, Decimal::new(33, 1)));

        assert_eq!(
            journal.totals(EntryKind::Gather, Some(1)).wood,
            Decimal::new(66, 1)
        );
        assert_eq!(journal.entries_for_tick(0).count(), 1);
    }

    #[test]
    fn entry_serializes_with_snake_case_kind() {
        let e = entry(3, EntryKind::Spend, Resource::Wood, Decimal::new(25, 0));
        let json = serde_json::to_string(&e).unwrap_or_default();
        assert!(json.contains("\"kind\":\"spend\""));
        assert!(json.contains("\"resource\":\"wood\""));
    }
}
