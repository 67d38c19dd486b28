use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rates::Rates;
use super::snapshot::Snapshot;
use crate::errors::CoreError;

/// A recorded snapshot together with the rates and total in effect when it
/// was saved. Never mutated after it enters a `HistoryLog`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    /// Identity of the entry. Records written before ids existed get a
    /// fresh one on load.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,

    /// Holdings at that moment
    pub amounts: Snapshot,

    /// Market rates at that moment
    pub rates: Rates,

    /// Precomputed valuation of `amounts` at `rates`
    pub total: f64,
}

impl RateEntry {
    pub fn new(timestamp: DateTime<Utc>, amounts: Snapshot, rates: Rates, total: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            amounts,
            rates,
            total,
        }
    }
}

/// Structural change to a history log, delivered to history observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryChange {
    Appended { id: Uuid },
    /// `index` is the position the entry held before removal
    Removed { index: usize, id: Uuid },
    Cleared { count: usize },
    /// The whole log was replaced by a pushed remote value
    Replaced,
}

/// Append-only, newest-first log of `RateEntry` values.
///
/// Index 0 is always the most recent entry and the last index is the
/// baseline. Indices are positional: removing an entry shifts every older
/// entry down by one, so callers holding indices must re-read them after
/// any structural change (or use `position` with an id).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<RateEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from entries already in newest-first order.
    pub fn from_entries(entries: Vec<RateEntry>) -> Self {
        Self { entries }
    }

    /// Insert at the head. No deduplication.
    pub fn append(&mut self, entry: RateEntry) {
        self.entries.insert(0, entry);
    }

    /// Remove the entry at `index` in the current newest-first ordering.
    pub fn remove(&mut self, index: usize) -> Result<RateEntry, CoreError> {
        if index >= self.entries.len() {
            return Err(CoreError::EntryNotFound(format!(
                "index {index} (history has {} entries)",
                self.entries.len()
            )));
        }
        Ok(self.entries.remove(index))
    }

    /// Empty the log, returning how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Keep at most `limit` entries, evicting the oldest. Returns the
    /// evicted entries, oldest last.
    pub fn truncate_to(&mut self, limit: usize) -> Vec<RateEntry> {
        if self.entries.len() <= limit {
            return Vec::new();
        }
        self.entries.split_off(limit)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&RateEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    pub fn newest(&self) -> Option<&RateEntry> {
        self.entries.first()
    }

    /// The oldest entry, used as the fixed comparison point for
    /// baseline-relative deltas.
    pub fn baseline(&self) -> Option<&RateEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RateEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a RateEntry;
    type IntoIter = std::slice::Iter<'a, RateEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
