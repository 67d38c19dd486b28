use std::collections::BTreeMap;

use crate::models::delta::{ChangeKind, DeltaGroup, DeltaRecord, ReferencePolicy, Trend};
use crate::models::history::{HistoryLog, RateEntry};
use crate::models::snapshot::Denomination;

/// Derives per-denomination quantity changes from a history log.
///
/// Pure business logic: the output depends only on the log passed in, so
/// it is recomputed on every request and never stored.
pub struct DeltaService;

impl DeltaService {
    pub fn new() -> Self {
        Self
    }

    /// Compute change groups under the given reference policy.
    ///
    /// Groups come back in `Denomination::ALL` order, each listing its
    /// changes newest-first. Denominations that never changed are omitted.
    pub fn compute(&self, history: &HistoryLog, policy: ReferencePolicy) -> Vec<DeltaGroup> {
        let mut by_denomination: BTreeMap<Denomination, Vec<DeltaRecord>> = BTreeMap::new();

        match policy {
            ReferencePolicy::PreviousEntry => {
                let entries = history.entries();
                // Walk oldest to newest: entries[i + 1] is the predecessor of entries[i].
                for i in (0..entries.len().saturating_sub(1)).rev() {
                    Self::collect_changes(&entries[i], &entries[i + 1], &mut by_denomination);
                }
                for changes in by_denomination.values_mut() {
                    changes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                }
            }
            ReferencePolicy::FixedBaseline => {
                let entries = history.entries();
                if let Some((baseline, newer)) = entries.split_last() {
                    // Newest-first construction; the baseline is never compared with itself.
                    for entry in newer {
                        Self::collect_changes(entry, baseline, &mut by_denomination);
                    }
                }
            }
        }

        by_denomination
            .into_iter()
            .filter(|(_, changes)| !changes.is_empty())
            .map(|(denomination, changes)| DeltaGroup {
                denomination,
                changes,
            })
            .collect()
    }

    /// Direction of `current` relative to `previous`. A missing previous
    /// value is the neutral case, not a comparison against zero.
    pub fn trend(&self, current: f64, previous: Option<f64>) -> Trend {
        match previous {
            None => Trend::Unknown,
            Some(prev) if current > prev => Trend::Up,
            Some(prev) if current < prev => Trend::Down,
            Some(_) => Trend::Flat,
        }
    }

    fn collect_changes(
        entry: &RateEntry,
        reference: &RateEntry,
        out: &mut BTreeMap<Denomination, Vec<DeltaRecord>>,
    ) {
        for denomination in Denomination::ALL {
            let previous = reference.amounts.get(denomination);
            let current = entry.amounts.get(denomination);
            if current == previous {
                continue;
            }
            let difference = current - previous;
            out.entry(denomination).or_default().push(DeltaRecord {
                denomination,
                entry_id: entry.id,
                timestamp: entry.timestamp,
                reference_timestamp: reference.timestamp,
                previous,
                current,
                difference,
                kind: ChangeKind::from_difference(difference),
            });
        }
    }
}

impl Default for DeltaService {
    fn default() -> Self {
        Self::new()
    }
}
