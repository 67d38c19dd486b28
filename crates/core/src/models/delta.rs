use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::snapshot::Denomination;

/// Which entry a history entry is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferencePolicy {
    /// Compare each entry with the one recorded just before it
    #[default]
    PreviousEntry,
    /// Compare each entry with the oldest entry in the log
    FixedBaseline,
}

/// Classification of a quantity change by the sign of its difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Removed,
    /// Only reachable for a zero difference, which the engine never emits.
    Modified,
}

impl ChangeKind {
    pub fn from_difference(difference: f64) -> Self {
        if difference > 0.0 {
            ChangeKind::Added
        } else if difference < 0.0 {
            ChangeKind::Removed
        } else {
            ChangeKind::Modified
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Removed => write!(f, "removed"),
            ChangeKind::Modified => write!(f, "modified"),
        }
    }
}

/// A single quantity change for one denomination between an entry and its
/// reference entry. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaRecord {
    pub denomination: Denomination,

    /// The entry that holds `current`
    pub entry_id: Uuid,

    /// When that entry was recorded
    pub timestamp: DateTime<Utc>,

    /// When the reference entry (holding `previous`) was recorded
    pub reference_timestamp: DateTime<Utc>,

    pub previous: f64,
    pub current: f64,

    /// `current - previous`
    pub difference: f64,

    pub kind: ChangeKind,
}

/// All changes of one denomination, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaGroup {
    pub denomination: Denomination,
    pub changes: Vec<DeltaRecord>,
}

/// Direction of a scalar sum relative to its previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Flat,
    /// No previous value to compare with
    Unknown,
}

impl Trend {
    pub fn icon(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Flat => "→",
            Trend::Unknown => "",
        }
    }
}
