//! Snapshot diff output types.

use serde::{Deserialize, Serialize};

use crate::model::{Delta, MetricValue};
use crate::snapshot::model::metric_key;

/// Per-metric diff between two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDiff {
    /// Schema version of this diff structure (always 1)
    pub diff_schema_version: u32,
    /// Label of the earlier snapshot
    pub before_label: String,
    /// Label of the later snapshot
    pub after_label: String,
    /// One entry per metric, in snapshot order
    pub entries: Vec<DiffEntry>,
}

/// Before/after values and delta for one `(entity, asset)` metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub entity_name: String,
    pub asset_name: String,
    pub before: MetricValue,
    pub after: MetricValue,
    pub delta: Delta,
}

impl DiffEntry {
    pub fn metric(&self) -> String {
        metric_key(&self.entity_name, &self.asset_name)
    }
}

impl SnapshotDiff {
    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for one metric
    pub fn get(&self, entity_name: &str, asset_name: &str) -> Option<&DiffEntry> {
        self.entries
            .iter()
            .find(|e| e.entity_name == entity_name && e.asset_name == asset_name)
    }

    /// Delta for one metric
    pub fn delta_of(&self, entity_name: &str, asset_name: &str) -> Option<&Delta> {
        self.get(entity_name, asset_name).map(|e| &e.delta)
    }

    /// Entries that moved or cannot be compared, in order
    pub fn changes(&self) -> impl Iterator<Item = &DiffEntry> + '_ {
        self.entries.iter().filter(|e| !e.delta.is_zero())
    }

    /// True when every metric has a zero numeric delta
    pub fn is_noop(&self) -> bool {
        self.changes().next().is_none()
    }
}
