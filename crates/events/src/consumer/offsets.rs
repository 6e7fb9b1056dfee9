//! Commit watermarks for out-of-order completion.
//!
//! Lanes finish messages in any order across records, but a partition's
//! committed offset may only move past messages that are all done. Each
//! partition keeps its in-flight offsets in a `BTreeMap`; the watermark is
//! one past the highest offset below which everything has completed.

use std::collections::{BTreeMap, HashMap};

/// `(topic, partition)`.
pub type PartitionKey = (String, i32);

#[derive(Debug, Default)]
struct PartitionState {
    /// In-flight offsets and whether each has completed.
    pending: BTreeMap<i64, bool>,
}

#[derive(Debug, Default)]
pub struct OffsetTracker {
    partitions: HashMap<PartitionKey, PartitionState>,
}

impl OffsetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `offset` was received and is now in flight.
    pub fn begin(&mut self, key: &PartitionKey, offset: i64) {
        self.partitions
            .entry(key.clone())
            .or_default()
            .pending
            .insert(offset, false);
    }

    /// Mark `offset` done. Returns the new commit watermark when it advanced.
    pub fn complete(&mut self, key: &PartitionKey, offset: i64) -> Option<i64> {
        let state = self.partitions.get_mut(key)?;
        if let Some(done) = state.pending.get_mut(&offset) {
            *done = true;
        } else {
            return None;
        }

        let mut advanced = None;
        while let Some(entry) = state.pending.first_entry() {
            if !*entry.get() {
                break;
            }
            let (offset, _) = entry.remove_entry();
            advanced = Some(offset + 1);
        }
        advanced
    }

    /// Offsets still in flight across all partitions.
    pub fn in_flight(&self) -> usize {
        self.partitions
            .values()
            .map(|s| s.pending.values().filter(|done| !**done).count())
            .sum()
    }
}
