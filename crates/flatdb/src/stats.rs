//! Per-collection usage statistics.
//!
//! Purely observational. Counters live behind their own mutex, independent of
//! the collection locks, and are bumped after each successful Write, Read,
//! Update or Delete. The record count is never tracked incrementally: the
//! store lists the collection directory and hands the number in, both when
//! recording an operation and when a snapshot is requested.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Write,
    Read,
    Update,
    Delete,
}

/// Operation counts split by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCounts {
    pub writes: u64,
    pub reads: u64,
    pub updates: u64,
    pub deletes: u64,
}

impl OperationCounts {
    pub fn total(&self) -> u64 {
        self.writes + self.reads + self.updates + self.deletes
    }

    fn bump(&mut self, op: Operation) {
        match op {
            Operation::Write => self.writes += 1,
            Operation::Read => self.reads += 1,
            Operation::Update => self.updates += 1,
            Operation::Delete => self.deletes += 1,
        }
    }
}

/// Snapshot returned by `Store::get_stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub operations: OperationCounts,
    pub total_operations: u64,
    /// `None` until the collection has seen its first operation.
    pub last_access: Option<DateTime<Utc>>,
    pub record_count: usize,
}

#[derive(Debug, Default, Clone)]
struct Counters {
    operations: OperationCounts,
    last_access: Option<DateTime<Utc>>,
    record_count: usize,
}

#[derive(Debug, Default)]
pub struct StatsTracker {
    collections: Mutex<HashMap<String, Counters>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, collection: &str, op: Operation, record_count: usize) {
        let mut collections = self.collections.lock();
        let counters = collections.entry(collection.to_string()).or_default();
        counters.operations.bump(op);
        counters.last_access = Some(Utc::now());
        counters.record_count = record_count;
    }

    /// Snapshot for `collection`, refreshing its record count.
    pub fn snapshot(&self, collection: &str, record_count: usize) -> CollectionStats {
        let mut collections = self.collections.lock();
        let counters = match collections.get_mut(collection) {
            Some(counters) => {
                counters.record_count = record_count;
                counters.clone()
            }
            None => Counters {
                record_count,
                ..Counters::default()
            },
        };
        CollectionStats {
            operations: counters.operations,
            total_operations: counters.operations.total(),
            last_access: counters.last_access,
            record_count: counters.record_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_collection_has_empty_stats() {
        let tracker = StatsTracker::new();
        let stats = tracker.snapshot("bands", 3);
        assert_eq!(stats.total_operations, 0);
        assert_eq!(stats.last_access, None);
        assert_eq!(stats.record_count, 3);
    }

    #[test]
    fn operations_are_counted_by_kind() {
        let tracker = StatsTracker::new();
        tracker.record("bands", Operation::Write, 1);
        tracker.record("bands", Operation::Write, 2);
        tracker.record("bands", Operation::Read, 2);
        tracker.record("bands", Operation::Delete, 1);

        let stats = tracker.snapshot("bands", 1);
        assert_eq!(
            stats.operations,
            OperationCounts {
                writes: 2,
                reads: 1,
                updates: 0,
                deletes: 1,
            }
        );
        assert_eq!(stats.total_operations, 4);
        assert!(stats.last_access.is_some());
    }

    #[test]
    fn collections_are_tracked_separately() {
        let tracker = StatsTracker::new();
        tracker.record("bands", Operation::Write, 1);

        assert_eq!(tracker.snapshot("bands", 1).total_operations, 1);
        assert_eq!(tracker.snapshot("albums", 0).total_operations, 0);
    }

    #[test]
    fn snapshot_refreshes_record_count() {
        let tracker = StatsTracker::new();
        tracker.record("bands", Operation::Write, 1);
        assert_eq!(tracker.snapshot("bands", 5).record_count, 5);
    }

    #[test]
    fn last_access_moves_forward() {
        let tracker = StatsTracker::new();
        tracker.record("bands", Operation::Write, 1);
        let first = tracker.snapshot("bands", 1).last_access.unwrap();
        tracker.record("bands", Operation::Read, 1);
        let second = tracker.snapshot("bands", 1).last_access.unwrap();
        assert!(second >= first);
    }
}
