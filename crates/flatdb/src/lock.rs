//! Collection lock manager.
//!
//! One exclusive lock per collection name, created on first reference and kept
//! for the life of the store. The table itself sits behind a single mutex that
//! is held only for the lookup/insert; the returned guard owns its own `Arc`,
//! so the table lock is already released by the time a caller blocks on (or
//! holds) a collection lock.
//!
//! Only mutating operations take collection locks. Readers rely on atomic
//! rename instead.

use parking_lot::{ArcMutexGuard, Mutex, RawMutex};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Exclusive hold on one collection. Released on drop.
pub type CollectionGuard = ArcMutexGuard<RawMutex, ()>;

#[derive(Debug, Default)]
pub struct LockManager {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the collection's lock is free, then returns the guard.
    pub fn acquire(&self, collection: &str) -> CollectionGuard {
        let lock = self.handle(collection);
        lock.lock_arc()
    }

    #[cfg(test)]
    fn try_acquire(&self, collection: &str) -> Option<CollectionGuard> {
        let lock = self.handle(collection);
        lock.try_lock_arc()
    }

    /// Number of collections that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn handle(&self, collection: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        if let Some(lock) = locks.get(collection) {
            return Arc::clone(lock);
        }
        debug!(collection, "creating collection lock");
        let lock = Arc::new(Mutex::new(()));
        locks.insert(collection.to_string(), Arc::clone(&lock));
        lock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn locks_are_created_lazily_and_reused() {
        let manager = LockManager::new();
        assert!(manager.is_empty());

        drop(manager.acquire("bands"));
        drop(manager.acquire("bands"));
        assert_eq!(manager.len(), 1);

        drop(manager.acquire("albums"));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn same_collection_is_exclusive() {
        let manager = LockManager::new();
        let guard = manager.acquire("bands");
        assert!(manager.try_acquire("bands").is_none());
        drop(guard);
        assert!(manager.try_acquire("bands").is_some());
    }

    #[test]
    fn different_collections_do_not_block_each_other() {
        let manager = Arc::new(LockManager::new());
        let _held = manager.acquire("a");

        let (tx, rx) = mpsc::channel();
        let m = Arc::clone(&manager);
        thread::spawn(move || {
            let _guard = m.acquire("b");
            tx.send(()).unwrap();
        });

        rx.recv_timeout(Duration::from_secs(5))
            .expect("lock on 'b' should not wait for 'a'");
    }

    #[test]
    fn waiter_proceeds_after_release() {
        let manager = Arc::new(LockManager::new());
        let held = manager.acquire("bands");

        let (tx, rx) = mpsc::channel();
        let m = Arc::clone(&manager);
        let handle = thread::spawn(move || {
            let _guard = m.acquire("bands");
            tx.send(()).unwrap();
        });

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        drop(held);
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        handle.join().unwrap();
    }
}
