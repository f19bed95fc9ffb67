use super::backend::StorageBackend;
use crate::error::{Result, StoreError};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory storage backend for testing.
///
/// Each collection is a `BTreeMap`, so listing order is by resource name just
/// like the sorted directory listing of `FsBackend`. Replacing a map entry is
/// a single step under the write lock, which gives the same all-or-nothing
/// visibility as the filesystem's tmp-then-rename.
#[derive(Default)]
pub struct MemBackend {
    collections: RwLock<HashMap<String, BTreeMap<String, String>>>,
    simulate_write_error: AtomicBool,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Test helper to plant raw text as a record, bypassing the codec.
    pub fn insert_raw(&self, collection: &str, resource: &str, text: &str) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(resource.to_string(), text.to_string());
    }
}

impl StorageBackend for MemBackend {
    fn read_record(&self, collection: &str, resource: &str) -> Result<Option<String>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|records| records.get(resource))
            .cloned())
    }

    fn write_record(&self, collection: &str, resource: &str, bytes: &[u8]) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(StoreError::Store("Simulated write error".to_string()));
        }
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|e| StoreError::Store(format!("record is not UTF-8: {}", e)))?;

        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(resource.to_string(), text);
        Ok(())
    }

    fn delete_record(&self, collection: &str, resource: &str) -> Result<bool> {
        let mut collections = self.collections.write();
        Ok(collections
            .get_mut(collection)
            .map(|records| records.remove(resource).is_some())
            .unwrap_or(false))
    }

    fn list_records(&self, collection: &str) -> Result<Vec<String>> {
        let collections = self.collections.read();
        collections
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))
    }

    fn record_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    fn list_collections(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
