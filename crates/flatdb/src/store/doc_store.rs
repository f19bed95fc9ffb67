use super::backend::StorageBackend;
use super::fs_backend::FsBackend;
use crate::error::{Result, StoreError};
use crate::lock::LockManager;
use crate::query::Query;
use crate::record::{self, Record};
use crate::stats::{CollectionStats, Operation, StatsTracker};
use crate::validate::{Validator, ValidatorRegistry};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Options accepted by [`Store::open`] and [`Store::with_backend`].
#[derive(Default, Clone)]
pub struct StoreOptions {
    /// Validators to register before the store is handed out.
    pub validators: HashMap<String, Arc<dyn Validator>>,
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validator(
        mut self,
        collection: impl Into<String>,
        validator: impl Validator + 'static,
    ) -> Self {
        self.validators.insert(collection.into(), Arc::new(validator));
        self
    }
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.validators.keys().collect();
        names.sort();
        f.debug_struct("StoreOptions")
            .field("validators", &names)
            .finish()
    }
}

/// Concurrent document store.
///
/// Mutating operations (write, update, delete) serialize per collection
/// through the [`LockManager`]. Reads (read, read_all, query) take no lock;
/// they rely on the backend's atomic write to never observe a partial record.
pub struct Store<B: StorageBackend = FsBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    locks: LockManager,
    validators: ValidatorRegistry,
    stats: StatsTracker,
}

impl Store<FsBackend> {
    /// Opens (or creates) a store rooted at `root`. Existing content is never touched.
    pub fn open(root: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let root = root.as_ref();
        if root.is_dir() {
            debug!(root = %root.display(), "using existing database");
        } else {
            debug!(root = %root.display(), "creating database");
            fs::create_dir_all(root).map_err(|e| StoreError::io("create directory", root, e))?;
        }
        Ok(Self::with_backend(FsBackend::new(root), options))
    }

    pub fn root(&self) -> &Path {
        self.backend.root()
    }
}

impl<B: StorageBackend> Store<B> {
    pub fn with_backend(backend: B, options: StoreOptions) -> Self {
        let validators = ValidatorRegistry::new();
        for (collection, validator) in options.validators {
            validators.insert(collection, validator);
        }
        Self {
            backend,
            locks: LockManager::new(),
            validators,
            stats: StatsTracker::new(),
        }
    }

    /// Registers (or replaces) the validator for `collection`.
    pub fn add_validator(&self, collection: impl Into<String>, validator: impl Validator + 'static) {
        self.validators.insert(collection, Arc::new(validator));
    }

    /// Creates or fully replaces a record.
    pub fn write<T: Serialize + ?Sized>(&self, collection: &str, resource: &str, data: &T) -> Result<()> {
        check_identifiers(collection, resource)?;
        if self.validators.contains(collection) {
            let payload = record::to_value(data)?;
            self.validate(collection, &payload)?;
        }

        let _guard = self.locks.acquire(collection);
        let bytes = record::encode(data)?;
        self.backend.write_record(collection, resource, &bytes)?;
        self.record_stats(collection, Operation::Write);
        debug!(collection, resource, "write committed");
        Ok(())
    }

    /// Reads a record into the caller's shape. Takes no lock.
    pub fn read<T: DeserializeOwned>(&self, collection: &str, resource: &str) -> Result<T> {
        check_identifiers(collection, resource)?;

        let raw = self
            .backend
            .read_record(collection, resource)?
            .ok_or_else(|| StoreError::not_found(collection, resource))?;
        let data = record::decode(&raw)?;
        self.record_stats(collection, Operation::Read);
        Ok(data)
    }

    /// Merges `fields` into an existing record, last write wins per field.
    ///
    /// The merged payload is re-validated before it is persisted.
    pub fn update(&self, collection: &str, resource: &str, fields: Record) -> Result<()> {
        check_identifiers(collection, resource)?;

        let _guard = self.locks.acquire(collection);
        let raw = self
            .backend
            .read_record(collection, resource)?
            .ok_or_else(|| StoreError::not_found(collection, resource))?;
        let mut current: Record = record::decode(&raw)?;
        record::merge(&mut current, fields);

        let merged = Value::Object(current);
        self.validate(collection, &merged)?;

        let bytes = record::encode(&merged)?;
        self.backend.write_record(collection, resource, &bytes)?;
        self.record_stats(collection, Operation::Update);
        debug!(collection, resource, "update committed");
        Ok(())
    }

    pub fn delete(&self, collection: &str, resource: &str) -> Result<()> {
        check_identifiers(collection, resource)?;

        let _guard = self.locks.acquire(collection);
        if !self.backend.delete_record(collection, resource)? {
            return Err(StoreError::not_found(collection, resource));
        }
        self.record_stats(collection, Operation::Delete);
        debug!(collection, resource, "delete committed");
        Ok(())
    }

    /// Writes every item in turn, stopping at the first failure.
    ///
    /// Not atomic: items written before the failure stay committed, and the
    /// order in which items are attempted is the iteration order of `items`.
    pub fn batch_write<I, K, T>(&self, collection: &str, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
        T: Serialize,
    {
        check_identifier("collection", collection)?;

        for (resource, data) in items {
            let resource = resource.as_ref();
            self.write(collection, resource, &data)
                .map_err(|e| StoreError::Batch {
                    resource: resource.to_string(),
                    source: Box::new(e),
                })?;
        }
        Ok(())
    }

    /// Raw text of every record in the collection, in listing order.
    pub fn read_all(&self, collection: &str) -> Result<Vec<String>> {
        check_identifier("collection", collection)?;
        self.backend.list_records(collection)
    }

    /// Linear scan returning the records that satisfy `query`.
    ///
    /// Records that fail to parse, or are not JSON objects, are skipped.
    pub fn query(&self, collection: &str, query: &Query) -> Result<Vec<Record>> {
        let raw_records = self.read_all(collection)?;

        let mut results = Vec::new();
        for raw in raw_records {
            let record = match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(record)) => record,
                Ok(_) => continue,
                Err(e) => {
                    warn!(collection, error = %e, "skipping unparsable record");
                    continue;
                }
            };
            if query.matches(&record) {
                results.push(record);
            }
        }
        Ok(results)
    }

    /// Counters for `collection` with a freshly listed record count.
    pub fn get_stats(&self, collection: &str) -> CollectionStats {
        let record_count = match check_identifier("collection", collection) {
            Ok(()) => self.backend.record_count(collection),
            Err(_) => 0,
        };
        self.stats.snapshot(collection, record_count)
    }

    /// Names of the collections that currently exist.
    pub fn collections(&self) -> Result<Vec<String>> {
        self.backend.list_collections()
    }

    fn validate(&self, collection: &str, payload: &Value) -> Result<()> {
        self.validators
            .check(collection, payload)
            .map_err(|source| StoreError::Validation {
                collection: collection.to_string(),
                source,
            })
    }

    fn record_stats(&self, collection: &str, op: Operation) {
        let record_count = self.backend.record_count(collection);
        self.stats.record(collection, op, record_count);
    }
}

impl<B: StorageBackend> fmt::Debug for Store<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("validators", &self.validators)
            .field("locks", &self.locks.len())
            .finish_non_exhaustive()
    }
}

fn check_identifiers(collection: &str, resource: &str) -> Result<()> {
    check_identifier("collection", collection)?;
    check_identifier("resource", resource)
}

/// Identifiers become path components, so they must be non-empty and unable
/// to address anything outside their own directory.
fn check_identifier(what: &'static str, value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        "cannot be empty"
    } else if value == "." || value == ".." {
        "cannot be a relative path component"
    } else if value.contains(&['/', '\\', '\0'][..]) {
        "cannot contain path separators or NUL"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidIdentifier {
        what,
        value: value.to_string(),
        reason,
    })
}
