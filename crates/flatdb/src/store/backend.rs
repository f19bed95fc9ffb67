use crate::error::Result;

/// Abstract interface for raw record I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while `Store` handles the "what" (identifiers, locking, validation, stats).
///
/// Identifiers reaching a backend have already been validated.
pub trait StorageBackend: Send + Sync {
    // --- Record Operations ---

    /// Read the raw JSON text of a record.
    /// Returns Ok(None) if the record does not exist.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_record(&self, collection: &str, resource: &str) -> Result<Option<String>>;

    /// Write a record, creating its collection if needed.
    /// MUST be atomic (e.g. write to tmp then rename): a concurrent reader sees
    /// either the old bytes or the new bytes, never a mix.
    fn write_record(&self, collection: &str, resource: &str, bytes: &[u8]) -> Result<()>;

    /// Delete a record. Returns Ok(false) if it did not exist.
    fn delete_record(&self, collection: &str, resource: &str) -> Result<bool>;

    // --- Discovery ---

    /// Raw text of every record in the collection, in listing order.
    /// Fails with `CollectionNotFound` if the collection does not exist.
    fn list_records(&self, collection: &str) -> Result<Vec<String>>;

    /// Number of records currently present. 0 for a missing collection.
    fn record_count(&self, collection: &str) -> usize;

    /// Names of all existing collections, sorted.
    fn list_collections(&self) -> Result<Vec<String>>;
}
