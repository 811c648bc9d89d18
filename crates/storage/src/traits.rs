//! Document store trait definition.

use roster_core::Record;

use crate::error::StoreError;

/// Operations the synchronizer needs from a destination store.
///
/// No schema or index management; a collection is just a named bag of records.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Remove every record in `collection`. Returns how many were removed.
    async fn delete_all(&self, collection: &str) -> Result<u64, StoreError>;

    /// Insert `records` into `collection` in order. Returns how many were inserted.
    async fn insert_many(&self, collection: &str, records: &[Record]) -> Result<u64, StoreError>;

    /// Number of records currently in `collection`.
    async fn count(&self, collection: &str) -> Result<u64, StoreError>;

    /// Read a whole collection back, without store-generated ids.
    async fn find_all(&self, collection: &str) -> Result<Vec<Record>, StoreError>;

    /// Check that every record can be written, without writing anything.
    ///
    /// Called before `delete_all` so an unencodable payload never wipes data.
    async fn prepare(&self, _collection: &str, _records: &[Record]) -> Result<(), StoreError> {
        Ok(())
    }

    /// Release backend resources at the end of a run. Default: nothing to release.
    async fn shutdown(&self) {}

    /// Human-readable backend name (e.g. "mongodb", "memory").
    fn name(&self) -> &str;
}
