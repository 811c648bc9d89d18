//! Replace a collection's contents with a freshly fetched payload.
//!
//! A non-empty payload is written as delete-all then insert-all. An empty
//! payload leaves the collection alone so a provider hiccup returning `[]`
//! can't wipe the last good snapshot.

use std::sync::Arc;
use std::time::Instant;

use roster_core::Payload;
use tracing::{info, warn};

use crate::error::{StorageError, SyncPhase};
use crate::traits::DocumentStore;

/// Reason reported when an empty payload is skipped.
pub const EMPTY_PAYLOAD: &str = "empty payload";

/// Outcome of one successful [`CollectionSynchronizer::sync`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncResult {
    /// The collection now holds exactly `count` records; `removed` were deleted first.
    Replaced { count: u64, removed: u64 },
    /// Nothing was written.
    Skipped { reason: String },
}

impl SyncResult {
    pub fn is_skipped(&self) -> bool {
        matches!(self, SyncResult::Skipped { .. })
    }

    /// Records inserted (0 when skipped).
    pub fn count(&self) -> u64 {
        match self {
            SyncResult::Replaced { count, .. } => *count,
            SyncResult::Skipped { .. } => 0,
        }
    }
}

/// Writes payloads into a shared [`DocumentStore`], one collection at a time.
#[derive(Clone)]
pub struct CollectionSynchronizer {
    store: Arc<dyn DocumentStore>,
}

impl CollectionSynchronizer {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Replace `collection` with the records in `payload`.
    pub async fn sync(&self, collection: &str, payload: Payload) -> Result<SyncResult, StorageError> {
        let shape = payload.shape();
        let records = payload.normalize();

        if records.is_empty() {
            warn!(collection, shape, "No data returned, keeping existing records");
            return Ok(SyncResult::Skipped {
                reason: EMPTY_PAYLOAD.to_string(),
            });
        }

        let start = Instant::now();

        self.store
            .prepare(collection, &records)
            .await
            .map_err(|e| StorageError::new(collection, SyncPhase::Encode, e))?;

        let removed = self
            .store
            .delete_all(collection)
            .await
            .map_err(|e| StorageError::new(collection, SyncPhase::Delete, e))?;

        let count = self
            .store
            .insert_many(collection, &records)
            .await
            .map_err(|e| StorageError::new(collection, SyncPhase::Insert, e))?;

        info!(
            collection,
            count,
            removed,
            backend = self.store.name(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Inserted {} records into '{}' collection",
            count,
            collection
        );

        Ok(SyncResult::Replaced { count, removed })
    }
}
