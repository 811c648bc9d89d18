//! In-process [`DocumentStore`] for tests and `--memory` runs.
//!
//! Keeps every collection in a `HashMap` behind a tokio `RwLock`, records the
//! operations it receives, and can be told to fail a given phase for a given
//! collection.

use std::collections::HashMap;

use roster_core::Record;
use tokio::sync::RwLock;

use crate::error::{StoreError, SyncPhase};
use crate::traits::DocumentStore;

/// One operation received by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Prepare { collection: String, records: usize },
    DeleteAll { collection: String },
    InsertMany { collection: String, records: usize },
}

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Record>>>,
    calls: RwLock<Vec<StoreCall>>,
    failures: RwLock<HashMap<String, SyncPhase>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a collection without recording a call.
    pub async fn seed(&self, collection: &str, records: Vec<Record>) {
        self.collections
            .write()
            .await
            .insert(collection.to_string(), records);
    }

    /// Current contents of a collection (empty if it was never written).
    pub async fn snapshot(&self, collection: &str) -> Vec<Record> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Operations received so far, in order.
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.read().await.clone()
    }

    /// Make `phase` fail for `collection` from now on.
    pub async fn fail_on(&self, collection: &str, phase: SyncPhase) {
        self.failures
            .write()
            .await
            .insert(collection.to_string(), phase);
    }

    async fn check_failure(&self, collection: &str, phase: SyncPhase) -> Result<(), StoreError> {
        match self.failures.read().await.get(collection) {
            Some(p) if *p == phase => Err(StoreError::Unavailable(format!(
                "injected {phase} failure for {collection}"
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn delete_all(&self, collection: &str) -> Result<u64, StoreError> {
        self.calls.write().await.push(StoreCall::DeleteAll {
            collection: collection.to_string(),
        });
        self.check_failure(collection, SyncPhase::Delete).await?;

        let removed = self
            .collections
            .write()
            .await
            .remove(collection)
            .map(|v| v.len() as u64)
            .unwrap_or(0);
        Ok(removed)
    }

    async fn insert_many(&self, collection: &str, records: &[Record]) -> Result<u64, StoreError> {
        self.calls.write().await.push(StoreCall::InsertMany {
            collection: collection.to_string(),
            records: records.len(),
        });
        self.check_failure(collection, SyncPhase::Insert).await?;

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .extend(records.iter().cloned());
        Ok(records.len() as u64)
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|v| v.len() as u64)
            .unwrap_or(0))
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Record>, StoreError> {
        Ok(self.snapshot(collection).await)
    }

    async fn prepare(&self, collection: &str, records: &[Record]) -> Result<(), StoreError> {
        self.calls.write().await.push(StoreCall::Prepare {
            collection: collection.to_string(),
            records: records.len(),
        });
        self.check_failure(collection, SyncPhase::Encode).await
    }

    fn name(&self) -> &str {
        "memory"
    }
}
