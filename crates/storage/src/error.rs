use std::fmt;

use thiserror::Error;

/// Backend-level failure, independent of which collection was being written.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("record {index} cannot be encoded: {reason}")]
    Encode { index: usize, reason: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Step of a collection sync that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncPhase {
    /// Converting records to the store's document format, before anything is deleted.
    Encode,
    Delete,
    Insert,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncPhase::Encode => "encode",
            SyncPhase::Delete => "delete",
            SyncPhase::Insert => "insert",
        };
        f.write_str(s)
    }
}

/// A failed sync of one collection.
#[derive(Error, Debug)]
#[error("sync of '{collection}' failed during {phase}: {source}")]
pub struct StorageError {
    pub collection: String,
    pub phase: SyncPhase,
    #[source]
    pub source: StoreError,
}

impl StorageError {
    pub fn new(collection: &str, phase: SyncPhase, source: StoreError) -> Self {
        Self {
            collection: collection.to_string(),
            phase,
            source,
        }
    }
}
