//! Read collections back after a run and compare them with the report.

use roster_storage::DocumentStore;
use tracing::{error, info, warn};

use crate::report::{EntryOutcome, RunReport};

/// What the store holds for one collection of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Synced, and the collection holds exactly the inserted records.
    Matches { collection: String, count: u64 },
    /// Synced, but the collection holds a different number of records.
    Mismatch {
        collection: String,
        expected: u64,
        found: u64,
    },
    /// Skipped or failed; `count` records from an earlier run are still there.
    Retained { collection: String, count: u64 },
    Unreadable { collection: String, reason: String },
}

impl Verification {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Verification::Mismatch { .. })
    }
}

/// Check every entry of `report` against `store`, in report order.
pub async fn verify_run(store: &dyn DocumentStore, report: &RunReport) -> Vec<Verification> {
    let mut results = Vec::with_capacity(report.entries.len());

    for entry in &report.entries {
        let collection = entry.collection.clone();
        let result = match entry.outcome {
            EntryOutcome::Synced { count: expected, .. } => match store.find_all(&collection).await {
                Ok(records) => {
                    let found = records.len() as u64;
                    if found == expected {
                        info!(collection = %collection, count = found, "Collection verified");
                        Verification::Matches { collection, count: found }
                    } else {
                        warn!(collection = %collection, expected, found, "Collection count differs from run");
                        Verification::Mismatch {
                            collection,
                            expected,
                            found,
                        }
                    }
                }
                Err(e) => {
                    error!(collection = %collection, error = %e, "Could not verify collection");
                    Verification::Unreadable {
                        collection,
                        reason: e.to_string(),
                    }
                }
            },
            _ => match store.count(&collection).await {
                Ok(count) => {
                    info!(collection = %collection, count, "Collection kept from an earlier run");
                    Verification::Retained { collection, count }
                }
                Err(e) => {
                    error!(collection = %collection, error = %e, "Could not verify collection");
                    Verification::Unreadable {
                        collection,
                        reason: e.to_string(),
                    }
                }
            },
        };
        results.push(result);
    }

    results
}
