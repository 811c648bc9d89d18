//! Per-entry outcomes of one run.

use std::fmt;

use chrono::{DateTime, Utc};
use roster_source::FetchError;
use roster_storage::{StorageError, SyncResult};
use uuid::Uuid;

/// What happened to one endpoint.
#[derive(Debug)]
pub enum EntryOutcome {
    Synced { count: u64, removed: u64 },
    Skipped { reason: String },
    FetchFailed(FetchError),
    StoreFailed(StorageError),
}

impl EntryOutcome {
    pub fn from_sync(result: SyncResult) -> Self {
        match result {
            SyncResult::Replaced { count, removed } => EntryOutcome::Synced { count, removed },
            SyncResult::Skipped { reason } => EntryOutcome::Skipped { reason },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, EntryOutcome::FetchFailed(_) | EntryOutcome::StoreFailed(_))
    }
}

impl fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryOutcome::Synced { count, .. } => write!(f, "synced {count} records"),
            EntryOutcome::Skipped { reason } => write!(f, "skipped ({reason})"),
            EntryOutcome::FetchFailed(e) => write!(f, "fetch failed: {e}"),
            EntryOutcome::StoreFailed(e) => write!(f, "store failed: {e}"),
        }
    }
}

#[derive(Debug)]
pub struct EntryReport {
    pub collection: String,
    pub path: String,
    pub outcome: EntryOutcome,
    pub duration_ms: u64,
}

/// Everything one [`crate::Orchestrator::run`] did, in table order.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub entries: Vec<EntryReport>,
}

impl RunReport {
    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_failure()).count()
    }

    pub fn synced(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, EntryOutcome::Synced { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, EntryOutcome::Skipped { .. }))
            .count()
    }

    /// True when no entry failed. Skips don't count as failures.
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    /// Whether the process should exit non-zero. Only `strict` runs fail, and
    /// only on fetch or store failures.
    pub fn fails_run(&self, strict: bool) -> bool {
        strict && !self.is_clean()
    }

    pub fn entry(&self, collection: &str) -> Option<&EntryReport> {
        self.entries.iter().find(|e| e.collection == collection)
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
