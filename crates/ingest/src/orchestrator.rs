//! Fetch-then-sync over an endpoint table.
//!
//! Each entry is fetched from the source and written through the
//! synchronizer. A failure is logged against its collection and recorded in
//! the report; it never stops the remaining entries. The completion marker is
//! logged once at the end no matter how many entries failed.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use roster_core::{EndpointDescriptor, EndpointTable};
use roster_source::Source;
use roster_storage::CollectionSynchronizer;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::report::{EntryOutcome, EntryReport, RunReport};

pub struct Orchestrator {
    source: Arc<dyn Source>,
    synchronizer: CollectionSynchronizer,
    completion_message: String,
    /// Max entries in flight. 1 = strictly sequential.
    concurrency: usize,
}

impl Orchestrator {
    pub fn new(
        source: Arc<dyn Source>,
        synchronizer: CollectionSynchronizer,
        completion_message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            synchronizer,
            completion_message: completion_message.into(),
            concurrency: 1,
        }
    }

    /// Allow up to `n` entries to be fetched and synced at once.
    ///
    /// Entries write distinct collections, so they don't interfere; the report
    /// stays in table order either way.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Process every entry of `table` and return what happened to each.
    pub async fn run(&self, table: &EndpointTable) -> RunReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", %run_id, source = self.source.name());

        async move {
            let started_at = Utc::now();
            info!(
                endpoints = table.len(),
                concurrency = self.concurrency,
                "Starting ingestion run"
            );

            let entries: Vec<EntryReport> = stream::iter(table.iter())
                .map(|endpoint| self.process(endpoint))
                .buffered(self.concurrency)
                .collect()
                .await;

            let report = RunReport {
                run_id,
                source: self.source.name().to_string(),
                started_at,
                finished_at: Utc::now(),
                entries,
            };

            info!(
                synced = report.synced(),
                skipped = report.skipped(),
                failed = report.failed(),
                duration_ms = report.duration_ms(),
                "{}",
                self.completion_message
            );
            report
        }
        .instrument(span)
        .await
    }

    /// Fetch and sync one entry. Errors are logged here and folded into the outcome.
    async fn process(&self, endpoint: &EndpointDescriptor) -> EntryReport {
        let collection = endpoint.collection_name.as_str();
        let start = Instant::now();

        let outcome = match self.source.fetch(&endpoint.path).await {
            Err(e) => {
                error!(collection, endpoint = %endpoint.path, error = %e, "Error fetching {}", collection);
                EntryOutcome::FetchFailed(e)
            }
            Ok(payload) => match self.synchronizer.sync(collection, payload).await {
                Ok(result) => EntryOutcome::from_sync(result),
                Err(e) => {
                    error!(collection, phase = %e.phase, error = %e, "Error storing {}", collection);
                    EntryOutcome::StoreFailed(e)
                }
            },
        };

        EntryReport {
            collection: collection.to_string(),
            path: endpoint.path.clone(),
            outcome,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}
