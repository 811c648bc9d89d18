//! roster-ingest — single-pass sync of one provider into MongoDB.
//!
//! Fetches every endpoint of the chosen job and replaces the matching
//! collections. Meant to be fired by cron; each invocation is one run.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use roster_core::config::{load_dotenv, Config};
use roster_ingest::{verify_run, Job, Orchestrator, RunLock};
use roster_source::HttpSource;
use roster_storage::{open_store, CollectionSynchronizer, StoreKind};

// ── CLI ─────────────────────────────────────────────────────────────

/// Pull reference datasets from a sports-data API and replace their collections.
#[derive(Parser, Debug)]
#[command(name = "roster-ingest", version, about)]
struct Cli {
    /// Which provider to ingest.
    #[arg(value_enum)]
    job: Job,

    /// Exit non-zero when any endpoint failed to fetch or store.
    #[arg(long, env = "ROSTER_STRICT")]
    strict: bool,

    /// Endpoints processed at once (1 = sequential).
    #[arg(long, env = "ROSTER_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Lock file held for the whole run; a second run aborts while it exists.
    #[arg(long, env = "ROSTER_LOCK_FILE")]
    lock_file: Option<PathBuf>,

    /// Write to an in-memory store instead of MongoDB.
    #[arg(long)]
    memory: bool,

    /// Read each collection back after the run and compare it with what was synced.
    #[arg(long)]
    verify: bool,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env();
    config.validate()?;
    config.log_summary();

    let _lock = cli.lock_file.as_deref().map(RunLock::acquire).transpose()?;

    let kind = if cli.memory { StoreKind::Memory } else { StoreKind::Mongo };
    let store = open_store(&config, kind).await?;

    let source = HttpSource::new(cli.job.source_settings(&config))?;
    let table = cli.job.endpoints()?;

    let orchestrator = Orchestrator::new(
        Arc::new(source),
        CollectionSynchronizer::new(store.clone()),
        cli.job.completion_message(),
    )
    .with_concurrency(cli.concurrency);

    info!(job = cli.job.name(), endpoints = table.len(), "roster-ingest starting");
    let report = orchestrator.run(&table).await;

    if cli.verify {
        let mismatches = verify_run(store.as_ref(), &report)
            .await
            .iter()
            .filter(|v| v.is_mismatch())
            .count();
        if mismatches > 0 {
            warn!(mismatches, "Verification found collections that differ from the run");
        }
    }

    for entry in &report.entries {
        info!(
            collection = %entry.collection,
            duration_ms = entry.duration_ms,
            "{}: {}",
            entry.collection,
            entry.outcome
        );
    }

    store.shutdown().await;

    if report.fails_run(cli.strict) {
        anyhow::bail!(
            "{} of {} endpoints failed",
            report.failed(),
            report.entries.len()
        );
    }
    Ok(())
}
