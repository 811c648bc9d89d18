//! Run orchestration for the roster ingestion jobs.
//!
//! This crate provides:
//! - `Job`, the two provider jobs and their endpoint tables
//! - `Orchestrator`, which fetches and syncs every endpoint of a table with per-entry error isolation
//! - `RunReport`, the per-entry outcome of one run
//! - `RunLock`, an advisory file lock that keeps overlapping runs from interleaving
//! - `verify_run`, which reads synced collections back after a run

pub mod job;
pub mod lock;
pub mod orchestrator;
pub mod report;
pub mod verify;

pub use job::Job;
pub use lock::RunLock;
pub use orchestrator::Orchestrator;
pub use report::{EntryOutcome, EntryReport, RunReport};
pub use verify::{verify_run, Verification};
