//! Source trait definition.

use roster_core::Payload;

use crate::error::FetchError;

/// Something that can fetch one endpoint of an external API.
///
/// Implementations make exactly one attempt per call; the orchestrator
/// decides what to do with a failure.
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    /// Fetch and decode the resource at `path` (relative to the source's base URL).
    async fn fetch(&self, path: &str) -> Result<Payload, FetchError>;

    /// Human-readable name for logs (e.g. "sportsdata", "sleeper").
    fn name(&self) -> &str;
}
