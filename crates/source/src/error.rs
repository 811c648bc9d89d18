//! Fetch error types.

use thiserror::Error;

/// Why a single endpoint could not produce a payload.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("could not decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid header '{name}' for {source_name}: {reason}")]
    InvalidHeader {
        source_name: String,
        name: String,
        reason: String,
    },
}

impl FetchError {
    /// Endpoint path the error belongs to, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            FetchError::Request { endpoint, .. }
            | FetchError::Status { endpoint, .. }
            | FetchError::Decode { endpoint, .. } => Some(endpoint),
            FetchError::Client(_) | FetchError::InvalidHeader { .. } => None,
        }
    }

    /// HTTP status for non-success responses.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
