//! Source clients for the external sports-data APIs.
//!
//! This crate provides:
//! - `Source` trait for anything that can turn an endpoint path into a [`Payload`]
//! - `HttpSource`, a single-attempt JSON GET client built on reqwest
//! - Provider presets for SportsDataIO and Sleeper
//!
//! [`Payload`]: roster_core::Payload

pub mod error;
pub mod http;
pub mod traits;

pub use error::FetchError;
pub use http::{HttpSource, SourceSettings};
pub use traits::Source;
