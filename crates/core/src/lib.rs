pub mod config;
pub mod endpoint;
pub mod error;
pub mod payload;

pub use config::Config;
pub use endpoint::*;
pub use error::*;
pub use payload::*;
