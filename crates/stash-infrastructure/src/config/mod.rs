//! Application configuration
//!
//! [`types`] holds the serde structs, [`loader`] merges them from files and
//! the environment.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{AppConfig, LoggingConfig};
