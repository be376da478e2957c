//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns around the cache facade.
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment loading from defaults, `stash.toml` and `STASH__` env vars |
//! | [`constants`] | File names, env prefixes and logging defaults |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//!
//! ### Startup
//! | Module | Description |
//! |--------|-------------|
//! | [`bootstrap`] | Runtime with every linked provider, cache from config |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use bootstrap::{default_runtime, init_cache, new_runtime};
pub use config::{AppConfig, ConfigBuilder, ConfigLoader, LoggingConfig};
pub use error_ext::ErrorContext;
