//! # Stash
//!
//! One cache API over in-process memory, Redis and Memcached. Pick a
//! backend by driver name; typed values are JSON-encoded on the way in and
//! decoded on the way out.
//!
//! ## Example
//!
//! ```ignore
//! use stash::domain::{CacheConfig, Options};
//! use stash::infrastructure::default_runtime;
//! use std::time::Duration;
//!
//! let runtime = default_runtime();
//! let cache = runtime.load(&CacheConfig::redis("127.0.0.1:6379")).await?;
//!
//! cache
//!     .set("key", "stash", Options::new().with_expiration(Duration::from_secs(3600)).with_tag("tag"))
//!     .await?;
//! let value: String = cache.get("key").await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - ports, config value objects and the error type
//! - `application` - provider registry, runtime and the [`Cache`] facade
//! - `providers` - memory, Redis and Memcached backends
//! - `infrastructure` - configuration, logging and bootstrap

/// Domain layer - ports, options and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use stash_domain::*;
}

/// Application layer - registry, runtime and cache facade
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use stash_application::*;
}

/// Cache backends
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use stash_providers::*;
}

/// Infrastructure layer - config, logging and bootstrap
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use stash_infrastructure::*;
}

/// Runnable demos behind the `stash` binary flags
pub mod demos;

pub use stash_application::{Cache, CacheRuntime};
pub use stash_domain::{CacheConfig, Error, Expiration, InvalidateOptions, Options, Result};
