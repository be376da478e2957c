//! Cache bootstrap
//!
//! Builds the process runtime from every provider linked into the binary
//! and loads caches from application configuration.

// Force linkme registration of all providers
extern crate stash_providers;

use crate::config::AppConfig;
use stash_application::{Cache, CacheRuntime, ProviderRegistry};
use stash_domain::error::Result;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Process-wide runtime, built on first use
static DEFAULT_RUNTIME: OnceLock<CacheRuntime> = OnceLock::new();

/// Build a standalone runtime holding every linked provider and a fresh lock
///
/// Caches loaded through it are not serialized against the process runtime.
pub fn new_runtime() -> CacheRuntime {
    let registry = ProviderRegistry::with_registered_providers();
    debug!(drivers = ?registry.drivers(), "Cache providers collected");
    CacheRuntime::new(registry)
}

/// The process runtime
///
/// Every call returns a handle to the same registry and operation lock, so
/// all caches loaded through it share one lock.
pub fn default_runtime() -> CacheRuntime {
    DEFAULT_RUNTIME.get_or_init(new_runtime).clone()
}

/// Load the cache described by `config` through the process runtime
pub async fn init_cache(config: &AppConfig) -> Result<Cache> {
    let cache = default_runtime().load(&config.cache).await?;
    info!(driver = cache.driver(), "Cache ready");
    Ok(cache)
}
