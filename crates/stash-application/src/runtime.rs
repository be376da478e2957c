//! Cache runtime
//!
//! The registry and the operation lock are process-scoped values. A
//! [`CacheRuntime`] bundles them so they are built once at startup and
//! handed to every `load`, instead of living in hidden globals.

use crate::cache::{Cache, OperationLock};
use crate::registry::ProviderRegistry;
use stash_domain::error::Result;
use stash_domain::value_objects::CacheConfig;
use std::sync::Arc;

/// Registry + shared operation lock
#[derive(Debug, Clone)]
pub struct CacheRuntime {
    registry: Arc<ProviderRegistry>,
    lock: OperationLock,
}

impl CacheRuntime {
    /// Create a runtime around a fully populated registry
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            lock: OperationLock::new(),
        }
    }

    /// Load a cache; every cache from this runtime shares one lock
    pub async fn load(&self, config: &CacheConfig) -> Result<Cache> {
        Cache::load(config, &self.registry, self.lock.clone()).await
    }

    /// The registry drivers are resolved from
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// The lock shared by every cache of this runtime
    pub fn lock(&self) -> &OperationLock {
        &self.lock
    }
}
