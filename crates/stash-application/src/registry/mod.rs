//! Cache Provider Registry
//!
//! Maps driver names to provider constructors.
//!
//! Providers in `stash-providers` submit a [`CacheProviderEntry`] into the
//! [`CACHE_PROVIDERS`] distributed slice at link time.
//! [`ProviderRegistry::with_registered_providers`] collects them into an
//! explicit registry value; tests and embedders can also call
//! [`ProviderRegistry::register`] directly.
//!
//! Registering the same name twice is a wiring bug and panics.
//!
//! ### Registering a Provider (in stash-providers)
//!
//! ```ignore
//! use stash_application::registry::{CacheProviderEntry, CACHE_PROVIDERS};
//!
//! fn memory_cache_factory(config: &CacheConfig) -> Box<dyn CacheProvider> {
//!     Box::new(MemoryCacheProvider::from_config(config))
//! }
//!
//! #[linkme::distributed_slice(CACHE_PROVIDERS)]
//! static MEMORY_PROVIDER: CacheProviderEntry = CacheProviderEntry {
//!     name: "memory",
//!     description: "In-process memory cache",
//!     factory: memory_cache_factory,
//! };
//! ```

use stash_domain::error::{Error, Result};
use stash_domain::ports::CacheProvider;
use stash_domain::value_objects::CacheConfig;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Constructor stored in the registry
pub type ProviderFactory = fn(&CacheConfig) -> Box<dyn CacheProvider>;

/// Registry entry for cache providers
///
/// Each provider implementation submits one of these with
/// `#[linkme::distributed_slice(CACHE_PROVIDERS)]`.
pub struct CacheProviderEntry {
    /// Unique driver name (e.g., "memory", "redis", "memcache")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: ProviderFactory,
}

// Auto-collection via linkme distributed slices - providers submit entries at compile time
#[linkme::distributed_slice]
pub static CACHE_PROVIDERS: [CacheProviderEntry] = [..];

#[derive(Clone)]
struct RegisteredProvider {
    description: String,
    factory: ProviderFactory,
}

/// Driver name → provider constructor
///
/// Populated once at startup and read-only afterwards.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, RegisteredProvider>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every entry submitted to [`CACHE_PROVIDERS`]
    ///
    /// # Panics
    ///
    /// Panics if two linked entries share a name.
    pub fn with_registered_providers() -> Self {
        let mut registry = Self::new();
        for entry in CACHE_PROVIDERS {
            registry.register(entry.name, entry.description, entry.factory);
        }
        registry
    }

    /// Register a provider constructor under `name`
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    pub fn register(&mut self, name: &str, description: &str, factory: ProviderFactory) {
        assert!(
            !self.exists(name),
            "cache provider '{name}' is already registered"
        );

        debug!(driver = name, "Registered cache provider");
        self.providers.insert(
            name.to_string(),
            RegisteredProvider {
                description: description.to_string(),
                factory,
            },
        );
    }

    /// Check whether a driver name is registered
    pub fn exists(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Construct the provider selected by `config`
    pub fn resolve(&self, config: &CacheConfig) -> Result<Box<dyn CacheProvider>> {
        let driver = config.effective_driver();

        match self.providers.get(driver) {
            Some(registered) => Ok((registered.factory)(config)),
            None => Err(Error::unknown_driver(
                driver,
                self.providers.keys().cloned().collect(),
            )),
        }
    }

    /// List registered drivers as (name, description) pairs, sorted by name
    pub fn drivers(&self) -> Vec<(&str, &str)> {
        self.providers
            .iter()
            .map(|(name, registered)| (name.as_str(), registered.description.as_str()))
            .collect()
    }

    /// Number of registered drivers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// True when nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("drivers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}
