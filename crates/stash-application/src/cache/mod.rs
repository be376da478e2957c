//! Cache facade
//!
//! [`Cache`] is the only type consumers touch. It hides which backend is
//! active, JSON-encodes values on the way in and decodes them on the way
//! out, and serializes every operation behind an [`OperationLock`].

mod lock;

pub use lock::OperationLock;

use crate::registry::ProviderRegistry;
use serde::Serialize;
use serde::de::DeserializeOwned;
use stash_domain::error::{Error, Result};
use stash_domain::ports::{CacheProvider, CacheStore};
use stash_domain::value_objects::{CacheConfig, InvalidateOptions, Options};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Provider-agnostic cache facade
///
/// Cloning is cheap; clones share the store and the lock.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
    driver: String,
    lock: OperationLock,
}

// Loading
impl Cache {
    /// Load a cache for the driver named in `config`
    ///
    /// Resolves the provider from `registry`, validates it, pings it and
    /// wraps the store it produces. Nothing is returned on failure.
    ///
    /// # Errors
    ///
    /// * [`Error::UnknownDriver`] - the driver is not registered
    /// * [`Error::InvalidConfig`] - the provider rejected its configuration
    /// * [`Error::Connection`] - the backend did not answer the ping
    pub async fn load(
        config: &CacheConfig,
        registry: &ProviderRegistry,
        lock: OperationLock,
    ) -> Result<Self> {
        let provider = registry.resolve(config).inspect_err(|e| {
            warn!(error = %e, "Cache driver could not be resolved");
        })?;

        Self::from_provider(provider.as_ref(), lock).await
    }

    /// Load a cache from an already constructed provider
    pub async fn from_provider(provider: &dyn CacheProvider, lock: OperationLock) -> Result<Self> {
        let driver = provider.driver();

        provider.validate().map_err(|e| {
            warn!(driver, error = %e, "Cache provider validation failed");
            as_invalid_config(driver, e)
        })?;

        provider.ping().await.map_err(|e| {
            warn!(driver, error = %e, "Cache provider ping failed");
            as_connection_error(driver, e)
        })?;

        let store = provider.store()?;
        info!(driver, "Cache loaded");

        Ok(Self::from_store(store, driver, lock))
    }

    /// Wrap a store directly, skipping validation and liveness checks
    ///
    /// For tests and for callers that manage the store lifecycle themselves.
    pub fn from_store<S: Into<String>>(
        store: Arc<dyn CacheStore>,
        driver: S,
        lock: OperationLock,
    ) -> Self {
        Self {
            store,
            driver: driver.into(),
            lock,
        }
    }
}

// Cache operations
impl Cache {
    /// Retrieve and decode the value stored under `key`
    ///
    /// # Errors
    ///
    /// * [`Error::NotFound`] - the key is absent or expired
    /// * [`Error::Decode`] - the stored bytes do not decode into `T`
    /// * [`Error::Backend`] - the backend failed
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let _guard = self.lock.acquire().await;

        let Some(value) = self.store.get(key).await? else {
            debug!(driver = %self.driver, key, "Cache MISS");
            return Err(Error::not_found(key));
        };

        debug!(driver = %self.driver, key, bytes = value.len(), "Cache HIT");
        serde_json::from_slice(value.as_bytes()).map_err(|source| Error::Decode {
            key: key.to_string(),
            source,
        })
    }

    /// Retrieve the value stored under `key` into an existing destination
    ///
    /// `out` is only written when the lookup and decode both succeed.
    pub async fn get_into<T: DeserializeOwned>(&self, key: &str, out: &mut T) -> Result<()> {
        *out = self.get(key).await?;
        Ok(())
    }

    /// Encode `value` and store it under `key`
    ///
    /// # Errors
    ///
    /// * [`Error::Encode`] - the value cannot be serialized; the backend is not touched
    /// * [`Error::Backend`] - the backend rejected the write
    pub async fn set<T>(&self, key: &str, value: &T, options: Options) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let _guard = self.lock.acquire().await;

        let encoded = serde_json::to_vec(value).map_err(|source| Error::Encode {
            key: key.to_string(),
            source,
        })?;

        debug!(
            driver = %self.driver,
            key,
            bytes = encoded.len(),
            tags = ?options.tags,
            "Cache SET"
        );
        self.store.set(key, encoded, &options).await
    }

    /// Remove the entry stored under `key`
    pub async fn delete(&self, key: &str) -> Result<()> {
        let _guard = self.lock.acquire().await;

        debug!(driver = %self.driver, key, "Cache DEL");
        self.store.delete(key).await
    }

    /// Remove every entry tagged with any of `options.tags`
    pub async fn invalidate(&self, options: InvalidateOptions) -> Result<()> {
        let _guard = self.lock.acquire().await;

        debug!(driver = %self.driver, tags = ?options.tags, "Cache INVALIDATE");
        self.store.invalidate(&options).await
    }

    /// Remove every entry
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.lock.acquire().await;

        debug!(driver = %self.driver, "Cache CLEAR");
        self.store.clear().await
    }

    /// Check that the backend is still reachable
    pub async fn ping(&self) -> Result<()> {
        let _guard = self.lock.acquire().await;
        self.store.ping().await
    }

    /// Driver name of the active backend
    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// The lock this cache serializes its operations behind
    pub fn lock(&self) -> &OperationLock {
        &self.lock
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("driver", &self.driver)
            .field("store", &self.store)
            .finish()
    }
}

fn as_invalid_config(driver: &str, error: Error) -> Error {
    match error {
        Error::InvalidConfig { .. } => error,
        other => Error::invalid_config(driver, other.to_string()),
    }
}

fn as_connection_error(driver: &str, error: Error) -> Error {
    match error {
        Error::Connection { .. } => error,
        other => Error::connection_with_source(driver, "liveness check failed", other),
    }
}
