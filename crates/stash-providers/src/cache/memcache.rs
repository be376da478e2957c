//! Memcached distributed cache provider
//!
//! Keys are spread across the configured hosts by hash. Each host gets one
//! client, connected on first use and reconnected after a failed call.
//!
//! Memcached has no native tagging, so a tag's members are stored as a JSON
//! list of keys under `stash_tag:<tag>`, and the tags of each key under
//! `stash_key_tags:<key>`. Index writes precede value writes, so a failed
//! `set` can leave a key listed under a tag but never a live value that no
//! tag knows about.

use crate::constants::{MEMCACHE_MAX_RELATIVE_TTL_SECS, MEMCACHE_URL_SCHEME};
use async_memcached::{AsciiProtocol, Client};
use async_trait::async_trait;
use stash_domain::constants::{MEMCACHE_DRIVER, TAG_INDEX_TTL, key_tags_key, tag_key};
use stash_domain::error::{Error, Result};
use stash_domain::ports::{CacheProvider, CacheStore, StoreValue};
use stash_domain::value_objects::{CacheConfig, InvalidateOptions, MemcacheConfig, Options};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::debug;

/// One Memcached server and its lazily opened client
struct MemcacheHost {
    address: String,
    connect_timeout: Duration,
    client: Mutex<Option<Client>>,
}

impl MemcacheHost {
    fn new(address: &str, connect_timeout: Duration) -> Self {
        Self {
            address: address.to_string(),
            connect_timeout,
            client: Mutex::new(None),
        }
    }

    /// Borrow the client, connecting first if needed
    async fn client(&self, operation: &'static str) -> Result<MappedMutexGuard<'_, Client>> {
        let mut slot = self.client.lock().await;
        if slot.is_none() {
            let client = connect(&self.address, self.connect_timeout)
                .await
                .map_err(|message| Error::backend(operation, message))?;
            *slot = Some(client);
        }

        MutexGuard::try_map(slot, Option::as_mut)
            .map_err(|_| Error::backend(operation, "memcache client unavailable"))
    }

    /// Drop the client so the next call reconnects
    async fn reset(&self) {
        self.client.lock().await.take();
    }
}

async fn connect(address: &str, timeout: Duration) -> std::result::Result<Client, String> {
    let dsn = dsn(address);
    match tokio::time::timeout(timeout, Client::new(dsn.as_str())).await {
        Ok(Ok(client)) => {
            debug!(host = address, "Memcached connected");
            Ok(client)
        }
        Ok(Err(e)) => Err(format!("cannot connect to memcached at {address}: {e}")),
        Err(_) => Err(format!(
            "connecting to memcached at {address} timed out after {}s",
            timeout.as_secs()
        )),
    }
}

fn dsn(address: &str) -> String {
    if address.contains("://") {
        address.to_string()
    } else {
        format!("{MEMCACHE_URL_SCHEME}{address}")
    }
}

/// Memcached expiry argument for a relative TTL
///
/// TTLs beyond thirty days are sent as an absolute Unix timestamp; no TTL is 0.
fn expiry_arg(ttl: Option<Duration>) -> i64 {
    let Some(ttl) = ttl else {
        return 0;
    };

    let secs = ttl.as_secs().max(1);
    let secs = if secs > MEMCACHE_MAX_RELATIVE_TTL_SECS {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(secs, |now| now.as_secs().saturating_add(secs))
    } else {
        secs
    };
    i64::try_from(secs).unwrap_or(i64::MAX)
}

/// Attach `key` to a backend error raised before the key was known
fn for_key(error: Error, key: &str) -> Error {
    match error {
        Error::Backend {
            operation,
            key: None,
            message,
            source,
        } => Error::Backend {
            operation,
            key: Some(key.to_string()),
            message,
            source,
        },
        other => other,
    }
}

/// Decode a stored JSON key or tag list
fn decode_list(operation: &'static str, index_key: &str, raw: &[u8]) -> Result<Vec<String>> {
    serde_json::from_slice(raw).map_err(|e| Error::Backend {
        operation,
        key: Some(index_key.to_string()),
        message: "corrupt tag index".to_string(),
        source: Some(Box::new(e)),
    })
}

/// Memcached-backed cache store
pub struct MemcacheStore {
    hosts: Vec<MemcacheHost>,
    default_expiration: Option<Duration>,
}

impl MemcacheStore {
    /// Create a store over `hosts`; nothing is contacted until first use
    pub fn new(
        hosts: &[String],
        connect_timeout: Duration,
        default_expiration: Option<Duration>,
    ) -> Self {
        Self {
            hosts: hosts
                .iter()
                .map(|address| MemcacheHost::new(address, connect_timeout))
                .collect(),
            default_expiration,
        }
    }

    /// Address of the host `key` is routed to
    pub fn host_for(&self, key: &str) -> Option<&str> {
        self.route(key).map(|host| host.address.as_str())
    }

    fn route(&self, key: &str) -> Option<&MemcacheHost> {
        if self.hosts.is_empty() {
            return None;
        }
        let len = self.hosts.len() as u64;
        let index = usize::try_from(seahash::hash(key.as_bytes()) % len).unwrap_or(0);
        self.hosts.get(index)
    }

    fn host(&self, operation: &'static str, key: &str) -> Result<&MemcacheHost> {
        self.route(key)
            .ok_or_else(|| Error::backend(operation, "no memcache hosts configured"))
    }

    async fn read(&self, operation: &'static str, key: &str) -> Result<Option<Vec<u8>>> {
        let host = self.host(operation, key)?;
        let result = host
            .client(operation)
            .await
            .map_err(|e| for_key(e, key))?
            .get(key)
            .await;

        match result {
            Ok(value) => Ok(value.and_then(|value| value.data)),
            Err(e) => {
                host.reset().await;
                Err(Error::Backend {
                    operation,
                    key: Some(key.to_string()),
                    message: format!("Memcached GET failed: {e}"),
                    source: None,
                })
            }
        }
    }

    async fn write(
        &self,
        operation: &'static str,
        key: &str,
        value: &[u8],
        expiry: i64,
    ) -> Result<()> {
        let host = self.host(operation, key)?;
        let result = host
            .client(operation)
            .await
            .map_err(|e| for_key(e, key))?
            .set(key, value, Some(expiry), None)
            .await;

        if let Err(e) = result {
            host.reset().await;
            return Err(Error::Backend {
                operation,
                key: Some(key.to_string()),
                message: format!("Memcached SET failed: {e}"),
                source: None,
            });
        }
        Ok(())
    }

    async fn remove(&self, operation: &'static str, key: &str) -> Result<()> {
        // Deleting a missing key is an error in memcached
        if self.read(operation, key).await?.is_none() {
            return Ok(());
        }

        let host = self.host(operation, key)?;
        let result = host
            .client(operation)
            .await
            .map_err(|e| for_key(e, key))?
            .delete(key)
            .await;

        if let Err(e) = result {
            host.reset().await;
            return Err(Error::Backend {
                operation,
                key: Some(key.to_string()),
                message: format!("Memcached DELETE failed: {e}"),
                source: None,
            });
        }
        Ok(())
    }

    /// Read a JSON key or tag list; a missing list is empty
    async fn read_list(&self, operation: &'static str, index_key: &str) -> Result<Vec<String>> {
        match self.read(operation, index_key).await? {
            Some(raw) => decode_list(operation, index_key, &raw),
            None => Ok(Vec::new()),
        }
    }

    /// Write a JSON key or tag list, removing it once empty
    async fn write_list(
        &self,
        operation: &'static str,
        index_key: &str,
        members: &[String],
    ) -> Result<()> {
        if members.is_empty() {
            return self.remove(operation, index_key).await;
        }

        let encoded = serde_json::to_vec(members).map_err(|e| Error::Backend {
            operation,
            key: Some(index_key.to_string()),
            message: "cannot encode tag index".to_string(),
            source: Some(Box::new(e)),
        })?;
        self.write(operation, index_key, &encoded, expiry_arg(Some(TAG_INDEX_TTL)))
            .await
    }

    async fn add_member(&self, operation: &'static str, tag: &str, key: &str) -> Result<()> {
        let index_key = tag_key(tag);
        let mut members = self.read_list(operation, &index_key).await?;
        if members.iter().any(|member| member == key) {
            return Ok(());
        }
        members.push(key.to_string());
        self.write_list(operation, &index_key, &members).await
    }

    async fn remove_member(&self, operation: &'static str, tag: &str, key: &str) -> Result<()> {
        let index_key = tag_key(tag);
        let mut members = self.read_list(operation, &index_key).await?;
        let before = members.len();
        members.retain(|member| member != key);
        if members.len() == before {
            return Ok(());
        }
        self.write_list(operation, &index_key, &members).await
    }

    /// Point the tag index at `tags` for `key`, dropping tags it no longer has
    async fn retag(&self, operation: &'static str, key: &str, tags: &[String]) -> Result<()> {
        let own_tags = key_tags_key(key);
        let previous = self.read_list(operation, &own_tags).await?;

        for tag in previous.iter().filter(|tag| !tags.contains(tag)) {
            self.remove_member(operation, tag, key).await?;
        }
        for tag in tags {
            self.add_member(operation, tag, key).await?;
        }
        self.write_list(operation, &own_tags, tags).await
    }
}

#[async_trait]
impl CacheStore for MemcacheStore {
    async fn get(&self, key: &str) -> Result<Option<StoreValue>> {
        Ok(self.read("get", key).await?.map(StoreValue::Bytes))
    }

    async fn set(&self, key: &str, value: Vec<u8>, options: &Options) -> Result<()> {
        let ttl = options.expiration.resolve(self.default_expiration);
        self.retag("set", key, &options.tags).await?;
        self.write("set", key, &value, expiry_arg(ttl)).await?;

        debug!(key, host = self.host_for(key), "Memcached SET");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.remove("delete", key).await?;
        self.retag("delete", key, &[]).await
    }

    async fn invalidate(&self, options: &InvalidateOptions) -> Result<()> {
        for tag in &options.tags {
            let tag_key = tag_key(tag);
            let members = self.read_list("invalidate", &tag_key).await?;
            self.remove("invalidate", &tag_key).await?;
            for key in &members {
                self.remove("invalidate", key).await?;
                self.retag("invalidate", key, &[]).await?;
            }

            debug!(tag = %tag, keys = members.len(), "Memcached tag invalidated");
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        for host in &self.hosts {
            let result = host.client("clear").await?.flush_all().await;
            if let Err(e) = result {
                host.reset().await;
                return Err(Error::backend(
                    "clear",
                    format!("Memcached FLUSH_ALL on {} failed: {e}", host.address),
                ));
            }
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut failures = Vec::new();
        for host in &self.hosts {
            let result = match host.client("ping").await {
                Ok(mut client) => client.version().await.map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            match result {
                Ok(_) => return Ok(()),
                Err(message) => {
                    host.reset().await;
                    failures.push(message);
                }
            }
        }
        Err(Error::backend("ping", failures.join("; ")))
    }
}

impl std::fmt::Debug for MemcacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemcacheStore")
            .field(
                "hosts",
                &self.hosts.iter().map(|h| h.address.as_str()).collect::<Vec<_>>(),
            )
            .field("default_expiration", &self.default_expiration)
            .finish()
    }
}

/// Provider for the `memcache` driver
#[derive(Debug, Clone)]
pub struct MemcacheCacheProvider {
    config: MemcacheConfig,
    default_expiration: Option<Duration>,
}

impl MemcacheCacheProvider {
    /// Build the provider from configuration; nothing is contacted yet
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            config: config.memcache.clone(),
            default_expiration: config.default_expiration(),
        }
    }
}

#[async_trait]
impl CacheProvider for MemcacheCacheProvider {
    fn driver(&self) -> &'static str {
        MEMCACHE_DRIVER
    }

    fn validate(&self) -> Result<()> {
        if self.config.hosts.is_empty() {
            return Err(Error::invalid_config(
                MEMCACHE_DRIVER,
                "no memcache hosts defined",
            ));
        }
        if let Some(index) = self.config.hosts.iter().position(|h| h.trim().is_empty()) {
            return Err(Error::invalid_config(
                MEMCACHE_DRIVER,
                format!("memcache host #{index} is blank"),
            ));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let timeout = self.config.connect_timeout();
        let mut failures = Vec::new();

        for host in &self.config.hosts {
            let reply = match connect(host, timeout).await {
                Ok(mut client) => client.version().await.map_err(|e| e.to_string()),
                Err(message) => Err(message),
            };
            match reply {
                Ok(version) => {
                    debug!(host = %host, version = %version, "Memcached answered");
                    return Ok(());
                }
                Err(message) => failures.push(message),
            }
        }

        Err(Error::connection(MEMCACHE_DRIVER, failures.join("; ")))
    }

    fn store(&self) -> Result<Arc<dyn CacheStore>> {
        Ok(Arc::new(MemcacheStore::new(
            &self.config.hosts,
            self.config.connect_timeout(),
            self.default_expiration,
        )))
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use stash_application::registry::{CACHE_PROVIDERS, CacheProviderEntry};

fn memcache_cache_factory(config: &CacheConfig) -> Box<dyn CacheProvider> {
    Box::new(MemcacheCacheProvider::from_config(config))
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static MEMCACHE_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: MEMCACHE_DRIVER,
    description: "Memcached distributed cache",
    factory: memcache_cache_factory,
};
