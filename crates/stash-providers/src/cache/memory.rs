//! In-process memory cache provider
//!
//! moka-backed store for single-instance deployments.
//!
//! ## Features
//!
//! - Per-entry expiry through a moka [`Expiry`] policy
//! - Optional entry count bound
//! - Two-way tag index held in [`DashMap`]s, pruned as entries leave the cache
//! - Expired entries are swept at most once per cleanup interval
//!
//! ## Example
//!
//! ```ignore
//! use stash_domain::CacheConfig;
//! use stash_providers::cache::MemoryCacheProvider;
//! use std::time::Duration;
//!
//! let config = CacheConfig::memory().with_default_expiration(Duration::from_secs(300));
//! let provider = MemoryCacheProvider::from_config(&config);
//! ```

use async_trait::async_trait;
use dashmap::DashMap;
use moka::Expiry;
use moka::future::Cache;
use moka::notification::RemovalCause;
use stash_domain::constants::MEMORY_DRIVER;
use stash_domain::error::Result;
use stash_domain::ports::{CacheProvider, CacheStore, StoreValue};
use stash_domain::value_objects::{CacheConfig, InvalidateOptions, Options};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug)]
struct MemoryEntry {
    value: Vec<u8>,
    ttl: Option<Duration>,
    generation: u64,
}

/// Expire each entry after the TTL it was written with
struct EntryExpiry;

impl Expiry<String, Arc<MemoryEntry>> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Arc<MemoryEntry>,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Arc<MemoryEntry>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl
    }
}

/// Tags a key was written with, stamped with the write that tagged it
#[derive(Debug)]
struct KeyTags {
    generation: u64,
    tags: Vec<String>,
}

/// Two-way tag bookkeeping
///
/// Only keys that are live in the cache appear here. A key leaves the index
/// when it is deleted, rewritten, invalidated, expired or evicted.
#[derive(Debug, Default)]
struct TagIndex {
    by_tag: DashMap<String, HashSet<String>>,
    by_key: DashMap<String, KeyTags>,
}

impl TagIndex {
    /// Replace whatever tags `key` had with `tags`
    fn retag(&self, key: &str, generation: u64, tags: &[String]) {
        self.untag(key);
        if tags.is_empty() {
            return;
        }

        for tag in tags {
            self.by_tag
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
        self.by_key.insert(
            key.to_string(),
            KeyTags {
                generation,
                tags: tags.to_vec(),
            },
        );
    }

    fn untag(&self, key: &str) {
        if let Some((_, entry)) = self.by_key.remove(key) {
            self.forget(key, &entry.tags);
        }
    }

    /// Untag `key` only if its tags still belong to the write `generation`
    fn untag_generation(&self, key: &str, generation: u64) {
        if let Some((_, entry)) = self
            .by_key
            .remove_if(key, |_, entry| entry.generation == generation)
        {
            self.forget(key, &entry.tags);
        }
    }

    fn forget(&self, key: &str, tags: &[String]) {
        for tag in tags {
            if let Some(mut keys) = self.by_tag.get_mut(tag) {
                keys.remove(key);
            }
            self.by_tag.remove_if(tag, |_, keys| keys.is_empty());
        }
    }

    /// Remove `tag` and untag each of its keys everywhere
    fn take(&self, tag: &str) -> HashSet<String> {
        let Some((_, keys)) = self.by_tag.remove(tag) else {
            return HashSet::new();
        };
        for key in &keys {
            self.untag(key);
        }
        keys
    }

    fn members(&self, tag: &str) -> usize {
        self.by_tag.get(tag).map_or(0, |keys| keys.len())
    }

    fn clear(&self) {
        self.by_tag.clear();
        self.by_key.clear();
    }
}

/// In-process cache store
pub struct MemoryStore {
    cache: Cache<String, Arc<MemoryEntry>>,
    tags: Arc<TagIndex>,
    next_generation: AtomicU64,
    default_expiration: Option<Duration>,
    cleanup_interval: Duration,
    last_cleanup: Mutex<Instant>,
}

impl MemoryStore {
    /// Create a store
    ///
    /// A zero `cleanup_interval` disables the periodic sweep; expired
    /// entries are still never returned.
    pub fn new(
        default_expiration: Option<Duration>,
        cleanup_interval: Duration,
        max_capacity: Option<u64>,
    ) -> Self {
        let tags = Arc::new(TagIndex::default());

        let index = Arc::clone(&tags);
        let mut builder = Cache::builder().expire_after(EntryExpiry).eviction_listener(
            move |key: Arc<String>, entry: Arc<MemoryEntry>, cause: RemovalCause| {
                // Replacements are retagged by the write that caused them
                if !matches!(cause, RemovalCause::Replaced) {
                    index.untag_generation(&key, entry.generation);
                }
            },
        );
        if let Some(capacity) = max_capacity {
            builder = builder.max_capacity(capacity);
        }

        debug!(
            default_expiration_secs = default_expiration.map(|ttl| ttl.as_secs()),
            cleanup_interval_secs = cleanup_interval.as_secs(),
            max_capacity,
            "Memory cache store created"
        );

        Self {
            cache: builder.build(),
            tags,
            next_generation: AtomicU64::new(0),
            default_expiration,
            cleanup_interval,
            last_cleanup: Mutex::new(Instant::now()),
        }
    }

    /// Number of live entries after pending maintenance has run
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    /// Number of live keys carrying `tag` after pending maintenance has run
    pub async fn tagged_count(&self, tag: &str) -> usize {
        self.cache.run_pending_tasks().await;
        self.tags.members(tag)
    }

    async fn sweep_if_due(&self) {
        if self.cleanup_interval.is_zero() {
            return;
        }

        let due = match self.last_cleanup.lock() {
            Ok(mut last) if last.elapsed() >= self.cleanup_interval => {
                *last = Instant::now();
                true
            }
            _ => false,
        };

        if due {
            self.cache.run_pending_tasks().await;
            debug!("Memory cache housekeeping ran");
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<StoreValue>> {
        Ok(self
            .cache
            .get(key)
            .await
            .map(|entry| StoreValue::Bytes(entry.value.clone())))
    }

    async fn set(&self, key: &str, value: Vec<u8>, options: &Options) -> Result<()> {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let entry = MemoryEntry {
            value,
            ttl: options.expiration.resolve(self.default_expiration),
            generation,
        };

        self.tags.retag(key, generation, &options.tags);
        self.cache.insert(key.to_string(), Arc::new(entry)).await;

        self.sweep_if_due().await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.cache.invalidate(key).await;
        self.tags.untag(key);
        Ok(())
    }

    async fn invalidate(&self, options: &InvalidateOptions) -> Result<()> {
        for tag in &options.tags {
            let keys = self.tags.take(tag);
            for key in &keys {
                self.cache.invalidate(key).await;
            }
            debug!(tag = %tag, keys = keys.len(), "Memory tag invalidated");
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        self.tags.clear();
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.cache.entry_count())
            .field("tags", &self.tags.by_tag.len())
            .field("default_expiration", &self.default_expiration)
            .field("cleanup_interval", &self.cleanup_interval)
            .finish()
    }
}

/// Provider for the `memory` driver
///
/// Configuration is always valid and the backend is always reachable.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    store: Arc<MemoryStore>,
}

impl MemoryCacheProvider {
    /// Build the provider and its store from configuration
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            store: Arc::new(MemoryStore::new(
                config.default_expiration(),
                config.memory.cleanup_interval(),
                config.memory.max_capacity,
            )),
        }
    }
}

impl Default for MemoryCacheProvider {
    fn default() -> Self {
        Self::from_config(&CacheConfig::memory())
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    fn driver(&self) -> &'static str {
        MEMORY_DRIVER
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn store(&self) -> Result<Arc<dyn CacheStore>> {
        let store: Arc<dyn CacheStore> = self.store.clone();
        Ok(store)
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use stash_application::registry::{CACHE_PROVIDERS, CacheProviderEntry};

fn memory_cache_factory(config: &CacheConfig) -> Box<dyn CacheProvider> {
    Box::new(MemoryCacheProvider::from_config(config))
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static MEMORY_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: MEMORY_DRIVER,
    description: "In-process memory cache (moka)",
    factory: memory_cache_factory,
};
