//! Redis distributed cache provider
//!
//! Suitable for multi-instance deployments.
//!
//! ## Features
//!
//! - Lazily established `ConnectionManager` with automatic reconnection
//! - Per-entry expiry via `SET .. PX`
//! - Tags kept as Redis sets under `stash_tag:<tag>`, with each key's own
//!   tags under `stash_key_tags:<key>` so stale memberships can be removed
//!
//! ## Example
//!
//! ```ignore
//! use stash_domain::CacheConfig;
//! use stash_providers::cache::RedisCacheProvider;
//!
//! let provider = RedisCacheProvider::from_config(&CacheConfig::redis("127.0.0.1:6379"));
//! provider.validate()?;
//! provider.ping().await?;
//! ```

use crate::constants::REDIS_URL_SCHEME;
use async_trait::async_trait;
use redis::Client;
use redis::aio::ConnectionManager;
use stash_domain::constants::{REDIS_DRIVER, TAG_INDEX_TTL, key_tags_key, tag_key};
use stash_domain::error::{Error, Result};
use stash_domain::ports::{CacheProvider, CacheStore, StoreValue};
use stash_domain::value_objects::{CacheConfig, InvalidateOptions, Options, RedisConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

/// Redis-backed cache store
///
/// The connection is opened on first use and shared by every operation.
pub struct RedisStore {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    default_expiration: Option<Duration>,
}

impl RedisStore {
    /// Create a store around an already parsed client
    pub fn new(client: Client, default_expiration: Option<Duration>) -> Self {
        Self {
            client,
            connection: OnceCell::new(),
            default_expiration,
        }
    }

    async fn connection(&self, operation: &'static str) -> Result<ConnectionManager> {
        self.connection
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await
            .cloned()
            .map_err(|e| Error::backend_with_source(operation, "Redis connection failed", e))
    }

    /// Tags `key` was last written with
    async fn tags_of(
        conn: &mut ConnectionManager,
        operation: &'static str,
        key: &str,
    ) -> Result<Vec<String>> {
        redis::cmd("SMEMBERS")
            .arg(key_tags_key(key))
            .query_async(conn)
            .await
            .map_err(|e| Error::backend_for_key(operation, key, "Redis SMEMBERS failed", e))
    }
}

/// Queue removal of `key` from each of `tags` and drop its own tag record
fn untag_commands(pipe: &mut redis::Pipeline, key: &str, tags: &[String]) {
    for tag in tags {
        pipe.cmd("SREM").arg(tag_key(tag)).arg(key).ignore();
    }
    pipe.cmd("DEL").arg(key_tags_key(key)).ignore();
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<StoreValue>> {
        let mut conn = self.connection("get").await?;

        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::backend_for_key("get", key, "Redis GET failed", e))?;

        Ok(value.map(StoreValue::Bytes))
    }

    async fn set(&self, key: &str, value: Vec<u8>, options: &Options) -> Result<()> {
        let mut conn = self.connection("set").await?;
        let ttl = options.expiration.resolve(self.default_expiration);
        let previous_tags = Self::tags_of(&mut conn, "set", key).await?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        untag_commands(&mut pipe, key, &previous_tags);
        match ttl {
            Some(ttl) => {
                pipe.cmd("SET").arg(key).arg(value).arg("PX").arg(ttl_millis(ttl));
            }
            None => {
                pipe.cmd("SET").arg(key).arg(value);
            }
        }
        pipe.ignore();

        if !options.tags.is_empty() {
            let own_tags = key_tags_key(key);
            for tag in &options.tags {
                let tag_key = tag_key(tag);
                pipe.cmd("SADD").arg(&tag_key).arg(key).ignore();
                pipe.cmd("EXPIRE")
                    .arg(&tag_key)
                    .arg(TAG_INDEX_TTL.as_secs())
                    .ignore();
            }
            pipe.cmd("SADD").arg(&own_tags).arg(&options.tags).ignore();
            pipe.cmd("EXPIRE")
                .arg(&own_tags)
                .arg(TAG_INDEX_TTL.as_secs())
                .ignore();
        }

        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| Error::backend_for_key("set", key, "Redis SET failed", e))?;

        debug!(key, ttl_ms = ttl.map(ttl_millis), "Redis SET");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection("delete").await?;
        let tags = Self::tags_of(&mut conn, "delete", key).await?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe.cmd("DEL").arg(key).ignore();
        untag_commands(&mut pipe, key, &tags);

        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| Error::backend_for_key("delete", key, "Redis DEL failed", e))
    }

    async fn invalidate(&self, options: &InvalidateOptions) -> Result<()> {
        let mut conn = self.connection("invalidate").await?;

        for tag in &options.tags {
            let tag_key = tag_key(tag);
            let keys: Vec<String> = redis::cmd("SMEMBERS")
                .arg(&tag_key)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    Error::backend_with_source("invalidate", "Redis SMEMBERS failed", e)
                })?;

            let mut pipe = redis::pipe();
            pipe.atomic();
            for key in &keys {
                let tags = Self::tags_of(&mut conn, "invalidate", key).await?;
                pipe.cmd("DEL").arg(key).ignore();
                untag_commands(&mut pipe, key, &tags);
            }
            pipe.cmd("DEL").arg(&tag_key).ignore();

            pipe.query_async::<()>(&mut conn)
                .await
                .map_err(|e| Error::backend_with_source("invalidate", "Redis DEL failed", e))?;

            debug!(tag = %tag, keys = keys.len(), "Redis tag invalidated");
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.connection("clear").await?;

        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| Error::backend_with_source("clear", "Redis FLUSHDB failed", e))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection("ping").await?;

        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| Error::backend_with_source("ping", "Redis PING failed", e))
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("connected", &self.connection.initialized())
            .field("default_expiration", &self.default_expiration)
            .finish()
    }
}

/// Provider for the `redis` driver
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    config: RedisConfig,
    default_expiration: Option<Duration>,
}

impl RedisCacheProvider {
    /// Build the provider from configuration; nothing is contacted yet
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            config: config.redis.clone(),
            default_expiration: config.default_expiration(),
        }
    }

    /// Connection URL assembled from address, credentials and database
    pub fn connection_url(&self) -> String {
        connection_url(&self.config)
    }

    fn client(&self) -> Result<Client> {
        Client::open(self.connection_url()).map_err(|e| {
            Error::invalid_config(REDIS_DRIVER, format!("invalid redis address: {e}"))
        })
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    fn driver(&self) -> &'static str {
        REDIS_DRIVER
    }

    fn validate(&self) -> Result<()> {
        if self.config.address.trim().is_empty() {
            return Err(Error::invalid_config(
                REDIS_DRIVER,
                "no redis address defined",
            ));
        }
        self.client().map(|_| ())
    }

    async fn ping(&self) -> Result<()> {
        let client = self.client()?;
        let timeout = self.config.connect_timeout();

        let reply = tokio::time::timeout(timeout, async {
            let mut conn = client.get_multiplexed_async_connection().await?;
            redis::cmd("PING").query_async::<()>(&mut conn).await
        })
        .await;

        match reply {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::connection_with_source(
                REDIS_DRIVER,
                format!("PING to {} failed", redact_url(&self.connection_url())),
                e,
            )),
            Err(elapsed) => Err(Error::connection_with_source(
                REDIS_DRIVER,
                format!("PING timed out after {}s", timeout.as_secs()),
                elapsed,
            )),
        }
    }

    fn store(&self) -> Result<Arc<dyn CacheStore>> {
        let store = RedisStore::new(self.client()?, self.default_expiration);
        debug!(url = %redact_url(&self.connection_url()), "Redis cache store created");
        Ok(Arc::new(store))
    }
}

fn connection_url(config: &RedisConfig) -> String {
    let address = config.address.trim();
    if address.contains("://") {
        return address.to_string();
    }

    let credentials = match (&config.username, &config.password) {
        (Some(user), Some(password)) => format!("{user}:{password}@"),
        (None, Some(password)) => format!(":{password}@"),
        (Some(user), None) => format!("{user}@"),
        (None, None) => String::new(),
    };

    format!("{REDIS_URL_SCHEME}{credentials}{address}/{}", config.db)
}

fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

/// Redact the password from a Redis URL for logging
fn redact_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@')
        && let Some(colon_pos) = url[..at_pos].rfind(':')
        && colon_pos > url.find("://").map_or(0, |i| i + 2)
    {
        return format!("{}***{}", &url[..=colon_pos], &url[at_pos..]);
    }
    url.to_string()
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use stash_application::registry::{CACHE_PROVIDERS, CacheProviderEntry};

fn redis_cache_factory(config: &CacheConfig) -> Box<dyn CacheProvider> {
    Box::new(RedisCacheProvider::from_config(config))
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static REDIS_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: REDIS_DRIVER,
    description: "Redis distributed cache",
    factory: redis_cache_factory,
};
