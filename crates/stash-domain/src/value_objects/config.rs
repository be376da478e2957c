//! Cache configuration
//!
//! Holds the driver name plus every backend's connection parameters.
//! Each provider reads the section it needs and ignores the rest.

use crate::constants::{
    DEFAULT_CLEANUP_INTERVAL_SECS, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DRIVER, MEMCACHE_DRIVER,
    MEMORY_DRIVER, REDIS_DRIVER,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache configuration passed to `load`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Driver name (memory, redis, memcache). Blank selects memory.
    pub driver: String,

    /// Default entry lifetime in seconds, `None` to keep entries until evicted
    pub default_expiration_secs: Option<u64>,

    /// In-process memory settings
    pub memory: MemoryConfig,

    /// Redis settings
    pub redis: RedisConfig,

    /// Memcached settings
    pub memcache: MemcacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_DRIVER.to_string(),
            default_expiration_secs: None,
            memory: MemoryConfig::default(),
            redis: RedisConfig::default(),
            memcache: MemcacheConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Create a config for the given driver with default settings
    pub fn new<S: Into<String>>(driver: S) -> Self {
        Self {
            driver: driver.into(),
            ..Default::default()
        }
    }

    /// Memory driver config
    pub fn memory() -> Self {
        Self::new(MEMORY_DRIVER)
    }

    /// Redis driver config pointing at `address` (host:port or redis:// URL)
    pub fn redis<S: Into<String>>(address: S) -> Self {
        let mut config = Self::new(REDIS_DRIVER);
        config.redis.address = address.into();
        config
    }

    /// Memcache driver config for the given hosts
    pub fn memcache<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::new(MEMCACHE_DRIVER);
        config.memcache.hosts = hosts.into_iter().map(Into::into).collect();
        config
    }

    /// Set the default expiration
    pub fn with_default_expiration(mut self, ttl: Duration) -> Self {
        self.default_expiration_secs = Some(ttl.as_secs());
        self
    }

    /// Set the memory store cleanup interval
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.memory.cleanup_interval_secs = interval.as_secs();
        self
    }

    /// Driver name with the blank-means-memory rule applied
    pub fn effective_driver(&self) -> &str {
        let driver = self.driver.trim();
        if driver.is_empty() {
            DEFAULT_DRIVER
        } else {
            driver
        }
    }

    /// Default expiration as a duration
    pub fn default_expiration(&self) -> Option<Duration> {
        self.default_expiration_secs.map(Duration::from_secs)
    }
}

/// In-process memory settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Seconds between housekeeping passes over expired entries
    pub cleanup_interval_secs: u64,

    /// Maximum number of entries, unbounded when `None`
    pub max_capacity: Option<u64>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
            max_capacity: None,
        }
    }
}

impl MemoryConfig {
    /// Cleanup interval as a duration
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

/// Redis settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Network address (`host:port`) or full `redis://` URL
    pub address: String,

    /// ACL username
    pub username: Option<String>,

    /// Password
    pub password: Option<String>,

    /// Database index
    pub db: i64,

    /// Seconds to wait for the liveness check
    pub connect_timeout_secs: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            username: None,
            password: None,
            db: 0,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl RedisConfig {
    /// Liveness check timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Memcached settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemcacheConfig {
    /// Server addresses (`host:port`)
    pub hosts: Vec<String>,

    /// Seconds to wait when connecting to a host
    pub connect_timeout_secs: u64,
}

impl Default for MemcacheConfig {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl MemcacheConfig {
    /// Parse a comma separated host list such as `"10.0.0.1:11211,10.0.0.2:11211"`
    pub fn from_host_list(hosts: &str) -> Self {
        Self {
            hosts: hosts
                .split(',')
                .map(str::trim)
                .filter(|host| !host.is_empty())
                .map(ToString::to_string)
                .collect(),
            ..Default::default()
        }
    }

    /// Connect timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
