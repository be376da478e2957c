//! Demo programs
//!
//! Each demo loads one backend, stores `"stash"` under `"key"` with a one
//! hour expiry and the tag `"tag"`, then reads it back.

mod memcache;
mod memory;
mod redis;

pub use memcache::memcache_config;
pub use memory::memory_config;
pub use redis::redis_config;

use stash_application::{Cache, CacheRuntime};
use stash_domain::error::Result;
use stash_domain::value_objects::{CacheConfig, Options};
use std::fmt;
use std::time::Duration;
use tracing::info;

/// Key written by every demo
pub const DEMO_KEY: &str = "key";

/// Value written by every demo
pub const DEMO_VALUE: &str = "stash";

/// Tag attached to the demo entry
pub const DEMO_TAG: &str = "tag";

/// Expiry of the demo entry
pub const DEMO_EXPIRATION: Duration = Duration::from_secs(60 * 60);

/// Backend a demo runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    Memory,
    Redis,
    Memcache,
}

impl Demo {
    /// Cache settings for this demo
    ///
    /// The driver is always forced. Addresses and expirations already set in
    /// `base` are kept; blanks fall back to the demo defaults.
    pub fn config(self, base: &CacheConfig) -> CacheConfig {
        match self {
            Self::Memory => memory_config(base),
            Self::Redis => redis_config(base),
            Self::Memcache => memcache_config(base),
        }
    }

    /// Load the backend, write the demo entry and read it back
    pub async fn run(self, runtime: &CacheRuntime, base: &CacheConfig) -> Result<String> {
        let cache = runtime.load(&self.config(base)).await?;
        store_and_fetch(&cache).await
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
            Self::Memcache => "memcache",
        };
        f.write_str(name)
    }
}

/// Write the demo entry through `cache` and return what reads back
pub async fn store_and_fetch(cache: &Cache) -> Result<String> {
    cache
        .set(
            DEMO_KEY,
            DEMO_VALUE.as_bytes(),
            Options::new()
                .with_expiration(DEMO_EXPIRATION)
                .with_tag(DEMO_TAG),
        )
        .await?;

    let bytes: Vec<u8> = cache.get(DEMO_KEY).await?;
    let value = String::from_utf8_lossy(&bytes).into_owned();
    info!(driver = cache.driver(), key = DEMO_KEY, value = %value, "Demo entry read back");
    Ok(value)
}
