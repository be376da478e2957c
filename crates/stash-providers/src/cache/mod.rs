//! Cache Provider Implementations
//!
//! ## Available Providers
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`MemoryCacheProvider`] | Local | moka cache with per-entry expiry and a tag index |
//! | [`RedisCacheProvider`] | Distributed | Redis, tags kept as sets |
//! | [`MemcacheCacheProvider`] | Distributed | Memcached, keys sharded across hosts |
//!
//! ## Provider Selection Guide
//!
//! - **Development/Testing**: `memory`, nothing to run
//! - **Single Instance**: `memory`
//! - **Multi Instance**: `redis` or `memcache`

#[cfg(feature = "cache-memcache")]
pub mod memcache;
#[cfg(feature = "cache-memory")]
pub mod memory;
#[cfg(feature = "cache-redis")]
pub mod redis;

#[cfg(feature = "cache-memcache")]
pub use memcache::{MemcacheCacheProvider, MemcacheStore};
#[cfg(feature = "cache-memory")]
pub use memory::{MemoryCacheProvider, MemoryStore};
#[cfg(feature = "cache-redis")]
pub use redis::{RedisCacheProvider, RedisStore};
