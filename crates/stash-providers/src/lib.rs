//! # Stash - Cache Backends
//!
//! Concrete [`CacheProvider`]/[`CacheStore`] implementations. Each one
//! registers itself into `stash_application::CACHE_PROVIDERS` at link time,
//! so depending on this crate is enough to make its drivers resolvable.
//!
//! | Driver | Provider | Backend |
//! |--------|----------|---------|
//! | `memory` | [`cache::MemoryCacheProvider`] | moka, in-process |
//! | `redis` | [`cache::RedisCacheProvider`] | Redis via `ConnectionManager` |
//! | `memcache` | [`cache::MemcacheCacheProvider`] | Memcached via async-memcached |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! stash-providers = { version = "0.1", default-features = false, features = ["cache-memory"] }
//! ```

pub use stash_domain::error::{Error, Result};
pub use stash_domain::ports::{CacheProvider, CacheStore};

/// Provider-specific constants
pub mod constants;

/// Cache provider implementations
pub mod cache;
