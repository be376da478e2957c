//! # Stash - Application Layer
//!
//! Wires named providers to the cache facade.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Cache load flow                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  CacheConfig { driver: "redis", .. }                         │
//! │        ↓                                                     │
//! │  ProviderRegistry::resolve  → Box<dyn CacheProvider>         │
//! │        ↓                                                     │
//! │  validate() → ping() → store()                               │
//! │        ↓                                                     │
//! │  Cache { store, driver, OperationLock }                      │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use stash_application::{CacheRuntime, ProviderRegistry};
//! use stash_domain::{CacheConfig, Options};
//!
//! let runtime = CacheRuntime::new(ProviderRegistry::with_registered_providers());
//! let cache = runtime.load(&CacheConfig::memory()).await?;
//!
//! cache.set("key", &"stash", Options::new().with_tag("tag")).await?;
//! let value: String = cache.get("key").await?;
//! ```

/// Cache facade and its operation lock
pub mod cache;

/// Provider registry and link-time registration slice
pub mod registry;

/// Process-scoped registry + lock bundle
pub mod runtime;

pub use cache::{Cache, OperationLock};
pub use registry::{CACHE_PROVIDERS, CacheProviderEntry, ProviderFactory, ProviderRegistry};
pub use runtime::CacheRuntime;
