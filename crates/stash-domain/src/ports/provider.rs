//! Cache Provider Port
//!
//! A provider is a named factory for a [`CacheStore`]. It is built from
//! configuration, validated, pinged and then dropped; the store it
//! produced outlives it.
//!
//! ## Lifecycle
//!
//! ```text
//! CacheConfig ──factory──▶ Provider ──validate()──▶ ping() ──▶ store()
//!                                                              │
//!                                                              ▼
//!                                                       Arc<dyn CacheStore>
//! ```

use crate::error::Result;
use crate::ports::store::CacheStore;
use async_trait::async_trait;
use std::sync::Arc;

/// Cache Provider Port
///
/// `validate` must succeed before `ping` is attempted, and `ping` must
/// succeed before `store` is used to back a cache.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug {
    /// Driver name this provider is registered under
    fn driver(&self) -> &'static str;

    /// Check the provider's configuration without touching the network
    fn validate(&self) -> Result<()>;

    /// Perform a liveness round-trip against the backend
    async fn ping(&self) -> Result<()>;

    /// Produce the store backing a cache
    fn store(&self) -> Result<Arc<dyn CacheStore>>;
}
