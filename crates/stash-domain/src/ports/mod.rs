//! Domain Port Interfaces
//!
//! Contracts between the cache facade and the backends behind it.
//!
//! | Port | Implemented by |
//! |------|----------------|
//! | [`CacheStore`] | Memory, Redis and Memcache stores in `stash-providers` |
//! | [`CacheProvider`] | One provider per driver, registered by name |

pub mod provider;
pub mod store;

pub use provider::CacheProvider;
pub use store::{CacheStore, StoreValue};
