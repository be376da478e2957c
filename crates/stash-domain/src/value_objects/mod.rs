//! Value Objects
//!
//! Immutable configuration and per-call option types.

pub mod config;
pub mod options;

pub use config::{CacheConfig, MemcacheConfig, MemoryConfig, RedisConfig};
pub use options::{Expiration, InvalidateOptions, Options, REMEMBER_FOREVER};
