//! # Stash - Domain Layer
//!
//! Core types shared by every other crate in the workspace:
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`error`] | The single [`Error`](error::Error) enum and [`Result`](error::Result) alias |
//! | [`ports`] | [`CacheStore`](ports::CacheStore) and [`CacheProvider`](ports::CacheProvider) traits |
//! | [`value_objects`] | Configuration and per-call option types |
//! | [`constants`] | Driver names and default durations |
//!
//! This crate has no knowledge of concrete backends. Providers live in
//! `stash-providers`; the facade and registry live in `stash-application`.

/// Driver names and default values
pub mod constants;

/// Error handling types
pub mod error;

/// Port traits implemented by cache backends
pub mod ports;

/// Configuration and option value objects
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{CacheProvider, CacheStore, StoreValue};
pub use value_objects::{
    CacheConfig, Expiration, InvalidateOptions, MemcacheConfig, MemoryConfig, Options,
    RedisConfig,
};
