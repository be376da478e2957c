//! Domain constants
//!
//! Driver identifiers and the defaults every backend agrees on.

use std::time::Duration;

// ============================================================================
// DRIVER NAMES
// ============================================================================

/// In-process memory driver
pub const MEMORY_DRIVER: &str = "memory";

/// Redis driver
pub const REDIS_DRIVER: &str = "redis";

/// Memcached driver
pub const MEMCACHE_DRIVER: &str = "memcache";

/// Driver used when the configuration leaves the driver blank
pub const DEFAULT_DRIVER: &str = MEMORY_DRIVER;

// ============================================================================
// EXPIRATION
// ============================================================================

/// Default interval between memory store housekeeping passes (5 minutes)
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;

/// Default connection timeout for distributed backends
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Lifetime of a tag index entry in distributed stores (30 days)
pub const TAG_INDEX_TTL: Duration = Duration::from_secs(720 * 60 * 60);

/// Key prefix under which tag membership is recorded
pub const TAG_KEY_PREFIX: &str = "stash_tag:";

/// Build the key that records the members of `tag`
pub fn tag_key(tag: &str) -> String {
    format!("{TAG_KEY_PREFIX}{tag}")
}

/// Key prefix under which the tags of a single key are recorded
pub const KEY_TAGS_PREFIX: &str = "stash_key_tags:";

/// Build the key that records the tags `key` was written with
pub fn key_tags_key(key: &str) -> String {
    format!("{KEY_TAGS_PREFIX}{key}")
}
