//! Provider constants

// ============================================================================
// REDIS
// ============================================================================

/// URL scheme prepended to bare `host:port` Redis addresses
pub const REDIS_URL_SCHEME: &str = "redis://";

// ============================================================================
// MEMCACHE
// ============================================================================

/// URL scheme prepended to bare `host:port` Memcached addresses
pub const MEMCACHE_URL_SCHEME: &str = "tcp://";

/// Longest relative expiry Memcached accepts; larger values are read as a Unix timestamp
pub const MEMCACHE_MAX_RELATIVE_TTL_SECS: u64 = 60 * 60 * 24 * 30;
