use stash_domain::constants::MEMORY_DRIVER;
use stash_domain::value_objects::CacheConfig;

const DEFAULT_EXPIRATION_SECS: u64 = 5 * 60;
const CLEANUP_INTERVAL_SECS: u64 = 10 * 60;

/// Memory demo settings: 5 minute default expiry, 10 minute sweep
pub fn memory_config(base: &CacheConfig) -> CacheConfig {
    let mut config = base.clone();
    config.driver = MEMORY_DRIVER.to_string();
    config
        .default_expiration_secs
        .get_or_insert(DEFAULT_EXPIRATION_SECS);
    config.memory.cleanup_interval_secs = CLEANUP_INTERVAL_SECS;
    config
}
