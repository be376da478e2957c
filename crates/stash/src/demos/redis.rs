use stash_domain::constants::REDIS_DRIVER;
use stash_domain::value_objects::CacheConfig;

const DEFAULT_ADDRESS: &str = "127.0.0.1:6379";
const DEFAULT_EXPIRATION_SECS: u64 = 8 * 60 * 60;

/// Redis demo settings: local server, 8 hour default expiry
pub fn redis_config(base: &CacheConfig) -> CacheConfig {
    let mut config = base.clone();
    config.driver = REDIS_DRIVER.to_string();
    if config.redis.address.trim().is_empty() {
        config.redis.address = DEFAULT_ADDRESS.to_string();
    }
    config
        .default_expiration_secs
        .get_or_insert(DEFAULT_EXPIRATION_SECS);
    config
}
