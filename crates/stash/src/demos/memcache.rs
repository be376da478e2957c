use stash_domain::constants::MEMCACHE_DRIVER;
use stash_domain::value_objects::CacheConfig;

const DEFAULT_HOST: &str = "127.0.0.1:11211";
const DEFAULT_EXPIRATION_SECS: u64 = 5 * 60;

/// Memcache demo settings: local server, 5 minute default expiry
pub fn memcache_config(base: &CacheConfig) -> CacheConfig {
    let mut config = base.clone();
    config.driver = MEMCACHE_DRIVER.to_string();
    if config.memcache.hosts.is_empty() {
        config.memcache.hosts = vec![DEFAULT_HOST.to_string()];
    }
    config
        .default_expiration_secs
        .get_or_insert(DEFAULT_EXPIRATION_SECS);
    config
}
