//! Tests for the Redis provider that need no server

use stash_application::{CacheRuntime, ProviderRegistry};
use stash_domain::error::Error;
use stash_domain::ports::CacheProvider;
use stash_domain::value_objects::CacheConfig;
use stash_providers::cache::RedisCacheProvider;

/// A local port nothing listens on
const REFUSED_ADDRESS: &str = "127.0.0.1:1";

fn refused_config() -> CacheConfig {
    let mut config = CacheConfig::redis(REFUSED_ADDRESS);
    config.redis.connect_timeout_secs = 1;
    config
}

#[test]
fn test_empty_address_fails_validation() {
    let provider = RedisCacheProvider::from_config(&CacheConfig::redis(""));

    match provider.validate() {
        Err(Error::InvalidConfig { driver, message }) => {
            assert_eq!(driver, "redis");
            assert!(message.contains("no redis address"));
        }
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn test_malformed_url_fails_validation() {
    let provider = RedisCacheProvider::from_config(&CacheConfig::redis("ftp://cache:6379"));

    assert!(matches!(
        provider.validate(),
        Err(Error::InvalidConfig { .. })
    ));
}

#[test]
fn test_valid_address_passes_validation() {
    let provider = RedisCacheProvider::from_config(&CacheConfig::redis("127.0.0.1:6379"));

    assert!(provider.validate().is_ok());
    assert_eq!(provider.connection_url(), "redis://127.0.0.1:6379/0");
}

#[tokio::test]
async fn test_ping_unreachable_is_connection_error() {
    let provider = RedisCacheProvider::from_config(&refused_config());

    let err = provider.ping().await.unwrap_err();
    assert!(matches!(err, Error::Connection { .. }));
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_load_unreachable_returns_no_cache() {
    let mut registry = ProviderRegistry::new();
    registry.register("redis", "Redis distributed cache", |config| {
        Box::new(RedisCacheProvider::from_config(config))
    });

    let err = CacheRuntime::new(registry)
        .load(&refused_config())
        .await
        .unwrap_err();

    assert!(err.is_load_error());
    assert!(matches!(err, Error::Connection { .. }));
}

#[tokio::test]
async fn test_load_without_address_never_pings() {
    let mut registry = ProviderRegistry::new();
    registry.register("redis", "Redis distributed cache", |config| {
        Box::new(RedisCacheProvider::from_config(config))
    });

    let err = CacheRuntime::new(registry)
        .load(&CacheConfig::new("redis"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidConfig { .. }));
}
