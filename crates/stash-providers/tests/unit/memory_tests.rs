//! Tests for the in-process memory provider

use stash_application::{Cache, OperationLock};
use stash_domain::error::Error;
use stash_domain::ports::{CacheProvider, CacheStore, StoreValue};
use stash_domain::value_objects::{CacheConfig, Expiration, InvalidateOptions, Options};
use stash_providers::cache::{MemoryCacheProvider, MemoryStore};
use std::time::Duration;

async fn memory_cache(config: &CacheConfig) -> Cache {
    let provider = MemoryCacheProvider::from_config(config);
    Cache::from_provider(&provider, OperationLock::new())
        .await
        .expect("memory cache should always load")
}

#[tokio::test]
async fn test_provider_is_always_valid_and_reachable() {
    let provider = MemoryCacheProvider::default();

    assert_eq!(provider.driver(), "memory");
    assert!(provider.validate().is_ok());
    assert!(provider.ping().await.is_ok());
}

#[tokio::test]
async fn test_set_and_get_tagged_value() {
    let cache = memory_cache(&CacheConfig::memory()).await;

    cache
        .set("key", "stash", Options::new().with_tag("tag"))
        .await
        .unwrap();

    let value: String = cache.get("key").await.unwrap();
    assert_eq!(value, "stash");
}

#[tokio::test]
async fn test_store_returns_raw_json_bytes() {
    let store = MemoryStore::new(None, Duration::ZERO, None);

    store
        .set("key", b"\"stash\"".to_vec(), &Options::new())
        .await
        .unwrap();

    assert_eq!(
        store.get("key").await.unwrap(),
        Some(StoreValue::Bytes(b"\"stash\"".to_vec()))
    );
    assert_eq!(store.get("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_invalidate_by_tag() {
    let cache = memory_cache(&CacheConfig::memory()).await;

    cache
        .set("a", &1, Options::new().with_tags(["tag", "other"]))
        .await
        .unwrap();
    cache
        .set("b", &2, Options::new().with_tag("other"))
        .await
        .unwrap();
    cache.set("c", &3, Options::new()).await.unwrap();

    cache
        .invalidate(InvalidateOptions::tags(["tag"]))
        .await
        .unwrap();

    assert!(cache.get::<i32>("a").await.unwrap_err().is_not_found());
    assert_eq!(cache.get::<i32>("b").await.unwrap(), 2);
    assert_eq!(cache.get::<i32>("c").await.unwrap(), 3);

    // Unknown tags are a no-op
    cache
        .invalidate(InvalidateOptions::tags(["never-used"]))
        .await
        .unwrap();
    assert_eq!(cache.get::<i32>("b").await.unwrap(), 2);
}

#[tokio::test]
async fn test_per_entry_expiration() {
    let cache = memory_cache(&CacheConfig::memory()).await;

    cache
        .set(
            "short",
            "gone soon",
            Options::new().with_expiration(Duration::from_millis(30)),
        )
        .await
        .unwrap();
    cache.set("long", "still here", Options::new()).await.unwrap();

    tokio::time::sleep(Duration::from_millis(80)).await;

    assert!(cache.get::<String>("short").await.unwrap_err().is_not_found());
    assert_eq!(cache.get::<String>("long").await.unwrap(), "still here");
}

#[tokio::test]
async fn test_default_expiration_applies_to_unspecified_entries() {
    let config = CacheConfig::memory().with_default_expiration(Duration::from_secs(1));
    let store = MemoryStore::new(config.default_expiration(), Duration::ZERO, None);

    store
        .set("default", b"1".to_vec(), &Options::new())
        .await
        .unwrap();
    store
        .set(
            "explicit",
            b"2".to_vec(),
            &Options::new().with_expiration(Expiration::Never),
        )
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert!(store.get("default").await.unwrap().is_none());
    assert!(store.get("explicit").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let cache = memory_cache(&CacheConfig::memory()).await;

    cache.set("key", "stash", Options::new()).await.unwrap();
    cache.delete("key").await.unwrap();
    cache.delete("key").await.unwrap();

    assert!(matches!(
        cache.get::<String>("key").await,
        Err(Error::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_clear_removes_everything() {
    let store = MemoryStore::new(None, Duration::ZERO, None);

    for i in 0..10 {
        store
            .set(&format!("key-{i}"), b"1".to_vec(), &Options::new().with_tag("t"))
            .await
            .unwrap();
    }
    assert_eq!(store.entry_count().await, 10);

    store.clear().await.unwrap();
    assert_eq!(store.entry_count().await, 0);
}

#[tokio::test]
async fn test_capacity_bound_is_enforced() {
    let store = MemoryStore::new(None, Duration::ZERO, Some(5));

    for i in 0..50 {
        store
            .set(&format!("key-{i}"), b"1".to_vec(), &Options::new())
            .await
            .unwrap();
    }

    assert!(store.entry_count().await <= 5);
}

#[tokio::test]
async fn test_untagged_rewrite_survives_invalidate() {
    let cache = memory_cache(&CacheConfig::memory()).await;

    cache
        .set("key", "tagged", Options::new().with_tag("tag"))
        .await
        .unwrap();
    cache.delete("key").await.unwrap();
    cache.set("key", "untagged", Options::new()).await.unwrap();

    cache
        .invalidate(InvalidateOptions::tags(["tag"]))
        .await
        .unwrap();

    let value: String = cache.get("key").await.unwrap();
    assert_eq!(value, "untagged");
}

#[tokio::test]
async fn test_zero_expiration_falls_back_to_default() {
    let config = CacheConfig::memory().with_default_expiration(Duration::from_secs(300));
    let cache = memory_cache(&config).await;
    let options = Options {
        expiration: Expiration::After(Duration::ZERO),
        tags: Vec::new(),
    };

    cache.set("key", "stash", options).await.unwrap();

    let value: String = cache.get("key").await.unwrap();
    assert_eq!(value, "stash");
}
