//! Tests for the provider registry
//!
//! Covers explicit registration, lookup, resolution and the link-time slice.

use crate::test_doubles::{misconfigured_factory, stub_factory, unreachable_factory};
use stash_application::registry::{CACHE_PROVIDERS, CacheProviderEntry, ProviderRegistry};
use stash_domain::error::Error;
use stash_domain::value_objects::CacheConfig;

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static LINKED_TEST_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "linked-test",
    description: "Provider submitted through the distributed slice",
    factory: stub_factory,
};

fn registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register("stub", "Always healthy stub", stub_factory);
    registry.register("unreachable", "Ping always fails", unreachable_factory);
    registry
}

#[test]
fn test_register_and_exists() {
    let registry = registry();

    assert!(registry.exists("stub"));
    assert!(registry.exists("unreachable"));
    assert!(!registry.exists("redis"));
    assert_eq!(registry.len(), 2);
}

#[test]
#[should_panic(expected = "already registered")]
fn test_duplicate_registration_panics() {
    let mut registry = registry();
    registry.register("stub", "Second stub", misconfigured_factory);
}

#[test]
fn test_resolve_registered_driver() {
    let registry = registry();

    let provider = registry
        .resolve(&CacheConfig::new("stub"))
        .expect("stub should resolve");
    assert_eq!(provider.driver(), "stub");
}

#[test]
fn test_resolve_unknown_driver() {
    let registry = registry();

    match registry.resolve(&CacheConfig::new("couchbase")) {
        Err(Error::UnknownDriver { driver, available }) => {
            assert_eq!(driver, "couchbase");
            assert_eq!(available, vec!["stub", "unreachable"]);
        }
        other => panic!("expected UnknownDriver, got {other:?}"),
    }
}

#[test]
fn test_blank_driver_resolves_memory() {
    let registry = registry();

    // Blank driver means memory, which this registry does not have
    let err = registry.resolve(&CacheConfig::new("")).unwrap_err();
    assert!(matches!(err, Error::UnknownDriver { ref driver, .. } if driver == "memory"));
}

#[test]
fn test_drivers_sorted_with_descriptions() {
    let registry = registry();

    assert_eq!(
        registry.drivers(),
        vec![
            ("stub", "Always healthy stub"),
            ("unreachable", "Ping always fails")
        ]
    );
}

#[test]
fn test_linked_providers_are_collected() {
    let registry = ProviderRegistry::with_registered_providers();

    assert!(registry.exists("linked-test"));
    let provider = registry.resolve(&CacheConfig::new("linked-test")).unwrap();
    assert_eq!(provider.driver(), "stub");
}

#[test]
fn test_empty_registry() {
    let registry = ProviderRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.drivers().is_empty());
}
