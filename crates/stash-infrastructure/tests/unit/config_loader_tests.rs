//! Configuration Loader Tests

use stash_domain::constants::{DEFAULT_CLEANUP_INTERVAL_SECS, MEMORY_DRIVER};
use stash_domain::error::Error;
use stash_domain::value_objects::CacheConfig;
use stash_infrastructure::config::loader::{ConfigBuilder, ConfigLoader, validate_app_config};
use stash_infrastructure::constants::DEFAULT_LOG_LEVEL;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_config_loader_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigLoader::new()
        .with_config_path(temp_dir.path().join("absent.toml"))
        .with_env_prefix("STASH_LOADER_DEFAULTS_UNSET")
        .load()
        .unwrap();

    assert_eq!(config.cache.driver, MEMORY_DRIVER);
    assert_eq!(
        config.cache.memory.cleanup_interval_secs,
        DEFAULT_CLEANUP_INTERVAL_SECS
    );
    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
}

#[test]
fn test_config_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("stash.toml");
    std::fs::write(
        &config_path,
        r#"
[cache]
driver = "memcache"
default_expiration_secs = 120

[cache.memcache]
hosts = ["10.0.0.1:11211", "10.0.0.2:11211"]

[logging]
level = "debug"
json_format = true
"#,
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_config_path(&config_path)
        .with_env_prefix("STASH_LOADER_FILE_UNSET")
        .load()
        .unwrap();

    assert_eq!(config.cache.driver, "memcache");
    assert_eq!(config.cache.default_expiration(), Some(Duration::from_secs(120)));
    assert_eq!(config.cache.memcache.hosts.len(), 2);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json_format);
    // Untouched sections keep their defaults
    assert!(config.cache.redis.address.is_empty());
}

#[test]
fn test_config_save_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("saved.toml");

    let original = ConfigBuilder::new()
        .with_cache(
            CacheConfig::redis("127.0.0.1:6379")
                .with_default_expiration(Duration::from_secs(600)),
        )
        .with_log_level("warn")
        .build();

    let loader = ConfigLoader::new().with_env_prefix("STASH_LOADER_SAVE_UNSET");
    loader.save_to_file(&original, &config_path).unwrap();

    let loaded = loader.with_config_path(&config_path).load().unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn test_malformed_file_is_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    std::fs::write(&config_path, "[cache\ndriver = ").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&config_path)
        .load()
        .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_save_to_missing_directory_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no").join("such").join("dir.toml");

    let err = ConfigLoader::new()
        .save_to_file(&ConfigBuilder::new().build(), path)
        .unwrap_err();

    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_validation_rejects_bad_values() {
    let bad_level = ConfigBuilder::new().with_log_level("verbose").build();
    assert!(validate_app_config(&bad_level).is_err());

    let bad_driver = ConfigBuilder::new()
        .with_cache(CacheConfig::new("red is"))
        .build();
    assert!(validate_app_config(&bad_driver).is_err());

    let mut zero_ttl = CacheConfig::memory();
    zero_ttl.default_expiration_secs = Some(0);
    assert!(validate_app_config(&ConfigBuilder::new().with_cache(zero_ttl).build()).is_err());

    let mut zero_timeout = CacheConfig::redis("127.0.0.1:6379");
    zero_timeout.redis.connect_timeout_secs = 0;
    assert!(validate_app_config(&ConfigBuilder::new().with_cache(zero_timeout).build()).is_err());
}

#[test]
fn test_validation_accepts_blank_and_unknown_drivers() {
    // Blank means memory; unknown names are rejected later by the registry
    for driver in ["", "couchbase"] {
        let config = ConfigBuilder::new()
            .with_cache(CacheConfig::new(driver))
            .build();
        assert!(validate_app_config(&config).is_ok());
    }
}
