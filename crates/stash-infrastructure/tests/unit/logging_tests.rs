//! Logging Tests

use stash_infrastructure::constants::{DEFAULT_LOG_LEVEL, LOG_MAX_FILES};
use stash_infrastructure::logging::{LoggingConfig, init_logging, parse_log_level};
use tracing::Level;

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("INFO").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("warn").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("error").unwrap(), Level::ERROR);

    assert!(parse_log_level("invalid").is_err());
}

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, DEFAULT_LOG_LEVEL);
    assert!(!config.json_format);
    assert!(config.file_output.is_none());
    assert_eq!(config.max_files, LOG_MAX_FILES);
}

#[test]
fn test_init_logging_rejects_invalid_level() {
    let config = LoggingConfig {
        level: "chatty".to_string(),
        ..LoggingConfig::default()
    };

    assert!(init_logging(config).is_err());
}

#[test]
fn test_init_logging_with_file_then_second_install_fails() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config = LoggingConfig {
        file_output: Some(temp_dir.path().join("stash.log")),
        ..LoggingConfig::default()
    };

    // Only one global subscriber may be installed per process
    init_logging(config.clone()).unwrap();
    assert!(init_logging(config).is_err());
}
