//! Infrastructure constants

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "stash.toml";

/// Directory searched for the configuration file (`./stash/`, `~/.config/stash/`)
pub const DEFAULT_CONFIG_DIR: &str = "stash";

/// Environment variable prefix; nested keys are separated by `__`
pub const CONFIG_ENV_PREFIX: &str = "STASH";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable holding an `EnvFilter` directive that overrides the level
pub const LOG_FILTER_ENV: &str = "STASH_LOG";

/// Default number of rotated log files kept
pub const LOG_MAX_FILES: usize = 5;

/// File name prefix used when the configured log path has no stem
pub const DEFAULT_LOG_FILE_PREFIX: &str = "stash";
