//! Main application configuration

use super::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use stash_domain::value_objects::CacheConfig;

/// Root of `stash.toml`
///
/// ```toml
/// [cache]
/// driver = "redis"
/// default_expiration_secs = 300
///
/// [cache.redis]
/// address = "127.0.0.1:6379"
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Cache driver selection and backend settings
    pub cache: CacheConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}
