//! Error handling types

use thiserror::Error;

/// Boxed source error carried by backend and connection failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Stash
#[derive(Error, Debug)]
pub enum Error {
    /// The requested driver has not been registered
    #[error("Unknown cache driver '{driver}'. Available drivers: {available:?}")]
    UnknownDriver {
        /// The driver name that was requested
        driver: String,
        /// Driver names known to the registry
        available: Vec<String>,
    },

    /// Provider-specific configuration is missing or malformed
    #[error("Invalid {driver} configuration: {message}")]
    InvalidConfig {
        /// Driver whose configuration was rejected
        driver: String,
        /// Description of the problem
        message: String,
    },

    /// Backend could not be reached during the liveness check
    #[error("Cannot connect to {driver} backend: {message}")]
    Connection {
        /// Driver that failed to respond
        driver: String,
        /// Description of the failure
        message: String,
        /// Underlying network error
        #[source]
        source: Option<BoxError>,
    },

    /// Key is absent from the cache
    #[error("Cache key not found: {key}")]
    NotFound {
        /// The missing key
        key: String,
    },

    /// Value could not be serialized before reaching the backend
    #[error("Failed to encode value for cache key '{key}': {source}")]
    Encode {
        /// Key the value was meant for
        key: String,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Stored bytes could not be deserialized into the requested type
    #[error("Failed to decode value for cache key '{key}': {source}")]
    Decode {
        /// Key that was read
        key: String,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Backend rejected an operation after the cache was loaded
    #[error("Cache {operation} failed{}: {message}", key_suffix(.key))]
    Backend {
        /// Operation name (get, set, delete, invalidate, clear, ping)
        operation: &'static str,
        /// Key involved, if the operation targets a single key
        key: Option<String>,
        /// Description of the failure
        message: String,
        /// Underlying backend error
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration loading error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },
}

fn key_suffix(key: &Option<String>) -> String {
    key.as_ref()
        .map(|k| format!(" for key '{k}'"))
        .unwrap_or_default()
}

// Load-time error creation methods
impl Error {
    /// Create an unknown driver error
    pub fn unknown_driver<S: Into<String>>(driver: S, available: Vec<String>) -> Self {
        Self::UnknownDriver {
            driver: driver.into(),
            available,
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config<D: Into<String>, S: Into<String>>(driver: D, message: S) -> Self {
        Self::InvalidConfig {
            driver: driver.into(),
            message: message.into(),
        }
    }

    /// Create a connection error without a source
    pub fn connection<D: Into<String>, S: Into<String>>(driver: D, message: S) -> Self {
        Self::Connection {
            driver: driver.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection error with source
    pub fn connection_with_source<D, S, E>(driver: D, message: S, source: E) -> Self
    where
        D: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            driver: driver.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Operation error creation methods
impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(key: S) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a backend error that is not tied to a key
    pub fn backend<S: Into<String>>(operation: &'static str, message: S) -> Self {
        Self::Backend {
            operation,
            key: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create a backend error for a single key with source
    pub fn backend_for_key<K, S, E>(operation: &'static str, key: K, message: S, source: E) -> Self
    where
        K: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            operation,
            key: Some(key.into()),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a backend error with source
    pub fn backend_with_source<S, E>(operation: &'static str, message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            operation,
            key: None,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Ambient error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Classification helpers
impl Error {
    /// True when the error reports a missing key
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when the error happened while loading a cache rather than using one
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownDriver { .. } | Self::InvalidConfig { .. } | Self::Connection { .. }
        )
    }
}
