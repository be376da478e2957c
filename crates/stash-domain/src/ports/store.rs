//! Cache Store Port
//!
//! The narrow capability every backend exposes. Stores deal in raw bytes;
//! encoding and decoding of typed values happens in the facade.

use crate::error::Result;
use crate::value_objects::{InvalidateOptions, Options};
use async_trait::async_trait;

/// Raw value returned by a backend
///
/// Some clients hand back text, others bytes. Both decode the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreValue {
    /// Binary payload
    Bytes(Vec<u8>),
    /// Text payload
    Text(String),
}

impl StoreValue {
    /// View the payload as bytes regardless of how the backend returned it
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// True when the payload is empty
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<Vec<u8>> for StoreValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<String> for StoreValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Cache Store Port
///
/// Get/set/delete/invalidate/clear/ping by key. Implementations own their
/// client handles and are shared behind `Arc<dyn CacheStore>`.
#[async_trait]
pub trait CacheStore: Send + Sync + std::fmt::Debug {
    /// Fetch the raw value for `key`, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<StoreValue>>;

    /// Store `value` under `key` with the given expiration and tags
    async fn set(&self, key: &str, value: Vec<u8>, options: &Options) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Remove every entry associated with any of the given tags
    async fn invalidate(&self, options: &InvalidateOptions) -> Result<()>;

    /// Remove every entry
    async fn clear(&self) -> Result<()>;

    /// Check the backend is reachable
    async fn ping(&self) -> Result<()>;
}
