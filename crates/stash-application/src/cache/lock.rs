//! Shared operation lock
//!
//! Every cache loaded from the same runtime holds a clone of one
//! [`OperationLock`]. An operation keeps the guard for its whole duration,
//! encode/decode included, so at most one cache operation is in flight.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Mutual exclusion shared by cache facades
#[derive(Debug, Clone, Default)]
pub struct OperationLock {
    inner: Arc<Mutex<()>>,
}

impl OperationLock {
    /// Create a fresh lock
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().await
    }

    /// True when both handles guard the same lock
    pub fn is_shared_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
