//! The single shared slot holding the message currently being (or about to
//! be) displayed.
//!
//! There is no history and no queue: every write unconditionally replaces
//! the previous value, and a reader always sees one complete value, never a
//! mixture of two. Whichever of a racing read and write wins the lock is
//! observed first; nothing stronger is promised.

use std::sync::Arc;

use tokio::sync::RwLock;

/// Cloneable handle to the current-message slot. All clones share the same
/// underlying value.
#[derive(Clone)]
pub struct MessageBoard {
    inner: Arc<RwLock<String>>,
}

impl MessageBoard {
    /// Create a board holding `initial`, typically the configured startup
    /// message.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial.into())),
        }
    }

    /// Returns a full copy of the current message.
    pub async fn get(&self) -> String {
        self.inner.read().await.clone()
    }

    /// Replace the current message. Intermediate values set between two
    /// reads are silently superseded.
    pub async fn set(&self, text: impl Into<String>) {
        *self.inner.write().await = text.into();
    }
}
