//! In-memory snapshot cache
//!
//! Holds the last value produced by a refresh cycle. Reads are synchronous
//! and never block on a cycle in flight; writers replace the whole value.
//!
//! # Example
//!
//! ```rust
//! use medalwatch::cache::SnapshotCache;
//!
//! let cache = SnapshotCache::new();
//! assert_eq!(cache.get(), None);
//!
//! cache.store(42u32);
//! assert_eq!(cache.get(), Some(42));
//! ```

use tokio::sync::watch;

/// Latest-value cache with change notification
#[derive(Debug)]
pub struct SnapshotCache<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> SnapshotCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Current value, if any was ever stored
    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    /// Whether a value has been stored
    pub fn is_populated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Replace the stored value and notify subscribers
    pub fn store(&self, value: T) {
        self.tx.send_replace(Some(value));
    }

    /// Store `value` only when the cache is still empty
    ///
    /// Returns whether the value was stored.
    pub fn store_if_empty(&self, value: T) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(value);
            true
        })
    }

    /// Subscribe to replacements
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
