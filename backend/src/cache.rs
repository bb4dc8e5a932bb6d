//! In-memory status cache.
//!
//! The cache holds one immutable [`StatusSnapshot`] behind an `Arc`. A refresh
//! builds a complete new snapshot and swaps the pointer, so readers see either
//! the previous or the next snapshot and never a partially filled map.

use fleet_shared::models::StatusSnapshot;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default)]
pub struct StatusCache {
    current: Arc<RwLock<Arc<StatusSnapshot>>>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<StatusSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Replace the published snapshot and return the new one.
    pub fn publish(&self, snapshot: StatusSnapshot) -> Arc<StatusSnapshot> {
        let snapshot = Arc::new(snapshot);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&snapshot);
        snapshot
    }
}
