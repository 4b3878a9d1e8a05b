//! Latest-known-position table.
//!
//! One live entry per tram id, last-write-wins. No history is kept here;
//! persistence of raw reports is an external concern.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{TramId, TramPosition};

/// Thread-safe latest-position table keyed by tram id.
///
/// Cheap to clone; clones share the same table.
#[derive(Clone, Default)]
pub struct PositionStore {
    inner: Arc<RwLock<HashMap<TramId, TramPosition>>>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the position for a tram.
    pub async fn upsert(&self, id: TramId, position: TramPosition) {
        let mut guard = self.inner.write().await;
        guard.insert(id, position);
    }

    /// The latest position for a tram, if any.
    pub async fn get(&self, id: &TramId) -> Option<TramPosition> {
        let guard = self.inner.read().await;
        guard.get(id).copied()
    }

    /// Remove a tram's entry (eviction of vanished trams).
    pub async fn remove(&self, id: &TramId) {
        let mut guard = self.inner.write().await;
        guard.remove(id);
    }

    /// A copy of the whole table, sorted by tram id.
    ///
    /// The sort makes downstream iteration order deterministic.
    pub async fn snapshot(&self) -> Vec<(TramId, TramPosition)> {
        let guard = self.inner.read().await;
        let mut entries: Vec<(TramId, TramPosition)> =
            guard.iter().map(|(id, pos)| (id.clone(), *pos)).collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    /// Number of trams with a live position.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.is_empty()
    }
}
