// ── Snapshot storage for one entity kind ──
//
// The ordered snapshot is the source of truth; an id index beside it gives
// O(1) lookups. Every mutation swaps both wholesale and bumps the version.

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use tokio::sync::watch;
use tracing::debug;

use crate::model::{Entity, EntityId};

pub(crate) struct EntityCollection<T: Entity> {
    /// Id index over the current snapshot.
    by_id: ArcSwap<IndexMap<EntityId, Arc<T>>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Ordered snapshot handed to subscribers.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Entity> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_id: ArcSwap::from_pointee(IndexMap::new()),
            version,
            snapshot,
        }
    }

    /// Replace the whole contents, preserving payload order.
    ///
    /// Duplicate ids keep their first occurrence. Returns the stored count.
    pub(crate) fn replace(&self, items: Vec<T>) -> usize {
        let received = items.len();
        let mut index: IndexMap<EntityId, Arc<T>> = IndexMap::with_capacity(received);
        for item in items {
            let id = item.id().clone();
            index.entry(id).or_insert_with(|| Arc::new(item));
        }
        if index.len() < received {
            debug!(
                received,
                kept = index.len(),
                "dropped duplicate ids from payload"
            );
        }

        let values: Vec<Arc<T>> = index.values().cloned().collect();
        let count = values.len();
        self.by_id.store(Arc::new(index));
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(Arc::new(values));
        self.bump_version();
        count
    }

    pub(crate) fn clear(&self) {
        self.replace(Vec::new());
    }

    pub(crate) fn get_by_id(&self, id: &str) -> Option<Arc<T>> {
        self.by_id.load().get(id).cloned()
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}
