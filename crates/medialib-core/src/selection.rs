// ── Selection ──
//
// The "selected" flag lives beside the entities, not on them: documents
// stay immutable and a re-sync never loses or resurrects a selection flag.

use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexSet;

use crate::model::{Entity, EntityId};

/// Ids of the currently selected entities, in selection order.
#[derive(Debug, Default)]
pub struct Selection {
    ids: RwLock<IndexSet<EntityId>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id was not selected yet.
    pub fn select(&self, id: EntityId) -> bool {
        self.write(|ids| ids.insert(id))
    }

    pub fn deselect(&self, id: &EntityId) -> bool {
        self.write(|ids| ids.shift_remove(id))
    }

    /// Flip the flag. Returns the new state.
    pub fn toggle(&self, id: &EntityId) -> bool {
        self.write(|ids| {
            if ids.shift_remove(id) {
                false
            } else {
                ids.insert(id.clone());
                true
            }
        })
    }

    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.ids
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    pub fn clear(&self) {
        self.write(IndexSet::clear);
    }

    pub fn len(&self) -> usize {
        self.ids.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.ids
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// The selected entities present in `snapshot`, in snapshot order.
    pub fn selected_in<T: Entity>(&self, snapshot: &[Arc<T>]) -> Vec<Arc<T>> {
        let ids = self.ids.read().unwrap_or_else(PoisonError::into_inner);
        snapshot
            .iter()
            .filter(|e| ids.contains(e.id()))
            .cloned()
            .collect()
    }

    fn write<R>(&self, f: impl FnOnce(&mut IndexSet<EntityId>) -> R) -> R {
        f(&mut self.ids.write().unwrap_or_else(PoisonError::into_inner))
    }
}
