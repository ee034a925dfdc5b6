// ── Search projections ──
//
// Pure functions of a snapshot and a query. They never touch the
// collection the snapshot came from.

use std::sync::Arc;

use crate::model::{Document, Entity, Role};
use crate::text;

/// Accent- and case-insensitive substring match on display names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    folded: String,
}

impl SearchFilter {
    pub fn new(query: &str) -> Self {
        Self {
            folded: text::fold(query),
        }
    }

    /// An empty query matches everything.
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    pub fn matches<T: Entity>(&self, entity: &T) -> bool {
        self.is_empty() || text::fold(entity.display_name()).contains(&self.folded)
    }

    pub fn apply<T: Entity>(&self, snapshot: &[Arc<T>]) -> Vec<Arc<T>> {
        snapshot
            .iter()
            .filter(|e| self.matches::<T>(e))
            .cloned()
            .collect()
    }
}

/// Document search: a required role plus a free-text filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    pub role: Role,
    pub search: SearchFilter,
}

impl DocumentQuery {
    pub fn new(role: Role, query: &str) -> Self {
        Self {
            role,
            search: SearchFilter::new(query),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        doc.role() == self.role && self.search.matches(doc)
    }

    pub fn apply(&self, snapshot: &[Arc<Document>]) -> Vec<Arc<Document>> {
        snapshot
            .iter()
            .filter(|d| self.matches(d))
            .cloned()
            .collect()
    }
}
