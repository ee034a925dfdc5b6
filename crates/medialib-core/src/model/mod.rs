// ── Domain model ──
//
// Entities built from workspace payloads. Derived fields are computed once,
// at conversion time (see `convert`), and never recomputed in place.

pub mod document;
pub mod entity_id;
pub mod folder;
pub mod widget;

pub use document::{Document, Role};
pub use entity_id::EntityId;
pub use folder::Folder;
pub use widget::Widget;

/// A record a `Collection` can hold.
pub trait Entity: Send + Sync + 'static {
    fn id(&self) -> &EntityId;

    /// Name matched by free-text search.
    fn display_name(&self) -> &str;
}
