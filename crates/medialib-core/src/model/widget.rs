// ── Widget domain type ──

use serde::Serialize;

use super::Entity;
use super::entity_id::EntityId;

/// A portal widget descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct Widget {
    /// `_id` when the portal sends one, otherwise the widget name.
    pub id: EntityId,
    pub name: String,
    pub path: Option<String>,
    pub js: Option<String>,
    pub i18n: Option<String>,
    #[serde(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Entity for Widget {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
