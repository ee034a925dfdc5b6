// ── Folder domain type ──

use chrono::NaiveDateTime;
use serde::Serialize;

use super::Entity;
use super::entity_id::EntityId;

/// Separator between nesting levels in a folder path.
pub const PATH_SEPARATOR: char = '_';

/// A workspace folder. Nesting is encoded in `path` only; there are no
/// parent links.
#[derive(Debug, Clone, Serialize)]
pub struct Folder {
    pub id: EntityId,
    pub name: String,
    /// Full path, e.g. `"Cours_Maths_2024"`.
    pub path: String,
    pub owner: Option<String>,
    pub created: Option<NaiveDateTime>,
    #[serde(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Folder {
    /// A folder sits at the top level when its path has no separator.
    pub fn is_top_level(&self) -> bool {
        !self.path.contains(PATH_SEPARATOR)
    }

    /// True for every folder below `parent`, at any depth.
    ///
    /// Matching is by substring, so `"a_b_c"` is within `"b"` as well.
    /// Portal paths are rooted at the owner's top-level folders, which
    /// keeps this unambiguous in practice.
    pub fn is_within(&self, parent: &str) -> bool {
        let mut prefix = String::with_capacity(parent.len() + 1);
        prefix.push_str(parent);
        prefix.push(PATH_SEPARATOR);
        self.path.contains(&prefix)
    }

    /// True only for immediate children of `parent`.
    pub fn is_child_of(&self, parent: &str) -> bool {
        self.parent_path() == Some(parent)
    }

    /// Path of the containing folder, `None` at the top level.
    pub fn parent_path(&self) -> Option<&str> {
        self.path
            .rsplit_once(PATH_SEPARATOR)
            .map(|(parent, _)| parent)
    }
}

impl Entity for Folder {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
