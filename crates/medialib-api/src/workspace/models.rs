// Workspace API payload types
//
// The portal stores documents as loosely-shaped JSON records. Every field
// is optional here: deciding what a usable record looks like is the core
// crate's job, not the transport's. Unknown fields land in `extra`.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::RejectedRecord;

/// One element of a listing. See [`RejectedRecord`].
pub type Record<T> = Result<T, RejectedRecord>;

// ── Documents ────────────────────────────────────────────────────────

/// A document record from `GET /workspace/documents`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    /// Creation time, e.g. `"2015-01-27 15:26.13.672"`.
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    /// Owning folder path, absent for documents at the root.
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(rename = "ownerName", default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub application: Option<String>,
    #[serde(default)]
    pub protected: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// File metadata nested inside `RawDocument`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(rename = "content-type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Folders ──────────────────────────────────────────────────────────

/// A folder record from `GET /workspace/folders/list`.
///
/// `folder` is the full path, with `_` separating nesting levels
/// (`"Cours_Maths_2024"` lives under `"Cours_Maths"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFolder {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Widgets ──────────────────────────────────────────────────────────

/// A widget descriptor from `GET /widgets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWidget {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub js: Option<String>,
    #[serde(default)]
    pub i18n: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Query parameters ─────────────────────────────────────────────────

/// Ownership filter accepted by the document and folder listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFilter {
    /// Documents owned by the current user.
    Owner,
    /// Documents other users shared with the current user.
    Shared,
    /// Protected copies stored by applications.
    Protected,
}

impl DocumentFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Shared => "shared",
            Self::Protected => "protected",
        }
    }
}

/// A thumbnail size requested at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Thumbnail sizes the media library asks for on every upload.
pub const MEDIA_LIBRARY_THUMBNAILS: [Thumbnail; 6] = [
    Thumbnail { width: 120, height: 120 },
    Thumbnail { width: 100, height: 100 },
    Thumbnail { width: 290, height: 290 },
    Thumbnail { width: 48, height: 48 },
    Thumbnail { width: 82, height: 82 },
    Thumbnail { width: 381, height: 381 },
];

/// Query options for `POST /workspace/document`.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub protected: bool,
    pub application: String,
    pub thumbnails: Vec<Thumbnail>,
}

impl UploadOptions {
    /// Protected upload owned by the media library, with its fixed thumbnails.
    pub fn media_library() -> Self {
        Self {
            protected: true,
            application: "media-library".into(),
            thumbnails: MEDIA_LIBRARY_THUMBNAILS.to_vec(),
        }
    }
}

/// A file to send as the `file` part of a multipart upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    /// MIME type of the part. `None` lets the server sniff it.
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn document_keeps_unknown_fields() {
        let doc: RawDocument = serde_json::from_value(json!({
            "_id": "d1",
            "metadata": { "filename": "report.pdf", "content-type": "application/pdf", "size": 12 },
            "thumbnails": { "120x120": "t1" },
            "comments": []
        }))
        .unwrap();

        let meta = doc.metadata.unwrap();
        assert_eq!(meta.filename.as_deref(), Some("report.pdf"));
        assert_eq!(meta.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(meta.size, Some(12));
        assert!(doc.extra.contains_key("thumbnails"));
        assert!(doc.extra.contains_key("comments"));
    }

    #[test]
    fn document_without_metadata_still_parses() {
        let doc: RawDocument = serde_json::from_value(json!({ "_id": "d2" })).unwrap();
        assert!(doc.metadata.is_none());
    }

    #[test]
    fn thumbnail_display() {
        let joined: Vec<String> = MEDIA_LIBRARY_THUMBNAILS.iter().map(ToString::to_string).collect();
        assert_eq!(
            joined,
            ["120x120", "100x100", "290x290", "48x48", "82x82", "381x381"]
        );
    }
}
