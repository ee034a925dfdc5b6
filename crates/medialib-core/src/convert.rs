// ── API-to-domain type conversions ──
//
// Bridges raw `medialib_api` payloads into `medialib_core::model` types.
// A record without an id (or a document without a filename) cannot be
// displayed or selected, so conversion fails for it. Batch helpers skip
// such records, and elements the transport could not decode at all, with
// a warning instead of failing the whole listing.

use medialib_api::{FileUpload, RawDocument, RawFolder, RawWidget, Record};
use tracing::warn;

use crate::error::CoreError;
use crate::model::document::{parse_created, title_from_filename};
use crate::model::{Document, EntityId, Folder, Role, Widget};

// ── Helpers ────────────────────────────────────────────────────────

fn required_id(entity: &str, id: Option<String>) -> Result<EntityId, CoreError> {
    match id {
        Some(id) if !id.is_empty() => Ok(EntityId::from(id)),
        _ => Err(CoreError::malformed(entity, "missing _id")),
    }
}

/// Convert a batch, dropping records that fail with a `warn!`.
fn convert_all<R, T>(entity: &'static str, raw: Vec<Record<R>>) -> Vec<T>
where
    T: TryFrom<R, Error = CoreError>,
{
    let total = raw.len();
    let converted: Vec<T> = raw
        .into_iter()
        .map(|record| match record {
            Ok(r) => T::try_from(r),
            Err(rejected) => Err(CoreError::malformed(entity, rejected.to_string())),
        })
        .filter_map(|r| match r {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(entity, error = %e, "skipping malformed record");
                None
            }
        })
        .collect();

    if converted.len() < total {
        warn!(
            entity,
            skipped = total - converted.len(),
            kept = converted.len(),
            "listing contained malformed records"
        );
    }
    converted
}

pub(crate) fn documents(raw: Vec<Record<RawDocument>>) -> Vec<Document> {
    convert_all("document", raw)
}

pub(crate) fn folders(raw: Vec<Record<RawFolder>>) -> Vec<Folder> {
    convert_all("folder", raw)
}

pub(crate) fn widgets(raw: Vec<Record<RawWidget>>) -> Vec<Widget> {
    convert_all("widget", raw)
}

// ── Document ───────────────────────────────────────────────────────

impl TryFrom<RawDocument> for Document {
    type Error = CoreError;

    fn try_from(raw: RawDocument) -> Result<Self, Self::Error> {
        let id = required_id("document", raw.id)?;
        let meta = raw.metadata.unwrap_or_default();
        let filename = meta
            .filename
            .filter(|f| !f.is_empty())
            .ok_or_else(|| CoreError::malformed("document", format!("{id}: missing metadata.filename")))?;

        let content_type = meta.content_type.filter(|ct| !ct.trim().is_empty());
        let role = content_type.as_deref().map_or(Role::Unknown, Role::classify);

        Ok(Document {
            title: title_from_filename(&filename),
            role,
            created: raw.created.as_deref().and_then(parse_created),
            id,
            name: raw.name,
            filename,
            content_type,
            size: meta.size,
            folder: raw.folder.filter(|f| !f.is_empty()),
            owner: raw.owner,
            owner_name: raw.owner_name,
            application: raw.application,
            protected: raw.protected.unwrap_or(false),
            extra: raw.extra,
        })
    }
}

impl Document {
    /// Build the document returned by an upload.
    ///
    /// Upload responses often omit `metadata`; the file that was sent
    /// fills the gaps.
    pub(crate) fn from_upload(mut raw: RawDocument, file: &FileUpload) -> Result<Self, CoreError> {
        let meta = raw.metadata.get_or_insert_with(Default::default);
        if meta.filename.as_deref().is_none_or(str::is_empty) {
            meta.filename = Some(file.file_name.clone());
        }
        if meta.content_type.is_none() {
            meta.content_type.clone_from(&file.content_type);
        }
        if meta.size.is_none() {
            meta.size = u64::try_from(file.bytes.len()).ok();
        }
        Document::try_from(raw)
    }
}

// ── Folder ─────────────────────────────────────────────────────────

impl TryFrom<RawFolder> for Folder {
    type Error = CoreError;

    fn try_from(raw: RawFolder) -> Result<Self, Self::Error> {
        let id = required_id("folder", raw.id)?;
        let path = raw
            .folder
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CoreError::malformed("folder", format!("{id}: missing folder path")))?;
        let name = raw
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| path.clone());

        Ok(Folder {
            id,
            name,
            path,
            owner: raw.owner,
            created: raw.created.as_deref().and_then(parse_created),
            extra: raw.extra,
        })
    }
}

// ── Widget ─────────────────────────────────────────────────────────

impl TryFrom<RawWidget> for Widget {
    type Error = CoreError;

    fn try_from(raw: RawWidget) -> Result<Self, Self::Error> {
        let name = raw
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CoreError::malformed("widget", "missing name"))?;
        let id = raw
            .id
            .filter(|i| !i.is_empty())
            .map_or_else(|| EntityId::from(name.as_str()), EntityId::from);

        Ok(Widget {
            id,
            name,
            path: raw.path,
            js: raw.js,
            i18n: raw.i18n,
            extra: raw.extra,
        })
    }
}
