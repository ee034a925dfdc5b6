// ── Upload and duplication ──
//
// Uploads go to the media library's protected space with a fixed set of
// thumbnails. Nothing here inserts the new document into a collection:
// callers re-sync (as `import_files` does) or keep the returned value.

use std::sync::Arc;

use futures_util::future::{join_all, try_join_all};
use medialib_api::{FileUpload, UploadOptions};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::library::{MediaLibrary, SourceKind};
use crate::model::Document;

impl MediaLibrary {
    /// Upload one file as a protected media-library document.
    pub async fn upload(&self, file: FileUpload, request_name: &str) -> Result<Document, CoreError> {
        let sent = file.clone();
        let raw = self
            .client
            .upload_document(file, &UploadOptions::media_library(), request_name)
            .await?;
        let doc = Document::from_upload(raw, &sent)?;
        debug!(id = %doc.id, filename = %doc.filename, "uploaded document");
        Ok(doc)
    }

    /// Download `doc` and upload its bytes again as a protected copy.
    ///
    /// Used when a document picked from another source has to live in the
    /// media library's own space.
    pub async fn protected_duplicate(&self, doc: &Document) -> Result<Document, CoreError> {
        let bytes = self.client.download_document(&doc.id.to_string()).await?;
        let mut file = FileUpload::new(doc.filename.clone(), bytes);
        file.content_type.clone_from(&doc.content_type);

        let request_name = format!("duplicate-{}", doc.id);
        self.upload(file, &request_name).await
    }

    /// Turn a selection from `kind` into documents the caller may use.
    ///
    /// App documents are already protected copies and come back as is;
    /// anything else is duplicated first. Fails if any duplicate fails.
    pub async fn select_documents(
        &self,
        kind: SourceKind,
        docs: &[Arc<Document>],
    ) -> Result<Vec<Arc<Document>>, CoreError> {
        if kind == SourceKind::App {
            return Ok(docs.to_vec());
        }
        let copies = try_join_all(docs.iter().map(|d| self.protected_duplicate(d))).await?;
        Ok(copies.into_iter().map(Arc::new).collect())
    }

    /// Upload every file concurrently, then re-sync app documents once.
    ///
    /// Outcomes are reported per file, in input order.
    pub async fn import_files(&self, files: Vec<FileUpload>) -> Vec<Result<Arc<Document>, CoreError>> {
        let uploads = files.into_iter().enumerate().map(|(i, file)| async move {
            let request_name = format!("file-upload-{}-{i}", file.file_name);
            self.upload(file, &request_name).await.map(Arc::new)
        });
        let results = join_all(uploads).await;

        let uploaded = results.iter().filter(|r| r.is_ok()).count();
        debug!(uploaded, failed = results.len() - uploaded, "import finished");
        if uploaded > 0 {
            if let Err(e) = self.app_documents().sync().await {
                warn!(error = %e, "re-sync after import failed");
            }
        }
        results
    }
}
