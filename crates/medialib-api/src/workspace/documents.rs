// Workspace document and folder endpoints

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::workspace::client::WorkspaceClient;
use crate::workspace::models::{
    DocumentFilter, FileUpload, RawDocument, RawFolder, Record, UploadOptions,
};

impl WorkspaceClient {
    /// List documents visible to the session.
    ///
    /// `GET /workspace/documents[?filter=…&hierarchical=true]`
    pub async fn list_documents(
        &self,
        filter: Option<DocumentFilter>,
        hierarchical: bool,
    ) -> Result<Vec<Record<RawDocument>>, Error> {
        let mut url = self.url("workspace/documents")?;
        listing_query(&mut url, filter, hierarchical);
        debug!(?filter, hierarchical, "listing documents");
        self.get_records(url).await
    }

    /// List the documents stored directly in one folder.
    ///
    /// `GET /workspace/documents/{folder}[?filter=…&hierarchical=true]`
    pub async fn list_folder_documents(
        &self,
        folder: &str,
        filter: Option<DocumentFilter>,
        hierarchical: bool,
    ) -> Result<Vec<Record<RawDocument>>, Error> {
        let mut url = self.url_with_segment("workspace/documents", folder)?;
        listing_query(&mut url, filter, hierarchical);
        debug!(folder, ?filter, "listing folder documents");
        self.get_records(url).await
    }

    /// List every folder (all nesting levels, flat).
    ///
    /// `GET /workspace/folders/list[?filter=…]`
    pub async fn list_folders(
        &self,
        filter: Option<DocumentFilter>,
    ) -> Result<Vec<Record<RawFolder>>, Error> {
        let mut url = self.url("workspace/folders/list")?;
        listing_query(&mut url, filter, false);
        debug!(?filter, "listing folders");
        self.get_records(url).await
    }

    /// Download a document's content.
    ///
    /// `GET /workspace/document/{id}`
    pub async fn download_document(&self, id: &str) -> Result<Bytes, Error> {
        let url = self.url_with_segment("workspace/document", id)?;
        debug!(id, "downloading document");
        self.get_bytes(url).await
    }

    /// Upload one file as a new document.
    ///
    /// `POST /workspace/document?protected=…&application=…&thumbnail=WxH…`
    /// (multipart, single `file` part). `request_name` labels the upload in
    /// logs so concurrent uploads can be told apart.
    pub async fn upload_document(
        &self,
        file: FileUpload,
        options: &UploadOptions,
        request_name: &str,
    ) -> Result<RawDocument, Error> {
        let mut url = self.url("workspace/document")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("protected", if options.protected { "true" } else { "false" });
            query.append_pair("application", &options.application);
            for thumb in &options.thumbnails {
                query.append_pair("thumbnail", &thumb.to_string());
            }
        }

        debug!(
            request = request_name,
            file = %file.file_name,
            size = file.bytes.len(),
            "uploading document"
        );

        let form = Form::new().part("file", file_part(&file));

        self.post_multipart(url, form).await
    }
}

/// Multipart part for `file`. A stored content type that is blank or
/// does not parse as a MIME type is dropped rather than failing the upload.
fn file_part(file: &FileUpload) -> Part {
    let part = || Part::bytes(file.bytes.to_vec()).file_name(file.file_name.clone());
    let content_type = file
        .content_type
        .as_deref()
        .map(str::trim)
        .filter(|ct| !ct.is_empty());
    match content_type {
        None => part(),
        Some(ct) => part().mime_str(ct).unwrap_or_else(|e| {
            warn!(file = %file.file_name, content_type = ct, error = %e, "ignoring unparsable content type");
            part()
        }),
    }
}

fn listing_query(url: &mut Url, filter: Option<DocumentFilter>, hierarchical: bool) {
    if filter.is_none() && !hierarchical {
        return;
    }
    let mut query = url.query_pairs_mut();
    if let Some(filter) = filter {
        query.append_pair("filter", filter.as_str());
    }
    if hierarchical {
        query.append_pair("hierarchical", "true");
    }
}
