use std::sync::Arc;

use futures_util::FutureExt;
use medialib_api::{DocumentFilter, WorkspaceClient};

use crate::bus::{ChangeBus, CollectionKind, Source, Target};
use crate::convert;
use crate::error::CoreError;
use crate::model::Document;
use crate::store::{Collection, Fetcher, fetcher};

/// Folder the portal moves deleted documents into.
pub const TRASH_FOLDER: &str = "Trash";

/// Protected copies owned by applications (the media library's own uploads).
/// Documents sitting in the trash are left out.
pub struct AppDocuments {
    documents: Collection<Document>,
    bus: ChangeBus,
}

impl AppDocuments {
    pub(crate) fn new(client: Arc<WorkspaceClient>, bus: ChangeBus) -> Self {
        let documents = fetcher(move || {
            let client = Arc::clone(&client);
            async move {
                let raw = client
                    .list_documents(Some(DocumentFilter::Protected), false)
                    .await?;
                Ok(without_trash(convert::documents(raw)))
            }
        });
        Self::with_fetcher(bus, documents)
    }

    pub(crate) fn with_fetcher(bus: ChangeBus, documents: Fetcher<Document>) -> Self {
        Self {
            documents: Collection::new(
                Target::collection(Source::AppDocuments, CollectionKind::Documents),
                bus.clone(),
                documents,
            ),
            bus,
        }
    }

    pub async fn sync(&self) -> Result<(), CoreError> {
        super::join_syncs(
            &self.bus,
            &Source::AppDocuments,
            vec![(CollectionKind::Documents, self.documents.sync().boxed())],
        )
        .await
    }

    pub fn documents(&self) -> &Collection<Document> {
        &self.documents
    }
}

fn without_trash(docs: Vec<Document>) -> Vec<Document> {
    docs.into_iter()
        .filter(|d| d.folder.as_deref() != Some(TRASH_FOLDER))
        .collect()
}
