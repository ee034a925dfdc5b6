use std::sync::Arc;

use futures_util::FutureExt;
use medialib_api::{DocumentFilter, WorkspaceClient};

use crate::bus::{ChangeBus, CollectionKind, Source, Target};
use crate::config::{RIGHT_LIST, WorkflowRights};
use crate::convert;
use crate::error::CoreError;
use crate::model::Document;
use crate::store::{Collection, Fetcher, fetcher};

/// Documents other users shared with the session's user.
pub struct SharedDocuments {
    documents: Collection<Document>,
    bus: ChangeBus,
}

impl SharedDocuments {
    pub(crate) fn new(client: Arc<WorkspaceClient>, rights: WorkflowRights, bus: ChangeBus) -> Self {
        let documents = fetcher(move || {
            let client = Arc::clone(&client);
            async move {
                if !rights.list {
                    return Err(CoreError::MissingRight {
                        right: RIGHT_LIST.into(),
                    });
                }
                let raw = client
                    .list_documents(Some(DocumentFilter::Shared), false)
                    .await?;
                Ok(convert::documents(raw))
            }
        });
        Self::with_fetcher(bus, documents)
    }

    pub(crate) fn with_fetcher(bus: ChangeBus, documents: Fetcher<Document>) -> Self {
        Self {
            documents: Collection::new(
                Target::collection(Source::SharedDocuments, CollectionKind::Documents),
                bus.clone(),
                documents,
            ),
            bus,
        }
    }

    pub async fn sync(&self) -> Result<(), CoreError> {
        super::join_syncs(
            &self.bus,
            &Source::SharedDocuments,
            vec![(CollectionKind::Documents, self.documents.sync().boxed())],
        )
        .await
    }

    pub fn documents(&self) -> &Collection<Document> {
        &self.documents
    }
}
