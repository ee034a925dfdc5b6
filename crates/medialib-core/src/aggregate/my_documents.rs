use std::sync::Arc;

use arc_swap::ArcSwap;
use futures_util::FutureExt;
use medialib_api::{DocumentFilter, WorkspaceClient};

use crate::bus::{ChangeBus, CollectionKind, Source, Target};
use crate::config::{RIGHT_CREATE, WorkflowRights};
use crate::convert;
use crate::error::CoreError;
use crate::model::{Document, Folder};
use crate::store::{Collection, Fetcher, fetcher};

pub(crate) type FolderCache = Arc<ArcSwap<Vec<Arc<Folder>>>>;

/// The user's own documents and top-level folders.
///
/// The folder sync lists every owner folder once; the flat list is kept
/// here so folder views can find their children without another request.
pub struct MyDocuments {
    folders: Collection<Folder>,
    documents: Collection<Document>,
    all_folders: FolderCache,
    bus: ChangeBus,
}

impl MyDocuments {
    pub(crate) fn new(client: Arc<WorkspaceClient>, rights: WorkflowRights, bus: ChangeBus) -> Self {
        let cache: FolderCache = Arc::new(ArcSwap::from_pointee(Vec::new()));

        let folders = {
            let client = Arc::clone(&client);
            let cache = Arc::clone(&cache);
            fetcher(move || {
                let client = Arc::clone(&client);
                let cache = Arc::clone(&cache);
                async move {
                    if !rights.create {
                        return Err(CoreError::MissingRight {
                            right: RIGHT_CREATE.into(),
                        });
                    }
                    let raw = client.list_folders(Some(DocumentFilter::Owner)).await?;
                    Ok(cache_folders(&cache, convert::folders(raw)))
                }
            })
        };

        let documents = fetcher(move || {
            let client = Arc::clone(&client);
            async move {
                let raw = client
                    .list_documents(Some(DocumentFilter::Owner), true)
                    .await?;
                Ok(convert::documents(raw))
            }
        });

        Self::with_fetchers(bus, cache, folders, documents)
    }

    pub(crate) fn with_fetchers(
        bus: ChangeBus,
        all_folders: FolderCache,
        folders: Fetcher<Folder>,
        documents: Fetcher<Document>,
    ) -> Self {
        let source = Source::MyDocuments;
        Self {
            folders: Collection::new(
                Target::collection(source.clone(), CollectionKind::Folders),
                bus.clone(),
                folders,
            ),
            documents: Collection::new(
                Target::collection(source, CollectionKind::Documents),
                bus.clone(),
                documents,
            ),
            all_folders,
            bus,
        }
    }

    /// Sync folders and documents concurrently; one aggregate event at the end.
    pub async fn sync(&self) -> Result<(), CoreError> {
        super::join_syncs(
            &self.bus,
            &Source::MyDocuments,
            vec![
                (CollectionKind::Folders, self.folders.sync().boxed()),
                (CollectionKind::Documents, self.documents.sync().boxed()),
            ],
        )
        .await
    }

    /// Top-level folders.
    pub fn folders(&self) -> &Collection<Folder> {
        &self.folders
    }

    pub fn documents(&self) -> &Collection<Document> {
        &self.documents
    }

    /// Every owner folder from the last folder sync, at any depth.
    pub fn all_folders(&self) -> Arc<Vec<Arc<Folder>>> {
        self.all_folders.load_full()
    }

    pub fn folder_by_path(&self, path: &str) -> Option<Arc<Folder>> {
        self.all_folders
            .load()
            .iter()
            .find(|f| f.path == path)
            .cloned()
    }

    pub(crate) fn folder_cache(&self) -> FolderCache {
        Arc::clone(&self.all_folders)
    }
}

/// Store the full list and return the top-level part.
pub(crate) fn cache_folders(cache: &ArcSwap<Vec<Arc<Folder>>>, all: Vec<Folder>) -> Vec<Folder> {
    let top = all.iter().filter(|f| f.is_top_level()).cloned().collect();
    cache.store(Arc::new(all.into_iter().map(Arc::new).collect()));
    top
}
