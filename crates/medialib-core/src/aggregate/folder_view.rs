use std::sync::Arc;

use futures_util::FutureExt;
use medialib_api::{DocumentFilter, WorkspaceClient};
use tracing::debug;

use super::my_documents::FolderCache;
use crate::bus::{ChangeBus, ChangeEvent, CollectionKind, Source, Target};
use crate::convert;
use crate::error::CoreError;
use crate::model::{Document, Folder};
use crate::store::{Collection, Fetcher, fetcher};

/// A folder the user navigated into: its sub-folders and its documents.
///
/// Sub-folders come from the owner folder list cached by `MyDocuments`;
/// only the documents need a request of their own.
pub struct FolderView {
    folder: Arc<Folder>,
    source: Source,
    folders: Collection<Folder>,
    documents: Collection<Document>,
    bus: ChangeBus,
}

impl FolderView {
    pub(crate) fn new(
        folder: Arc<Folder>,
        cache: FolderCache,
        client: Arc<WorkspaceClient>,
        bus: ChangeBus,
    ) -> Self {
        let parent = folder.path.clone();
        let folders = fetcher(move || {
            let children = child_folders(&cache, &parent);
            async move { Ok(children) }
        });

        let path = folder.path.clone();
        let documents = fetcher(move || {
            let client = Arc::clone(&client);
            let path = path.clone();
            async move {
                let raw = client
                    .list_folder_documents(&path, Some(DocumentFilter::Owner), true)
                    .await?;
                Ok(convert::documents(raw))
            }
        });

        Self::with_fetchers(folder, bus, folders, documents)
    }

    pub(crate) fn with_fetchers(
        folder: Arc<Folder>,
        bus: ChangeBus,
        folders: Fetcher<Folder>,
        documents: Fetcher<Document>,
    ) -> Self {
        let source = Source::Folder(folder.path.clone());
        Self {
            folders: Collection::new(
                Target::collection(source.clone(), CollectionKind::Folders),
                bus.clone(),
                folders,
            ),
            documents: Collection::new(
                Target::collection(source.clone(), CollectionKind::Documents),
                bus.clone(),
                documents,
            ),
            folder,
            source,
            bus,
        }
    }

    /// Sync sub-folders and documents; the view's event fires once both settled.
    pub async fn sync(&self) -> Result<(), CoreError> {
        super::join_syncs(
            &self.bus,
            &self.source,
            vec![
                (CollectionKind::Folders, self.folders.sync().boxed()),
                (CollectionKind::Documents, self.documents.sync().boxed()),
            ],
        )
        .await
    }

    /// Release the sub-folder list when navigation leaves this folder.
    pub fn close(&self) {
        debug!(folder = %self.folder.path, "closing folder view");
        self.folders.clear();
        self.bus.trigger(ChangeEvent::Changed(Target::collection(
            self.source.clone(),
            CollectionKind::Folders,
        )));
    }

    pub fn folder(&self) -> &Arc<Folder> {
        &self.folder
    }

    pub fn path(&self) -> &str {
        &self.folder.path
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Sub-folders at any depth below this folder.
    pub fn folders(&self) -> &Collection<Folder> {
        &self.folders
    }

    pub fn documents(&self) -> &Collection<Document> {
        &self.documents
    }
}

/// Every cached folder below `parent`, in cache order.
fn child_folders(cache: &FolderCache, parent: &str) -> Vec<Folder> {
    cache
        .load()
        .iter()
        .filter(|f| f.is_within(parent))
        .map(|f| Folder::clone(f))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use arc_swap::ArcSwap;
    use medialib_api::{RawDocument, RawFolder};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;

    fn folder(path: &str) -> Folder {
        let raw: RawFolder = serde_json::from_value(json!({ "_id": path, "folder": path })).unwrap();
        Folder::try_from(raw).unwrap()
    }

    fn document(id: &str) -> Document {
        let raw: RawDocument = serde_json::from_value(json!({
            "_id": id,
            "metadata": { "filename": format!("{id}.pdf"), "content-type": "application/pdf" }
        }))
        .unwrap();
        Document::try_from(raw).unwrap()
    }

    fn gated<T: Clone + Send + Sync + 'static>(gate: &Arc<Notify>, items: Vec<T>) -> Fetcher<T> {
        let gate = Arc::clone(gate);
        fetcher(move || {
            let gate = Arc::clone(&gate);
            let items = items.clone();
            async move {
                gate.notified().await;
                Ok(items)
            }
        })
    }

    fn event_log(bus: &ChangeBus) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        bus.on_any(move |e| sink.lock().unwrap().push(e.to_string()));
        log
    }

    /// Release the two fetches in the given order and return the event log.
    async fn sync_in_order(first: CollectionKind) -> Vec<String> {
        let bus = ChangeBus::new();
        let log = event_log(&bus);
        let folders_gate = Arc::new(Notify::new());
        let documents_gate = Arc::new(Notify::new());
        let view = FolderView::with_fetchers(
            Arc::new(folder("Cours")),
            bus,
            gated(&folders_gate, vec![folder("Cours_Maths")]),
            gated(&documents_gate, vec![document("d1")]),
        );

        let (early, late) = if first == CollectionKind::Folders {
            (&folders_gate, &documents_gate)
        } else {
            (&documents_gate, &folders_gate)
        };
        let release = async {
            while !(view.folders().state().is_fetching() && view.documents().state().is_fetching()) {
                tokio::task::yield_now().await;
            }
            early.notify_one();
            while log.lock().unwrap().is_empty() {
                tokio::task::yield_now().await;
            }
            // Only the first collection has settled so far.
            assert_eq!(log.lock().unwrap().len(), 1);
            late.notify_one();
        };

        let (result, ()) = tokio::time::timeout(Duration::from_secs(5), async {
            tokio::join!(view.sync(), release)
        })
        .await
        .unwrap();
        result.unwrap();

        log.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn aggregate_fires_once_after_folders_then_documents() {
        assert_eq!(
            sync_in_order(CollectionKind::Folders).await,
            vec![
                "folder[Cours].folders.sync",
                "folder[Cours].documents.sync",
                "folder[Cours].sync",
            ]
        );
    }

    #[tokio::test]
    async fn aggregate_fires_once_after_documents_then_folders() {
        assert_eq!(
            sync_in_order(CollectionKind::Documents).await,
            vec![
                "folder[Cours].documents.sync",
                "folder[Cours].folders.sync",
                "folder[Cours].sync",
            ]
        );
    }

    #[test]
    fn children_come_from_the_cached_folder_list() {
        let cache: FolderCache = Arc::new(ArcSwap::from_pointee(
            ["Cours", "Cours_Maths", "Cours_Maths_2024", "Perso", "Perso_Photos"]
                .into_iter()
                .map(|p| Arc::new(folder(p)))
                .collect(),
        ));
        let paths: Vec<String> = child_folders(&cache, "Cours")
            .into_iter()
            .map(|f| f.path)
            .collect();
        assert_eq!(paths, vec!["Cours_Maths", "Cours_Maths_2024"]);
    }

    #[tokio::test]
    async fn close_releases_sub_folders() {
        let bus = ChangeBus::new();
        let view = FolderView::with_fetchers(
            Arc::new(folder("Cours")),
            bus.clone(),
            fetcher(|| async { Ok(vec![folder("Cours_Maths")]) }),
            fetcher(|| async { Ok(vec![document("d1")]) }),
        );
        view.sync().await.unwrap();
        let log = event_log(&bus);

        view.close();
        assert!(view.folders().is_empty());
        assert_eq!(view.documents().len(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["folder[Cours].folders.change"]);
    }
}
