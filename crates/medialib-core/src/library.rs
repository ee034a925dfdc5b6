// ── Session context ──
//
// One `MediaLibrary` per user session. It owns the aggregates, the change
// bus they announce on, the opened folder and the selection, and is handed
// by reference to whichever front end needs them.

use std::sync::{Arc, Mutex, PoisonError};

use medialib_api::WorkspaceClient;
use strum::{Display, EnumString, IntoStaticStr};
use tracing::{debug, info};

use crate::aggregate::{AppDocuments, FolderView, MyDocuments, SharedDocuments, Widgets};
use crate::bus::{ChangeBus, Source};
use crate::config::{RIGHT_CREATE, RIGHT_LIST, SessionConfig, WorkflowRights};
use crate::error::CoreError;
use crate::model::{Document, Folder};
use crate::selection::Selection;
use crate::stream::{DocumentQuery, SearchFilter};

/// Which document source a consumer is browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SourceKind {
    /// Protected copies owned by the media library.
    App,
    /// The user's own documents.
    Mine,
    /// Documents shared with the user.
    Shared,
}

impl SourceKind {
    pub fn source(self) -> Source {
        match self {
            Self::App => Source::AppDocuments,
            Self::Mine => Source::MyDocuments,
            Self::Shared => Source::SharedDocuments,
        }
    }
}

pub struct MediaLibrary {
    pub(crate) client: Arc<WorkspaceClient>,
    bus: ChangeBus,
    rights: WorkflowRights,
    my_documents: MyDocuments,
    shared_documents: SharedDocuments,
    app_documents: AppDocuments,
    widgets: Widgets,
    opened: Mutex<Option<Arc<FolderView>>>,
    selection: Selection,
}

impl MediaLibrary {
    /// Open a session against the configured portal. No request is sent
    /// until something is synced.
    pub fn new(config: SessionConfig) -> Result<Self, CoreError> {
        let client = WorkspaceClient::new(
            config.url.clone(),
            &config.credentials(),
            &config.transport(),
        )?;
        Ok(Self::with_client(client, &config))
    }

    /// Build a session around an existing client.
    pub fn with_client(client: WorkspaceClient, config: &SessionConfig) -> Self {
        info!(portal = %client.base_url(), rights = ?config.rights, "media library session");
        let client = Arc::new(client);
        let bus = ChangeBus::new();
        let rights = config.rights;

        Self {
            my_documents: MyDocuments::new(Arc::clone(&client), rights, bus.clone()),
            shared_documents: SharedDocuments::new(Arc::clone(&client), rights, bus.clone()),
            app_documents: AppDocuments::new(Arc::clone(&client), bus.clone()),
            widgets: Widgets::new(
                Arc::clone(&client),
                config.widget_allowlist.clone(),
                bus.clone(),
            ),
            client,
            bus,
            rights,
            opened: Mutex::new(None),
            selection: Selection::new(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    pub fn rights(&self) -> WorkflowRights {
        self.rights
    }

    pub fn my_documents(&self) -> &MyDocuments {
        &self.my_documents
    }

    pub fn shared_documents(&self) -> &SharedDocuments {
        &self.shared_documents
    }

    pub fn app_documents(&self) -> &AppDocuments {
        &self.app_documents
    }

    pub fn widgets(&self) -> &Widgets {
        &self.widgets
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // ── Sources ──────────────────────────────────────────────────────

    /// Source to show first: app documents for users who may create
    /// documents, shared ones for users who may only list them.
    pub fn default_source(&self) -> Result<SourceKind, CoreError> {
        if self.rights.create {
            Ok(SourceKind::App)
        } else if self.rights.list {
            Ok(SourceKind::Shared)
        } else {
            Err(CoreError::MissingRight {
                right: format!("{RIGHT_CREATE} or {RIGHT_LIST}"),
            })
        }
    }

    pub async fn sync_source(&self, kind: SourceKind) -> Result<(), CoreError> {
        debug!(source = %kind, "syncing source");
        match kind {
            SourceKind::App => self.app_documents.sync().await,
            SourceKind::Mine => self.my_documents.sync().await,
            SourceKind::Shared => self.shared_documents.sync().await,
        }
    }

    pub fn documents(&self, kind: SourceKind) -> Arc<Vec<Arc<Document>>> {
        match kind {
            SourceKind::App => self.app_documents.documents().snapshot(),
            SourceKind::Mine => self.my_documents.documents().snapshot(),
            SourceKind::Shared => self.shared_documents.documents().snapshot(),
        }
    }

    /// Top-level folders of a source. Only `Mine` has folders.
    pub fn folders(&self, kind: SourceKind) -> Arc<Vec<Arc<Folder>>> {
        match kind {
            SourceKind::Mine => self.my_documents.folders().snapshot(),
            SourceKind::App | SourceKind::Shared => Arc::new(Vec::new()),
        }
    }

    pub fn search(&self, kind: SourceKind, query: &DocumentQuery) -> Vec<Arc<Document>> {
        query.apply(&self.documents(kind))
    }

    pub fn search_folders(&self, kind: SourceKind, filter: &SearchFilter) -> Vec<Arc<Folder>> {
        filter.apply(&self.folders(kind))
    }

    // ── Folder navigation ────────────────────────────────────────────

    /// Open `folder` and sync it.
    ///
    /// The previously opened folder is closed unless `folder` lies inside
    /// it. Child folders come from the owner folder list, so `MyDocuments`
    /// should have synced first.
    pub async fn open_folder(&self, folder: Arc<Folder>) -> Result<Arc<FolderView>, CoreError> {
        let view = Arc::new(FolderView::new(
            folder,
            self.my_documents.folder_cache(),
            Arc::clone(&self.client),
            self.bus.clone(),
        ));

        let previous = self
            .opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Arc::clone(&view));
        if let Some(previous) = previous {
            if !view.folder().is_within(previous.path()) {
                previous.close();
            }
        }

        debug!(folder = %view.path(), "opening folder");
        view.sync().await?;
        Ok(view)
    }

    /// Open a folder by path, looked up in the owner folder list.
    pub async fn open_folder_path(&self, path: &str) -> Result<Arc<FolderView>, CoreError> {
        let folder = self
            .my_documents
            .folder_by_path(path)
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "folder".into(),
                identifier: path.into(),
            })?;
        self.open_folder(folder).await
    }

    pub fn opened_folder(&self) -> Option<Arc<FolderView>> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Close and forget the opened folder, if any.
    pub fn close_folder(&self) {
        let previous = self
            .opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(view) = previous {
            view.close();
        }
    }
}
