//! Reactive resource model between `medialib-api` and UI consumers.
//!
//! This crate owns the document/folder domain model and the protocol that
//! keeps it in sync with the portal's workspace API:
//!
//! - **[`MediaLibrary`]**: Session-scoped context. Built once per user
//!   session from a [`SessionConfig`] and handed to every consumer; owns the
//!   [`MyDocuments`], [`SharedDocuments`], [`AppDocuments`] and [`Widgets`]
//!   aggregates plus the currently opened [`FolderView`].
//!
//! - **[`Collection<T>`]**: Ordered, de-duplicated entity set with a
//!   [`SyncState`] machine. `sync()` issues one fetch, replaces the contents
//!   wholesale and announces the outcome; a `sync()` while fetching joins the
//!   in-flight request instead of racing it.
//!
//! - **Aggregates**: Compose their collections' syncs through a
//!   [`JoinBarrier`]: the aggregate event fires once, after every collection
//!   settled, as either `Synced` or `SyncFailed`.
//!
//! - **[`ChangeBus`]**: Typed publish/subscribe for [`ChangeEvent`]s, with
//!   synchronous callbacks and a `broadcast` receiver for async consumers.
//!
//! - **Domain model** ([`model`]): [`Document`] (with derived title, role
//!   and creation time), [`Folder`], [`Widget`], keyed by [`EntityId`].

pub mod aggregate;
pub mod bus;
pub mod config;
pub mod convert;
pub mod error;
pub mod library;
pub mod model;
pub mod selection;
pub mod store;
pub mod stream;
pub mod text;
pub mod upload;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{AppDocuments, FolderView, MyDocuments, SharedDocuments, Widgets};
pub use bus::{ChangeBus, ChangeEvent, CollectionKind, Source, SubscriptionId, Target};
pub use config::{SessionConfig, TlsVerification, WorkflowRights};
pub use error::CoreError;
pub use library::{MediaLibrary, SourceKind};
pub use selection::Selection;
pub use store::{BarrierOutcome, Collection, JoinBarrier, SyncState};
pub use stream::{DocumentQuery, EntityStream, SearchFilter};

// Re-export model types at the crate root for ergonomics.
pub use model::{Document, Entity, EntityId, Folder, Role, Widget};

// Upload inputs come straight from the transport crate.
pub use medialib_api::FileUpload;
