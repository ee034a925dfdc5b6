// medialib-api: Async Rust client for the portal workspace API

pub mod auth;
pub mod error;
pub mod transport;
pub mod workspace;

pub use auth::{Credentials, SESSION_COOKIE};
pub use error::{Error, RejectedRecord};
pub use transport::{TlsMode, TransportConfig};
pub use workspace::client::WorkspaceClient;
pub use workspace::models::{
    DocumentFilter, FileUpload, RawDocument, RawFolder, RawMetadata, RawWidget, Record, Thumbnail,
    UploadOptions, MEDIA_LIBRARY_THUMBNAILS,
};
