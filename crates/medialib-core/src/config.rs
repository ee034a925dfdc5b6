// ── Runtime session configuration ──
//
// These types describe *how* to reach the portal and what the session is
// allowed to do. They carry credential data but never touch disk: the
// CLI (or any other front end) builds a `SessionConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use medialib_api::{Credentials, TlsMode, TransportConfig};

/// Workflow right gating the owner's documents and folders.
pub const RIGHT_CREATE: &str = "workspace.documents.create";
/// Workflow right gating documents shared with the user.
pub const RIGHT_LIST: &str = "workspace.documents.list";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development portals).
    DangerAcceptInvalid,
}

/// The session's workspace workflow rights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowRights {
    /// `workspace.documents.create`: may browse and upload own documents.
    pub create: bool,
    /// `workspace.documents.list`: may browse documents shared with them.
    pub list: bool,
}

impl WorkflowRights {
    pub const ALL: Self = Self {
        create: true,
        list: true,
    };

    pub const NONE: Self = Self {
        create: false,
        list: false,
    };
}

/// Configuration for one user session against one portal.
///
/// Built by the front end, passed to `MediaLibrary` -- core never reads
/// config files.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Portal root URL (e.g., `https://ent.example.org`).
    pub url: Url,
    /// Portal session id, replayed as the session cookie.
    pub session: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Workflow rights of the session.
    pub rights: WorkflowRights,
    /// Widget names to keep; `None` keeps every widget.
    pub widget_allowlist: Option<Vec<String>>,
}

impl SessionConfig {
    /// A session against `url` with no credentials and full rights.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            session: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            rights: WorkflowRights::ALL,
            widget_allowlist: None,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            cookie_jar: None,
        }
    }

    pub(crate) fn credentials(&self) -> Credentials {
        match &self.session {
            Some(session_id) => Credentials::Session {
                session_id: session_id.clone(),
            },
            None => Credentials::Anonymous,
        }
    }
}
