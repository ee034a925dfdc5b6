//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use medialib_config::ConfigError;
use medialib_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to portal at {url}")]
    #[diagnostic(
        code(medialib::connection_failed),
        help(
            "Check that the portal is reachable.\n\
             Reason: {reason}\n\
             Self-signed development portal? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(medialib::timeout),
        help("Increase the timeout with --timeout or check portal responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication / access ──────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(medialib::auth_failed),
        help(
            "Your portal session may have expired. Log in again and store the new id:\n\
             medialib config set-session <oneSessionId>"
        )
    )]
    AuthFailed { message: String },

    #[error("No session configured for profile '{profile}'")]
    #[diagnostic(
        code(medialib::no_session),
        help(
            "Store one with: medialib config set-session <oneSessionId>\n\
             Or set the MEDIALIB_SESSION environment variable."
        )
    )]
    NoSession { profile: String },

    #[error("Access denied: {message}")]
    #[diagnostic(code(medialib::forbidden))]
    Forbidden { message: String },

    #[error("Missing workflow right: {right}")]
    #[diagnostic(
        code(medialib::missing_right),
        help("Ask your portal administrator for this right, or set can_create / can_list in your profile.")
    )]
    MissingRight { right: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(medialib::not_found), help("Run: medialib {list_command}"))]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Sync of {target} failed: {reason}")]
    #[diagnostic(code(medialib::sync_failed))]
    SyncFailed { target: String, reason: String },

    #[error("{failed} of {total} uploads failed")]
    #[diagnostic(code(medialib::upload_failed))]
    UploadFailed { failed: usize, total: usize },

    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(medialib::api_error))]
    Api { message: String, status: Option<u16> },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(medialib::validation))]
    Validation { field: String, reason: String },

    #[error("No portal configured")]
    #[diagnostic(
        code(medialib::no_config),
        help(
            "Pass --portal, or create a profile:\n\
             medialib config set portal https://ent.example.org\n\
             Config file: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(medialib::config))]
    Config(ConfigError),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(medialib::render))]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(medialib::internal))]
    Internal(String),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoSession { .. } => exit_code::AUTH,
            Self::Forbidden { .. } | Self::MissingRight { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoSession { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Forbidden { message } => CliError::Forbidden { message },
            CoreError::MissingRight { right } => CliError::MissingRight { right },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: match entity_type.as_str() {
                    "folder" => "folders list".into(),
                    "widget" => "widgets".into(),
                    _ => "docs".into(),
                },
                resource_type: entity_type,
                identifier,
            },
            CoreError::SyncFailed { target, reason } => CliError::SyncFailed { target, reason },
            CoreError::MalformedPayload { entity, reason } => CliError::Api {
                message: format!("malformed {entity}: {reason}"),
                status: None,
            },
            CoreError::Api { message, status } => CliError::Api { message, status },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
