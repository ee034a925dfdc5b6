// ── Core error types ──
//
// User-facing errors from medialib-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<medialib_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach portal at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Access errors ────────────────────────────────────────────────
    #[error("Access denied: {message}")]
    Forbidden { message: String },

    #[error("Missing workflow right: {right}")]
    MissingRight { right: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Malformed {entity} payload: {reason}")]
    MalformedPayload { entity: String, reason: String },

    // ── Sync errors ──────────────────────────────────────────────────
    #[error("Sync of {target} failed: {reason}")]
    SyncFailed { target: String, reason: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn malformed(entity: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<medialib_api::Error> for CoreError {
    fn from(err: medialib_api::Error) -> Self {
        match err {
            medialib_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            medialib_api::Error::Forbidden { message } => CoreError::Forbidden { message },
            medialib_api::Error::Transport(ref e) => {
                if e.is_builder() {
                    CoreError::Internal(format!("Request could not be built: {e}"))
                } else if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            medialib_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            medialib_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            medialib_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            medialib_api::Error::Http { status: 404, message } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            medialib_api::Error::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            medialib_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
