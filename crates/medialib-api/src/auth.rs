use secrecy::{ExposeSecret, SecretString};

/// Name of the portal's session cookie.
pub const SESSION_COOKIE: &str = "oneSessionId";

/// Credentials for talking to the portal.
///
/// The workspace API is cookie-authenticated: the session id obtained by
/// logging into the portal is replayed on every request.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// No session. Only public endpoints will answer.
    Anonymous,
    /// An existing portal session.
    Session { session_id: SecretString },
}

impl Credentials {
    pub fn session(session_id: impl Into<String>) -> Self {
        Self::Session {
            session_id: SecretString::from(session_id.into()),
        }
    }

    /// The `name=value` cookie string to seed the jar with, if any.
    pub(crate) fn cookie(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Session { session_id } => {
                Some(format!("{SESSION_COOKIE}={}", session_id.expose_secret()))
            }
        }
    }
}
