// Workspace API HTTP client
//
// Wraps `reqwest::Client` with portal URL construction and response
// status mapping. Endpoint groups (documents, widgets) are implemented
// as inherent methods in sibling files.

use bytes::Bytes;
use reqwest::multipart::Form;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::{Error, RejectedRecord};
use crate::transport::TransportConfig;
use crate::workspace::models::Record;

/// Raw HTTP client for the portal's workspace API.
///
/// Returns decoded payloads or typed errors; it holds no state beyond the
/// session cookie inside the underlying `reqwest::Client`.
pub struct WorkspaceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl WorkspaceClient {
    /// Create a client from a `TransportConfig`, seeding its cookie jar
    /// with the session in `credentials`.
    ///
    /// `base_url` is the portal root (e.g. `https://ent.example.org`).
    pub fn new(
        base_url: Url,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport
            .clone()
            .with_session(&base_url, credentials)
            .build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The portal base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{path}`, keeping any path prefix the portal is
    /// mounted under.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Build `{base}/{path}/{segment}` with `segment` percent-encoded.
    pub(crate) fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, Error> {
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let resp = check_status(resp).await?;
        decode_json(resp).await
    }

    /// Send a GET request for a JSON array and decode each element on its own.
    pub(crate) async fn get_records<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Vec<Record<T>>, Error> {
        let values: Vec<serde_json::Value> = self.get_json(url).await?;
        Ok(values
            .into_iter()
            .enumerate()
            .map(|(index, value)| decode_record(index, value))
            .collect())
    }

    /// Send a GET request and return the raw body.
    pub(crate) async fn get_bytes(&self, url: Url) -> Result<Bytes, Error> {
        debug!("GET {} (binary)", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let resp = check_status(resp).await?;
        resp.bytes().await.map_err(Error::Transport)
    }

    /// Send a multipart POST and decode the JSON body.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        form: Form,
    ) -> Result<T, Error> {
        debug!("POST {} (multipart)", url);

        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(Error::Transport)?;
        let resp = check_status(resp).await?;
        decode_json(resp).await
    }
}

/// Map auth and error statuses to typed errors, passing successes through.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: "session expired or missing".into(),
        });
    }

    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Forbidden {
            message: format!("access denied to {}", resp.url().path()),
        });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Http {
            status: status.as_u16(),
            message: preview(&body).to_owned(),
        });
    }

    Ok(resp)
}

async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await.map_err(Error::Transport)?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

fn decode_record<T: DeserializeOwned>(index: usize, value: serde_json::Value) -> Record<T> {
    let id = value
        .get("_id")
        .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_owned));
    serde_json::from_value(value).map_err(|e| RejectedRecord {
        index,
        id,
        message: e.to_string(),
    })
}

/// First 200 bytes of `body`, cut on a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> WorkspaceClient {
        WorkspaceClient::with_client(reqwest::Client::new(), base.parse().unwrap())
    }

    #[test]
    fn url_keeps_mount_prefix() {
        let c = client("https://ent.example.org/portal/");
        assert_eq!(
            c.url("/workspace/documents").unwrap().as_str(),
            "https://ent.example.org/portal/workspace/documents"
        );
    }

    #[test]
    fn segment_is_percent_encoded() {
        let c = client("https://ent.example.org");
        let url = c.url_with_segment("workspace/documents", "Cours Maths_2024").unwrap();
        assert_eq!(url.path(), "/workspace/documents/Cours%20Maths_2024");
    }

    #[test]
    fn record_decode_failure_keeps_position_and_id() {
        let rejected = decode_record::<crate::RawDocument>(
            3,
            serde_json::json!({ "_id": 42, "metadata": { "filename": "a.txt" } }),
        )
        .unwrap_err();
        assert_eq!(rejected.index, 3);
        assert_eq!(rejected.id.as_deref(), Some("42"));
        assert!(rejected.to_string().starts_with("record #3 (42): "));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = preview(&body);
        assert!(cut.len() <= 200);
        assert!(cut.chars().all(|c| c == 'é'));
    }
}
