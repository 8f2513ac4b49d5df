// DS8000 REST client
//
// Wraps `reqwest::Client` with token handling, URL construction under
// `/api/v1/`, and unwrapping of the `{server, data: {<kind>: [...]}}`
// envelope. Endpoint groups (hosts, volumes, ...) are implemented as
// inherent methods in `crate::endpoints` so this module stays focused
// on transport mechanics.

use chrono::Utc;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{API_PREFIX, AUTH_TOKEN_HEADER, Credentials, Scheme, Session};
use crate::error::Error;
use crate::models::{RequestBody, ServerStatus};
use crate::transport::TransportConfig;

// ── Envelope ─────────────────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct Envelope {
    #[serde(default)]
    server: Option<ServerStatus>,
    #[serde(default)]
    data: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Default)]
struct SessionState {
    credentials: Option<Credentials>,
    session: Option<Session>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the DS8000 management REST API.
///
/// Holds the session token obtained by [`login`](Self::login) and renews
/// it transparently once it expires or sits idle past the array's limit.
pub struct Ds8kClient {
    http: reqwest::Client,
    base_url: Url,
    state: Mutex<SessionState>,
}

impl Ds8kClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL such as `https://hmc:8452`.
    ///
    /// `/api/v1/` is appended unless the URL already ends with it.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            state: Mutex::new(SessionState::default()),
        })
    }

    /// `{scheme}://{host}:{port}/api/v1/`
    pub fn base_url_for(scheme: Scheme, host: &str, port: u16) -> Result<Url, Error> {
        let host = host.trim();
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let url = Url::parse(&format!("{scheme}://{host}:{port}{API_PREFIX}/"))?;
        Ok(url)
    }

    fn normalize_base_url(mut url: Url) -> Result<Url, Error> {
        if url.cannot_be_a_base() {
            return Err(Error::UnsupportedBaseUrl(url.to_string()));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with(API_PREFIX) {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}{API_PREFIX}/"));
        }
        Ok(url)
    }

    /// The API root, always ending in `/api/v1/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Session handling ─────────────────────────────────────────────

    pub(crate) async fn install_session(&self, credentials: Credentials, session: Session) {
        let mut state = self.state.lock().await;
        state.credentials = Some(credentials);
        state.session = Some(session);
    }

    /// Whether a token has been obtained.
    pub async fn is_logged_in(&self) -> bool {
        self.state.lock().await.session.is_some()
    }

    /// Current token, renewing it first if it has lapsed.
    async fn token(&self) -> Result<SecretString, Error> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        if let Some(session) = state.session.as_mut() {
            if !session.is_stale(now) {
                session.last_used = now;
                return Ok(session.token.clone());
            }
            trace!("session token lapsed");
        }

        let Some(credentials) = state.credentials.clone() else {
            return Err(Error::NotLoggedIn);
        };
        debug!(username = %credentials.username, "renewing session token");
        let session = self.request_token(&credentials).await?;
        let token = session.token.clone();
        state.session = Some(session);
        Ok(token)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the API root. Segments are percent-encoded
    /// and must not be blank.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::EmptyLocator {
                path: segments.join("/"),
            });
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::UnsupportedBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated request. Never retried.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, Error> {
        let token = self.token().await?;
        debug!("{method} {url}");

        let mut builder = self
            .http
            .request(method, url)
            .header(AUTH_TOKEN_HEADER, token.expose_secret());
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }

    fn wrap_params<P: Serialize>(params: &P) -> Result<serde_json::Value, Error> {
        serde_json::to_value(RequestBody::new(params)).map_err(|e| Error::Deserialization {
            message: format!("failed to encode request: {e}"),
            body: String::new(),
        })
    }

    /// GET a collection and return the `data.<kind>` list.
    pub(crate) async fn get_kind<T: DeserializeOwned>(
        &self,
        url: Url,
        kind: &str,
    ) -> Result<Vec<T>, Error> {
        let resp = self.send(Method::GET, url, None).await?;
        self.parse_envelope(resp, kind).await
    }

    /// GET a single object (`data.<kind>[0]`).
    pub(crate) async fn get_one<T: DeserializeOwned>(
        &self,
        url: Url,
        kind: &str,
    ) -> Result<T, Error> {
        let what = url.path().to_owned();
        self.get_kind(url, kind)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                message: format!("{what} returned no {kind}"),
            })
    }

    /// POST `{"request": {"params": ...}}` and return `data.<kind>`.
    pub(crate) async fn post_kind<T: DeserializeOwned, P: Serialize>(
        &self,
        url: Url,
        params: &P,
        kind: &str,
    ) -> Result<Vec<T>, Error> {
        let body = Self::wrap_params(params)?;
        let resp = self.send(Method::POST, url, Some(&body)).await?;
        self.parse_envelope(resp, kind).await
    }

    /// POST and discard any returned representation.
    pub(crate) async fn post_empty<P: Serialize>(&self, url: Url, params: &P) -> Result<(), Error> {
        let body = Self::wrap_params(params)?;
        let resp = self.send(Method::POST, url, Some(&body)).await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn put<P: Serialize>(&self, url: Url, params: &P) -> Result<(), Error> {
        let body = Self::wrap_params(params)?;
        let resp = self.send(Method::PUT, url, Some(&body)).await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        let resp = self.send(Method::DELETE, url, None).await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        kind: &str,
    ) -> Result<Vec<T>, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        let envelope: Envelope = decode(&body)?;
        check_server(status, envelope.server.as_ref())?;

        let Some(items) = envelope.data.and_then(|mut data| data.remove(kind)) else {
            trace!(kind, "response carried no data");
            return Ok(Vec::new());
        };

        serde_json::from_value(items).map_err(|e| Error::Deserialization {
            message: format!("{kind}: {e}"),
            body,
        })
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(());
        }
        // Tolerate bodies that are not envelopes; only an explicit
        // failed status is an error.
        if let Ok(envelope) = serde_json::from_str::<Envelope>(&body) {
            check_server(status, envelope.server.as_ref())?;
        }
        Ok(())
    }
}

// ── Free helpers ─────────────────────────────────────────────────────

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

/// A 2xx response can still carry `server.status = "failed"`.
fn check_server(status: StatusCode, server: Option<&ServerStatus>) -> Result<(), Error> {
    match server {
        Some(server) if server.is_failed() => Err(Error::Api {
            status: status.as_u16(),
            code: server.code.clone(),
            message: server.message.clone(),
        }),
        _ => Ok(()),
    }
}

pub(crate) async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let server = serde_json::from_str::<Envelope>(&raw)
        .ok()
        .and_then(|env| env.server);

    let (code, message) = match server {
        Some(s) => (s.code, s.message),
        None if raw.is_empty() => (String::new(), status.to_string()),
        None => (String::new(), raw.chars().take(200).collect()),
    };

    match status {
        StatusCode::UNAUTHORIZED => Error::Authentication { message },
        StatusCode::NOT_FOUND => Error::NotFound { message },
        StatusCode::BAD_REQUEST => Error::BadRequest { code, message },
        _ => Error::Api {
            status: status.as_u16(),
            code,
            message,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_api_prefix() {
        let client =
            Ds8kClient::with_client(reqwest::Client::new(), Url::parse("https://hmc:8452").unwrap())
                .unwrap();
        assert_eq!(client.base_url().as_str(), "https://hmc:8452/api/v1/");
    }

    #[test]
    fn base_url_prefix_not_doubled() {
        let client = Ds8kClient::with_client(
            reqwest::Client::new(),
            Url::parse("https://hmc:8452/api/v1").unwrap(),
        )
        .unwrap();
        assert_eq!(client.base_url().as_str(), "https://hmc:8452/api/v1/");
    }

    #[test]
    fn base_url_for_brackets_ipv6() {
        let url = Ds8kClient::base_url_for(Scheme::Https, "fd00::10", 8452).unwrap();
        assert_eq!(url.as_str(), "https://[fd00::10]:8452/api/v1/");
    }

    #[test]
    fn url_segments_are_encoded() {
        let client =
            Ds8kClient::with_client(reqwest::Client::new(), Url::parse("https://hmc:8452").unwrap())
                .unwrap();
        let url = client.url(&["hosts", "my host", "mappings"]).unwrap();
        assert_eq!(url.path(), "/api/v1/hosts/my%20host/mappings");
    }
}
