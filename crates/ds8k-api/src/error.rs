use thiserror::Error;

/// Top-level error type for the `ds8k-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, the `{server: {status, code, message}}` envelope, and
/// payload decoding. `ds8k-core` maps these into reconciliation errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token request rejected (wrong credentials, locked account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A request was attempted before `login` succeeded.
    #[error("No active session -- login required")]
    NotLoggedIn,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Unsupported base URL: {0}")]
    UnsupportedBaseUrl(String),

    /// A resource locator was empty, which would address the whole
    /// collection instead of one object.
    #[error("Empty locator for {path}")]
    EmptyLocator { path: String },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Array API ───────────────────────────────────────────────────
    /// The requested object does not exist (HTTP 404).
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The array rejected the request parameters (HTTP 400).
    #[error("Bad request ({code}): {message}")]
    BadRequest { code: String, message: String },

    /// Any other non-success response, or a `server.status = failed`
    /// envelope returned with a success status code.
    #[error("DS8000 API error (HTTP {status}): {code} {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the array rejected the request parameters.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest { .. } | Self::Api { status: 400, .. })
    }

    /// Returns `true` if the session token was rejected.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::NotLoggedIn)
    }

    /// The array's own error code, if the response carried one.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::BadRequest { code, .. } | Self::Api { code, .. } if !code.is_empty() => {
                Some(code.as_str())
            }
            _ => None,
        }
    }
}
