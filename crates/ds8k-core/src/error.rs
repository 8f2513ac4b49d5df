// ── Core error types ──
//
// User-facing errors from ds8k-core. Callers see what went wrong with
// which object, not HTTP status codes. The `From<ds8k_api::Error>` impl
// translates transport-layer errors into these variants.

use thiserror::Error;

use crate::outcome::ItemMessage;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    /// A required parameter is missing or malformed. Raised before any
    /// network call is made.
    #[error("Invalid parameters: {message}")]
    Validation { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to DS8000 at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── State errors ─────────────────────────────────────────────────
    #[error("The {kind} {locator} does not exist on the DS8000")]
    NotFound { kind: String, locator: String },

    /// The array holds an object that contradicts the desired state in
    /// a way that must not be corrected automatically.
    #[error("{message}")]
    Conflict { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    /// A mutating call failed; `message` is the array's own text.
    #[error("{context}. ERR: {message}")]
    OperationFailed { context: String, message: String },

    /// One or more items of a batch request failed.
    #[error("{} of the requested objects failed: {}", items.len(), join_items(items))]
    BatchFailed { items: Vec<ItemMessage> },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("DS8000 API error: {message}")]
    Api {
        message: String,
        /// The array's error code, e.g. `BE7A0029`.
        code: Option<String>,
        status: Option<u16>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_items(items: &[ItemMessage]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(kind: &str, locator: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.to_owned(),
            locator: locator.into(),
        }
    }

    /// Wrap a failed mutating call with a description of what was attempted.
    pub fn operation(context: impl Into<String>, err: &ds8k_api::Error) -> Self {
        Self::OperationFailed {
            context: context.into(),
            message: api_message(err),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// The array's `code message` text where available, else the error display.
pub(crate) fn api_message(err: &ds8k_api::Error) -> String {
    match err {
        ds8k_api::Error::BadRequest { code, message }
        | ds8k_api::Error::Api { code, message, .. } => {
            format!("{code} {message}").trim().to_owned()
        }
        ds8k_api::Error::NotFound { message } | ds8k_api::Error::Authentication { message } => {
            message.clone()
        }
        other => other.to_string(),
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ds8k_api::Error> for CoreError {
    fn from(err: ds8k_api::Error) -> Self {
        match err {
            ds8k_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            ds8k_api::Error::NotLoggedIn => CoreError::AuthenticationFailed {
                message: "No active session -- login required".into(),
            },
            ds8k_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: "request timed out".into(),
                    }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        kind: "resource".into(),
                        locator: e.url().map(|u| u.path().to_string()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ds8k_api::Error::InvalidUrl(e) => CoreError::Validation {
                message: format!("invalid URL: {e}"),
            },
            ds8k_api::Error::EmptyLocator { path } => CoreError::Validation {
                message: format!("empty resource locator in {path}"),
            },
            ds8k_api::Error::UnsupportedBaseUrl(url) => CoreError::Validation {
                message: format!("unsupported base URL: {url}"),
            },
            ds8k_api::Error::Tls(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            ds8k_api::Error::NotFound { message } => CoreError::NotFound {
                kind: "resource".into(),
                locator: message,
            },
            ds8k_api::Error::BadRequest { code, message } => CoreError::Api {
                message,
                code: Some(code).filter(|c| !c.is_empty()),
                status: Some(400),
            },
            ds8k_api::Error::Api {
                status,
                code,
                message,
            } => CoreError::Api {
                message,
                code: Some(code).filter(|c| !c.is_empty()),
                status: Some(status),
            },
            ds8k_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
