//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use ds8k_config::ConfigError;
use ds8k_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the DS8000 at {url}")]
    #[diagnostic(
        code(ds8k::connection_failed),
        help(
            "{reason}\n\
             Check the hostname and port (default 8452).\n\
             For a self-signed HMC certificate try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(ds8k::auth_failed),
        help("Verify the user name and password.\nRun: ds8k config set-password --profile {profile}")
    )]
    AuthFailed { profile: String, message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(ds8k::no_credentials),
        help(
            "Store one with: ds8k config set-password --profile {profile}\n\
             Or set the DS8K_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("The {kind} {locator} does not exist on the DS8000")]
    #[diagnostic(code(ds8k::not_found), help("Run: ds8k {list_command}"))]
    NotFound {
        kind: String,
        locator: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(ds8k::conflict))]
    Conflict { message: String },

    // ── Array operations ─────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(ds8k::operation_failed))]
    OperationFailed { message: String },

    #[error("{message}")]
    #[diagnostic(code(ds8k::batch_failed), help("{details}"))]
    BatchFailed { message: String, details: String },

    #[error("DS8000 API error: {message}")]
    #[diagnostic(code(ds8k::api_error), help("Array error code: {code}"))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ds8k::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ds8k::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ds8k config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No array configured")]
    #[diagnostic(
        code(ds8k::no_config),
        help(
            "Create a profile with: ds8k config init\n\
             Or pass --hostname and --username. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(ds8k::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {0}")]
    #[diagnostic(code(ds8k::keyring))]
    Keyring(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(ds8k::render))]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(ds8k::internal))]
    Internal(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

/// The `ds8k info` subcommand listing objects of `kind`.
fn list_command(kind: &str) -> String {
    let sub = match kind {
        "host" => "hosts",
        "host port" => "host-ports",
        "volume" | "volume named" => "volumes",
        "pool" => "pools",
        "LSS" => "lss",
        "marray" => "marrays",
        "resource group" => "resource-groups",
        _ => "--help",
    };
    format!("info {sub}")
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::Validation { message } => CliError::Validation {
                field: "parameters".into(),
                reason: message,
            },
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "<profile>".into(),
                message,
            },
            CoreError::NotFound { kind, locator } => CliError::NotFound {
                list_command: list_command(&kind),
                kind,
                locator,
            },
            CoreError::Conflict { message } => CliError::Conflict { message },
            CoreError::OperationFailed { .. } => CliError::OperationFailed { message },
            CoreError::BatchFailed { items } => CliError::BatchFailed {
                message: format!("{} of the requested objects failed", items.len()),
                details: items
                    .iter()
                    .map(|i| format!("#{} {i}", i.index))
                    .collect::<Vec<_>>()
                    .join("\n"),
            },
            CoreError::Api { message, code, .. } => CliError::ApiError {
                code: code.unwrap_or_else(|| "n/a".into()),
                message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: "(see ds8k config profiles)".into(),
            },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Keyring(e) => CliError::Keyring(e.to_string()),
            ConfigError::Serialization(e) => CliError::Render(e.to_string()),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
