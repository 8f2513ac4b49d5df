// ── Runtime connection configuration ──
//
// Describes how to reach one DS8000 HMC. Carries credentials and
// connection tuning but never touches disk; the CLI builds an
// `ArrayConfig` from its profile and hands it in.

use std::time::Duration;

use ds8k_api::{DEFAULT_PORT, Scheme};
use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Matches `validate_certs: true`.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed HMC certificates).
    DangerAcceptInvalid,
}

/// Connection parameters for a single array.
#[derive(Debug, Clone)]
pub struct ArrayConfig {
    /// HMC hostname or IP address.
    pub hostname: String,
    pub port: u16,
    pub scheme: Scheme,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ArrayConfig {
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            port: DEFAULT_PORT,
            scheme: Scheme::default(),
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Check required parameters locally, before any network call.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut missing = Vec::new();
        if self.hostname.trim().is_empty() {
            missing.push("hostname");
        }
        if self.username.trim().is_empty() {
            missing.push("username");
        }
        if self.password.expose_secret().is_empty() {
            missing.push("password");
        }
        if !missing.is_empty() {
            return Err(CoreError::validation(format!(
                "missing required arguments: {}",
                missing.join(", ")
            )));
        }
        if self.port == 0 {
            return Err(CoreError::validation("port must be between 1 and 65535"));
        }
        if self.timeout.is_zero() {
            return Err(CoreError::validation("timeout must be greater than zero"));
        }
        Ok(())
    }
}
