// ── Session establishment ──
//
// Turns an `ArrayConfig` into a logged-in `Ds8kClient`.

use ds8k_api::{Credentials, Ds8kClient, TlsMode, TransportConfig};
use tracing::{debug, info};

use crate::config::{ArrayConfig, TlsVerification};
use crate::error::CoreError;

/// Entry point for talking to an array.
pub struct Array;

impl Array {
    /// Validate parameters, build the HTTP client, and obtain a token.
    ///
    /// Fails before any network traffic when a required parameter is
    /// missing. Authentication is attempted once.
    pub async fn connect(config: &ArrayConfig) -> Result<Ds8kClient, CoreError> {
        config.validate()?;

        let transport = build_transport(config);
        let base_url = Ds8kClient::base_url_for(config.scheme, &config.hostname, config.port)?;
        debug!(%base_url, "connecting to DS8000");

        let client = Ds8kClient::new(base_url.clone(), &transport)?;
        client
            .login(Credentials {
                username: config.username.clone(),
                password: config.password.clone(),
            })
            .await
            .map_err(|e| match CoreError::from(e) {
                CoreError::ConnectionFailed { reason, .. } => CoreError::ConnectionFailed {
                    url: base_url.to_string(),
                    reason,
                },
                other => other,
            })?;

        info!(host = %config.hostname, user = %config.username, "authenticated");
        Ok(client)
    }
}

fn build_transport(config: &ArrayConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[tokio::test]
    async fn missing_password_fails_before_network() {
        // Unroutable host: reaching the network would surface a
        // connection error instead of a validation error.
        let config = ArrayConfig::new("192.0.2.1", "admin", SecretString::from(String::new()));
        let err = Array::connect(&config).await.err();
        assert!(matches!(err, Some(CoreError::Validation { .. })), "{err:?}");
    }
}
