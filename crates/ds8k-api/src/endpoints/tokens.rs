// Token endpoint
//
// `POST /tokens` exchanges a username/password for an `X-Auth-Token`.
// The response carries the token plus its absolute expiry and idle limit.

use chrono::Utc;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::{Credentials, Session, TokenPayload};
use crate::client::{Ds8kClient, decode, parse_error};
use crate::error::Error;
use crate::models::RequestBody;

#[derive(Serialize)]
struct TokenParams<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: Option<TokenPayload>,
}

impl Ds8kClient {
    /// Authenticate and keep the credentials for later renewals.
    ///
    /// `POST /tokens`
    pub async fn login(&self, credentials: Credentials) -> Result<(), Error> {
        let session = self.request_token(&credentials).await?;
        self.install_session(credentials, session).await;
        debug!("login successful");
        Ok(())
    }

    pub(crate) async fn request_token(&self, credentials: &Credentials) -> Result<Session, Error> {
        let url = self.url(&["tokens"])?;
        debug!(username = %credentials.username, "requesting token at {url}");

        let params = TokenParams {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
        };
        let resp = self
            .http()
            .post(url)
            .json(&RequestBody::new(&params))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = match parse_error(status, resp).await {
                Error::Authentication { message }
                | Error::NotFound { message }
                | Error::BadRequest { message, .. }
                | Error::Api { message, .. } => message,
                other => other.to_string(),
            };
            return Err(Error::Authentication {
                message: format!("token request failed (HTTP {status}): {message}"),
            });
        }

        let body = resp.text().await?;
        let parsed: TokenResponse = decode(&body)?;
        let payload = parsed.token.ok_or_else(|| Error::Authentication {
            message: "token response carried no token".into(),
        })?;
        if payload.token.is_empty() {
            return Err(Error::Authentication {
                message: "array issued an empty token".into(),
            });
        }

        Ok(Session::from_payload(payload, Utc::now()))
    }
}
