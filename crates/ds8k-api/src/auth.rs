use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Default port of the DS8000 REST API on the HMC.
pub const DEFAULT_PORT: u16 = 8452;

/// Path prefix of every REST endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Header carrying the session token on every authenticated request.
pub(crate) const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// URL scheme used to reach the HMC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(format!("expected 'http' or 'https', got '{other}'")),
        }
    }
}

/// Username/password pair posted to `/tokens`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

// ── Session token bookkeeping ───────────────────────────────────────

/// `token` object of the `/tokens` response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenPayload {
    pub token: String,
    #[serde(default)]
    pub expired_time: Option<serde_json::Value>,
    #[serde(default)]
    pub max_idle_interval: Option<serde_json::Value>,
}

/// An issued token and the bookkeeping needed to know when it lapses.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub token: SecretString,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_idle: Option<TimeDelta>,
    pub last_used: DateTime<Utc>,
}

impl Session {
    /// Renew this long before the array's stated expiry.
    const EXPIRY_SKEW_SECS: i64 = 30;

    pub(crate) fn from_payload(payload: TokenPayload, now: DateTime<Utc>) -> Self {
        Self {
            expires_at: payload.expired_time.as_ref().and_then(parse_timestamp),
            max_idle: payload.max_idle_interval.as_ref().and_then(parse_millis),
            token: SecretString::from(payload.token),
            last_used: now,
        }
    }

    /// Whether the token must be renewed before it is used at `now`.
    pub(crate) fn is_stale(&self, now: DateTime<Utc>) -> bool {
        let expired = self
            .expires_at
            .is_some_and(|at| now + TimeDelta::seconds(Self::EXPIRY_SKEW_SECS) >= at);
        let idle = self
            .max_idle
            .is_some_and(|idle| now - self.last_used >= idle);
        expired || idle
    }
}

/// Accepts RFC 3339, `%Y-%m-%dT%H:%M:%S%z`, or epoch milliseconds.
fn parse_timestamp(raw: &serde_json::Value) -> Option<DateTime<Utc>> {
    match raw {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_millis(raw: &serde_json::Value) -> Option<TimeDelta> {
    let millis = match raw {
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok()?,
        serde_json::Value::Number(n) => n.as_i64()?,
        _ => return None,
    };
    (millis > 0).then(|| TimeDelta::milliseconds(millis))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(expired: serde_json::Value, idle: serde_json::Value) -> TokenPayload {
        TokenPayload {
            token: "abc".into(),
            expired_time: Some(expired),
            max_idle_interval: Some(idle),
        }
    }

    #[test]
    fn scheme_parses_case_insensitively() {
        assert_eq!("HTTPS".parse::<Scheme>().unwrap(), Scheme::Https);
        assert_eq!("http".parse::<Scheme>().unwrap(), Scheme::Http);
        assert!("ftp".parse::<Scheme>().is_err());
    }

    #[test]
    fn session_fresh_until_expiry() {
        let now = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let session = Session::from_payload(
            payload(json!("2024-05-01T11:00:00+00:00"), json!("1800000")),
            now,
        );

        assert!(!session.is_stale(now));
        assert!(session.is_stale(now + TimeDelta::minutes(59) + TimeDelta::seconds(45)));
    }

    #[test]
    fn session_goes_stale_when_idle() {
        let now = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let session = Session::from_payload(payload(json!(null), json!(60_000)), now);

        assert!(!session.is_stale(now + TimeDelta::seconds(59)));
        assert!(session.is_stale(now + TimeDelta::seconds(60)));
    }

    #[test]
    fn offset_without_colon_is_accepted() {
        let ts = parse_timestamp(&json!("2024-05-01T11:00:00-0500")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T16:00:00+00:00");
    }

    #[test]
    fn unknown_expiry_never_expires() {
        let now = Utc::now();
        let session = Session::from_payload(payload(json!("soon"), json!("")), now);
        assert!(!session.is_stale(now + TimeDelta::days(30)));
    }
}
