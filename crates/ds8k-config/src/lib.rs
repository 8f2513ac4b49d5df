//! Configuration for the ds8k CLI.
//!
//! TOML profiles, `DS8K_` environment overrides, password resolution
//! (env + keyring + plaintext), and translation to
//! `ds8k_core::ArrayConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ds8k_api::{DEFAULT_PORT, Scheme};
use ds8k_core::{ArrayConfig, TlsVerification};

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "ds8k";

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "DS8K_CONFIG";

/// Password fallback consulted after a profile's `password_env`.
pub const PASSWORD_ENV: &str = "DS8K_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level `config.toml`.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named arrays.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// Connection settings for one HMC.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// HMC hostname or IP address.
    pub hostname: String,

    /// REST port, 8452 when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// `https` (default) or `http`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<Scheme>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Plaintext password. Prefer the keyring or `password_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable holding the password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Overrides `defaults.insecure`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Overrides `defaults.timeout`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Config {
    /// Name of the profile to use: explicit, then `default_profile`.
    pub fn profile_name<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// `DS8K_CONFIG`, else the platform config dir.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "ds8k", "ds8k").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("ds8k");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading and saving ──────────────────────────────────────────────

/// Load the config from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load `path` merged over defaults, then `DS8K_` variables.
///
/// Nested keys use a double underscore: `DS8K_DEFAULTS__OUTPUT=json`.
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("DS8K_")
                .ignore(&["CONFIG", "PASSWORD"])
                .split("__"),
        );
    Ok(figment.extract()?)
}

/// Write the config as TOML to the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Credentials ─────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

/// Resolve the password: `password_env`, `DS8K_PASSWORD`, keyring,
/// then plaintext.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Build an `ArrayConfig` from a profile. The CLI overlays its flags on
/// the result.
pub fn profile_to_array_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ArrayConfig, ConfigError> {
    let username = profile
        .username
        .clone()
        .ok_or_else(|| ConfigError::Validation {
            field: "username".into(),
            reason: format!("profile '{profile_name}' has no username"),
        })?;
    let password = resolve_password(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca) = profile.ca_cert {
        TlsVerification::CustomCa(ca.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ArrayConfig::new(profile.hostname.clone(), username, password);
    config.port = profile.port.unwrap_or(DEFAULT_PORT);
    config.scheme = profile.scheme.unwrap_or_default();
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profiles_are_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
default_profile = "lab"

[defaults]
output = "json"

[profiles.lab]
hostname = "hmc1.example.com"
username = "admin"
password = "secret"
scheme = "http"
port = 8088
insecure = true
"#,
        );
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.profile_name(None), "lab");
        assert_eq!(cfg.profile_name(Some("other")), "other");
        assert_eq!(cfg.defaults.output, "json");

        let lab = cfg.profile("lab").unwrap();
        let array = profile_to_array_config(lab, "lab-no-keyring-entry", &cfg.defaults).unwrap();
        assert_eq!(array.hostname, "hmc1.example.com");
        assert_eq!(array.port, 8088);
        assert_eq!(array.scheme, Scheme::Http);
        assert_eq!(array.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(array.timeout, Duration::from_secs(30));
    }

    #[test]
    fn unknown_profile_is_reported() {
        let cfg = Config::default();
        let err = cfg.profile("nope").unwrap_err();
        assert_eq!(err.to_string(), "profile 'nope' not found");
    }

    #[test]
    fn unset_password_env_falls_back_to_plaintext() {
        let profile = Profile {
            hostname: "h".into(),
            password: Some("plain".into()),
            password_env: Some("DS8K_TEST_SURELY_UNSET_PASSWORD".into()),
            ..Profile::default()
        };
        let pw = resolve_password(&profile, "plaintext-fallback-test").unwrap();
        assert_eq!(pw.expose_secret(), "plain");
    }

    #[test]
    fn no_password_anywhere_is_an_error() {
        let profile = Profile {
            hostname: "h".into(),
            username: Some("admin".into()),
            ..Profile::default()
        };
        if std::env::var_os(PASSWORD_ENV).is_none() {
            let err = resolve_password(&profile, "no-password-test").unwrap_err();
            assert!(matches!(err, ConfigError::NoCredentials { .. }));
        }
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                hostname: "10.0.0.5".into(),
                username: Some("admin".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = loaded.profile("default").unwrap();
        assert_eq!(profile.hostname, "10.0.0.5");
        assert_eq!(profile.port, None);
    }
}
