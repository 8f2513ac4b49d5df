//! CLI configuration: a thin layer over `ds8k_config` that applies
//! `GlobalOpts` overrides (--hostname, --username, --insecure, ...).

use ds8k_core::ArrayConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use ds8k_config::{Config, Profile, config_path, load_config, save_config};

/// Resolve the active profile name from flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Fill `--output` from `defaults.output` when the flag was not given.
pub fn apply_output_default(global: &mut GlobalOpts, config: &Config) {
    if global.output.is_none() {
        global.output = <OutputFormat as clap::ValueEnum>::from_str(&config.defaults.output, true)
            .ok();
    }
}

/// Build the connection for the active profile, flags taking priority.
///
/// Without a stored profile, `--hostname` and `--username` alone are
/// enough; the password then comes from `DS8K_PASSWORD` or the keyring.
pub fn resolve_array_config(global: &GlobalOpts, config: &Config) -> Result<ArrayConfig, CliError> {
    let name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.hostname.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(config),
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref hostname) = global.hostname {
        profile.hostname.clone_from(hostname);
    }
    if let Some(port) = global.port {
        profile.port = Some(port);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    Ok(ds8k_config::profile_to_array_config(
        &profile,
        &name,
        &config.defaults,
    )?)
}
