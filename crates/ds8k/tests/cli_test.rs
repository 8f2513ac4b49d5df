//! Integration tests for the `ds8k` CLI binary.
//!
//! Argument parsing, help output, shell completions, config handling and
//! the errors raised before any connection is attempted. No array needed.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `ds8k` binary with env isolation.
///
/// Clears every `DS8K_*` variable and points the config file at `config`
/// so tests never touch the user's real configuration.
fn ds8k_cmd(config: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ds8k");
    cmd.env("DS8K_CONFIG", config)
        .env("HOME", "/tmp/ds8k-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/ds8k-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("DS8K_PROFILE")
        .env_remove("DS8K_HOSTNAME")
        .env_remove("DS8K_PORT")
        .env_remove("DS8K_USERNAME")
        .env_remove("DS8K_PASSWORD")
        .env_remove("DS8K_OUTPUT")
        .env_remove("DS8K_INSECURE")
        .env_remove("DS8K_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn scratch() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    (dir, path)
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_dir, config) = scratch();
    let output = ds8k_cmd(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config).arg("--help").assert().success().stdout(
        predicate::str::contains("DS8000")
            .and(predicate::str::contains("host-port"))
            .and(predicate::str::contains("volume"))
            .and(predicate::str::contains("resource-group")),
    );
}

#[test]
fn test_version_flag() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ds8k"));
}

#[test]
fn test_invalid_subcommand() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .arg("frobnicate")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_info_help_lists_collectors() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .args(["info", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("hosts")
                .and(predicate::str::contains("host-ports"))
                .and(predicate::str::contains("marrays"))
                .and(predicate::str::contains("resource-groups")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef ds8k"));
}

#[test]
fn test_completions_fish() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete -c ds8k"));
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_mapping_needs_volumes() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .args(["mapping", "--host", "h1"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_mapping_ids_and_name_conflict() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .args(["mapping", "--host", "h1", "--id", "1000", "--volume-name", "v"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_bad_state_value() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .args(["host", "h1", "--state", "gone"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_bad_lss_type_filter() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .args(["info", "lss", "--type", "xyz"])
        .assert()
        .failure()
        .code(2);
}

// ── Connection setup errors ─────────────────────────────────────────

#[test]
fn test_no_config_points_at_init() {
    let (_dir, config) = scratch();
    let output = ds8k_cmd(&config).args(["info", "hosts"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("config init"), "Expected hint in:\n{text}");
}

#[test]
fn test_unknown_profile() {
    let (_dir, config) = scratch();
    let output = ds8k_cmd(&config)
        .args(["--profile", "nope", "info", "pools"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("'nope' not found"), "{text}");
}

#[test]
fn test_hostname_without_username_is_usage_error() {
    let (_dir, config) = scratch();
    let output = ds8k_cmd(&config)
        .args(["--hostname", "hmc.example", "info", "pools"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("username"), "{text}");
}

// ── Config subcommands ──────────────────────────────────────────────

#[test]
fn test_profiles_empty() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No profiles configured"));
}

#[test]
fn test_config_set_then_show_and_use() {
    let (_dir, config) = scratch();

    ds8k_cmd(&config)
        .args(["config", "set", "hostname", "hmc1.example"])
        .assert()
        .success();
    ds8k_cmd(&config)
        .args(["config", "set", "username", "admin"])
        .assert()
        .success();
    assert!(config.exists());

    ds8k_cmd(&config)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *"));

    ds8k_cmd(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.default]")
                .and(predicate::str::contains("hostname = \"hmc1.example\"")),
        );

    ds8k_cmd(&config)
        .args(["--profile", "lab", "config", "set", "port", "8088"])
        .assert()
        .success();
    ds8k_cmd(&config)
        .args(["config", "use", "lab"])
        .assert()
        .success();
    ds8k_cmd(&config)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab *"));
}

#[test]
fn test_config_set_unknown_key() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .args(["config", "set", "colour", "red"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn test_config_use_missing_profile() {
    let (_dir, config) = scratch();
    ds8k_cmd(&config)
        .args(["config", "use", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_config_show_json_masks_password() {
    let (dir, config) = scratch();
    std::fs::write(
        &config,
        "[profiles.lab]\nhostname = \"hmc1\"\nusername = \"admin\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    let output = ds8k_cmd(&config)
        .args(["--output", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("hunter2"), "{stdout}");
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["profiles"]["lab"]["password"], "****");
    drop(dir);
}
