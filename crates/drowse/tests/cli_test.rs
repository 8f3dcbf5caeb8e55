//! End-to-end tests for the `drowse` binary: argument parsing, help
//! text, completions, config management, and the failure paths that
//! need no live cloud behind them.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// An isolated `drowse` invocation: config dirs point at a path that
/// does not exist and every `DROWSE_*` variable is scrubbed, so the
/// invoking user's real setup never leaks in.
fn drowse_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("drowse");
    cmd.env("HOME", "/tmp/drowse-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/drowse-cli-test-nonexistent")
        .env_remove("DROWSE_PROFILE")
        .env_remove("DROWSE_EMAIL")
        .env_remove("DROWSE_PASSWORD")
        .env_remove("DROWSE_NAMESPACE")
        .env_remove("DROWSE_PROCESSOR")
        .env_remove("DROWSE_OUTPUT")
        .env_remove("DROWSE_TIMEOUT");
    cmd
}

/// Both output streams as one string, for matchers that do not care
/// which stream a message landed on.
fn combined_output(output: &std::process::Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

/// Predicate matching the "no configuration / no credentials" failures.
fn config_error() -> impl predicates::Predicate<str> {
    predicate::str::contains("config")
        .or(predicate::str::contains("Configuration"))
        .or(predicate::str::contains("credentials"))
        .or(predicate::str::contains("profile"))
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = drowse_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "bare invocation is a usage error");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "help text missing:\n{text}");
}

#[test]
fn test_help_flag() {
    drowse_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Sleeptracker")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("light"))
            .and(predicate::str::contains("press"))
            .and(predicate::str::contains("env")),
    );
}

#[test]
fn test_version_flag() {
    drowse_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("drowse"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    drowse_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("drowse").and(predicate::str::is_empty().not()));
}

#[test]
fn test_completions_zsh() {
    drowse_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    drowse_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = drowse_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success(), "unknown subcommand must fail");
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "error should name the bad subcommand:\n{text}"
    );
}

#[test]
fn test_status_no_config() {
    drowse_cmd()
        .arg("status")
        .assert()
        .failure()
        .stderr(config_error());
}

#[test]
fn test_press_no_config() {
    drowse_cmd()
        .args(["press", "head-up"])
        .assert()
        .failure()
        .stderr(config_error());
}

#[test]
fn test_press_requires_target() {
    let output = drowse_cmd().arg("press").output().unwrap();
    assert_eq!(output.status.code(), Some(2), "missing TARGET is a usage error");
    let text = combined_output(&output);
    assert!(
        text.contains("TARGET") || text.contains("required"),
        "error should name the missing argument:\n{text}"
    );
}

#[test]
fn test_email_without_password_asks_for_credentials() {
    drowse_cmd()
        .args(["--email", "sleeper@example.com", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("credentials").or(predicate::str::contains("password")));
}

#[test]
fn test_invalid_output_format() {
    let output = drowse_cmd()
        .args(["--output", "invalid", "status"])
        .output()
        .unwrap();
    assert!(!output.status.success(), "bad --output value must fail");
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "error should list the accepted formats:\n{text}"
    );
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse; the failure should be about missing
    // configuration, not argument parsing.
    drowse_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--namespace",
            "acme",
            "--timeout",
            "60",
            "status",
        ])
        .assert()
        .failure()
        .stderr(config_error());
}

// ── Config management ───────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    // `config show` renders the default configuration even when no
    // config file exists.
    drowse_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_set_then_show_roundtrip() {
    let home = tempfile::tempdir().unwrap();

    drowse_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .args(["config", "set", "email", "sleeper@example.com"])
        .assert()
        .success();

    drowse_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sleeper@example.com"));
}

#[test]
fn test_config_set_masks_stored_password() {
    let home = tempfile::tempdir().unwrap();

    drowse_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .args(["config", "set", "password", "hunter2"])
        .assert()
        .success();

    drowse_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_config_set_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    drowse_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .args(["config", "set", "bogus", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key"));
}

#[test]
fn test_config_use_unknown_profile() {
    drowse_cmd()
        .args(["config", "use", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found").or(predicate::str::contains("nonexistent")));
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_light_subcommands_exist() {
    drowse_cmd()
        .args(["light", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("show")
                .and(predicate::str::contains("on"))
                .and(predicate::str::contains("off")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    drowse_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("profiles"))
                .and(predicate::str::contains("set-password")),
        );
}

#[test]
fn test_env_watch_flag_exists() {
    drowse_cmd()
        .args(["env", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--watch"));
}
