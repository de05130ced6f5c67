//! Integration tests for the gearguard CLI
//!
//! These run the binary end-to-end with assert_cmd. Every test gets its own
//! GEARGUARD_HOME and points at a closed local port, so nothing here needs a
//! running backend.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DEAD_SERVER: &str = "http://127.0.0.1:9";

/// Helper to get a gearguard command with an isolated home
fn gearguard(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gearguard").unwrap();
    cmd.env("GEARGUARD_HOME", home.path())
        .env_remove("GEARGUARD_SERVER")
        .env_remove("GEARGUARD_FORMAT")
        .env_remove("GEARGUARD_CACHE_TTL")
        .env_remove("GEARGUARD_PASSWORD")
        .env_remove("GEARGUARD_LOG")
        .args(["--server", DEAD_SERVER]);
    cmd
}

fn home() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// Basic CLI
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let home = home();
    gearguard(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("equipment"))
        .stdout(predicate::str::contains("board"))
        .stdout(predicate::str::contains("calendar"));
}

#[test]
fn test_version() {
    let home = home();
    gearguard(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gearguard"));
}

#[test]
fn test_unknown_command_fails() {
    let home = home();
    gearguard(&home).arg("frobnicate").assert().failure();
}

#[test]
fn test_request_alias() {
    let home = home();
    gearguard(&home)
        .args(["req", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("move"));
}

#[test]
fn test_invalid_status_rejected_by_parser() {
    let home = home();
    gearguard(&home)
        .args(["request", "move", "3", "on-hold"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid status"));
}

// ============================================================================
// Guards
// ============================================================================

#[test]
fn test_whoami_requires_login() {
    let home = home();
    gearguard(&home)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_equipment_list_requires_login() {
    let home = home();
    gearguard(&home)
        .args(["equipment", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_board_requires_login() {
    let home = home();
    gearguard(&home)
        .arg("board")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_calendar_requires_login() {
    let home = home();
    gearguard(&home)
        .args(["calendar", "--view", "week"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_calendar_short_v_is_verbose() {
    let home = home();
    gearguard(&home)
        .args(["calendar", "-v"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_admin_route_requires_login() {
    let home = home();
    gearguard(&home)
        .args(["user", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_token_for_other_server_is_not_used() {
    let home = home();
    let data = home.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("session.yaml"),
        "server: http://other.example:8000\ntoken: abc123\nusername: kim\n",
    )
    .unwrap();

    gearguard(&home)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_logout_when_logged_out() {
    let home = home();
    gearguard(&home)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

// ============================================================================
// Signup validation (runs before any network call)
// ============================================================================

#[test]
fn test_signup_rejects_invalid_email() {
    let home = home();
    gearguard(&home)
        .args([
            "signup",
            "--email",
            "not-an-email",
            "--username",
            "kim",
            "--password",
            "longenough",
            "--confirm",
            "longenough",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid email"));
}

#[test]
fn test_signup_rejects_short_password() {
    let home = home();
    gearguard(&home)
        .args([
            "signup",
            "--email",
            "kim@example.com",
            "--username",
            "kim",
            "--password",
            "short",
            "--confirm",
            "short",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8"));
}

#[test]
fn test_signup_rejects_mismatched_confirmation() {
    let home = home();
    gearguard(&home)
        .args([
            "signup",
            "--email",
            "kim@example.com",
            "--username",
            "kim",
            "--password",
            "longenough",
            "--confirm",
            "different1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("do not match"));
}

// ============================================================================
// Status (backend unreachable)
// ============================================================================

#[test]
fn test_status_reports_unreachable_backend() {
    let home = home();
    gearguard(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(DEAD_SERVER))
        .stdout(predicate::str::contains("unreachable"));
}

#[test]
fn test_status_json() {
    let home = home();
    gearguard(&home)
        .args(["status", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"healthy\": false"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_path_under_home() {
    let home = home();
    let expected = home.path().join("config").join("config.yaml");
    gearguard(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
}

#[test]
fn test_config_set_then_show() {
    let home = home();
    gearguard(&home)
        .args(["config", "set", "page_size", "25"])
        .assert()
        .success();
    gearguard(&home)
        .args(["config", "show", "page_size"])
        .assert()
        .success()
        .stdout(predicate::str::diff("25\n"));

    let content = fs::read_to_string(home.path().join("config").join("config.yaml")).unwrap();
    assert!(content.contains("page_size: 25"));
}

#[test]
fn test_config_unset() {
    let home = home();
    gearguard(&home)
        .args(["config", "set", "default_format", "json"])
        .assert()
        .success();
    gearguard(&home)
        .args(["config", "unset", "default_format"])
        .assert()
        .success();
    gearguard(&home)
        .args(["config", "show", "default_format"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not set"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = home();
    gearguard(&home)
        .args(["config", "set", "author", "kim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_rejects_bad_number() {
    let home = home();
    gearguard(&home)
        .args(["config", "set", "timeout_secs", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("whole number"));
}

#[test]
fn test_config_keys() {
    let home = home();
    gearguard(&home)
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cache_ttl_secs"))
        .stdout(predicate::str::contains("server"));
}

// ============================================================================
// Cache and completions
// ============================================================================

#[test]
fn test_cache_status_creates_database() {
    let home = home();
    gearguard(&home)
        .args(["cache", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total entries"));
    assert!(home.path().join("cache").exists());
}

#[test]
fn test_cache_clear() {
    let home = home();
    gearguard(&home)
        .args(["cache", "clear", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache cleared"));
}

#[test]
fn test_completions_bash() {
    let home = home();
    gearguard(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gearguard"));
}
