//! Invalid or missing input must fail before any connection is attempted.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::cli_tests::k_installer;

const FULL: [&str; 10] = [
    "--name",
    "blog",
    "--host",
    "example.org",
    "--port",
    "22",
    "--type",
    "2",
    "--ssh-key",
    "id_rsa",
];

#[test]
fn test_new_rejects_short_project_name() {
    k_installer()
        .args(["new", "--yes", "--name", "ab", "--host", "example.org"])
        .args(["--type", "2", "--ssh-key", "id_rsa"])
        .env("K_INSTALLER_PASSWORD", "secret-pass")
        .assert()
        .failure()
        .stderr(predicate::str::contains("3 to 20 characters"));
}

#[test]
fn test_new_rejects_long_port() {
    k_installer()
        .args(["new", "--yes", "--name", "blog", "--host", "example.org"])
        .args(["--port", "22222", "--type", "2", "--ssh-key", "id_rsa"])
        .env("K_INSTALLER_PASSWORD", "secret-pass")
        .assert()
        .failure()
        .stderr(predicate::str::contains("only digits allowed"));
}

#[test]
fn test_new_requires_password_without_prompts() {
    k_installer()
        .args(["new", "--yes"])
        .args(FULL)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required value for 'password'"));
}

#[test]
fn test_new_rejects_short_password() {
    k_installer()
        .args(["new", "--yes"])
        .args(FULL)
        .env("K_INSTALLER_PASSWORD", "abc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 7 characters"));
}

#[test]
fn test_add_user_rejects_unknown_type() {
    k_installer()
        .args(["add-user", "--yes", "--name", "blog", "--host", "example.org"])
        .args(["--type", "3", "--ssh-key", "id_rsa"])
        .env("K_INSTALLER_PASSWORD", "secret-pass")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pay attention to the options"));
}

#[test]
fn test_add_user_rejects_key_path() {
    k_installer()
        .args(["add-user", "--yes", "--name", "blog", "--host", "example.org"])
        .args(["--type", "2", "--ssh-key", "../id_rsa"])
        .env("K_INSTALLER_PASSWORD", "secret-pass")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pay attention to the key name"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("config.yaml");
    std::fs::write(&path, "connect:\n  tick_ms: 10\n").expect("write");

    k_installer()
        .arg("--config")
        .arg(&path)
        .args(["profile", "-y", "--name", "blog", "--type", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse"));
}

#[test]
fn test_zero_tick_interval_is_rejected_before_connecting() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("config.yaml");
    std::fs::write(&path, "connect:\n  tick_interval_ms: 0\n").expect("write");

    k_installer()
        .arg("--config")
        .arg(&path)
        .args(["new", "--yes"])
        .args(FULL)
        .env("K_INSTALLER_PASSWORD", "secret-pass")
        .assert()
        .failure()
        .stderr(predicate::str::contains("connect.tick_interval_ms"));
}

#[test]
fn test_invalid_connect_settings_fail_before_any_field_is_read() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("config.yaml");
    std::fs::write(&path, "connect:\n  tick_interval_ms: 0\n").expect("write");

    k_installer()
        .arg("--config")
        .arg(&path)
        .args(["new", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("connect.tick_interval_ms"))
        .stderr(predicate::str::contains("name").not());
}
