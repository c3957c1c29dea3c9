//! Integration tests for the CLI surface: help, version, and the dry-run
//! `profile` command.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

pub fn k_installer() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("k-installer"));
    cmd.env("NO_COLOR", "1")
        .env_remove("CI")
        .env_remove("K_INSTALLER_YES")
        .env_remove("K_INSTALLER_PASSWORD")
        .env("K_INSTALLER_CONFIG", "/nonexistent/k-installer.yaml");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_2() {
    k_installer().assert().code(2).stderr(predicate::str::contains(
        "Provision remote hosts for web projects over SSH",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    k_installer()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("add-user"))
        .stdout(predicate::str::contains("profile"));
}

#[test]
fn test_new_help_shows_project_flags() {
    k_installer()
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Add new project"))
        .stdout(predicate::str::contains("--ssh-key"))
        .stdout(predicate::str::contains("--type"))
        .stdout(predicate::str::contains("--password").not());
}

#[test]
fn test_version_command_shows_version() {
    k_installer()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!(
            "k-installer ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_cli_version_flag_shows_version() {
    k_installer()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("k-installer"));
}

#[test]
fn test_unknown_command_fails() {
    k_installer()
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// --- profile ---

#[test]
fn test_profile_wordpress_lists_eleven_steps() {
    k_installer()
        .args(["profile", "--yes", "--name", "blog", "--type", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WP profile for 'blog'"))
        .stdout(predicate::str::contains("post-update-wp"))
        .stdout(predicate::str::contains("mkdir blog_hub.git"))
        .stdout(predicate::str::contains("11."))
        .stdout(predicate::str::contains("copying ssh public key"));
}

#[test]
fn test_profile_yii_has_no_remote_steps() {
    k_installer()
        .args(["profile", "-y", "--name", "shop", "--type", "yii"])
        .assert()
        .success()
        .stdout(predicate::str::contains("post-update-yii"))
        .stdout(predicate::str::contains("No remote steps."));
}

#[test]
fn test_profile_quiet_prints_nothing() {
    k_installer()
        .args(["-q", "profile", "-y", "--name", "blog", "--type", "wp"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_profile_reads_yes_from_env() {
    k_installer()
        .env("K_INSTALLER_YES", "1")
        .args(["profile", "--name", "blog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required value for 'type'"));
}

// --- NO_COLOR ---

#[test]
fn test_no_color_env_accepts_any_value() {
    for value in ["1", "true", "yes"] {
        k_installer()
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("k-installer"));
    }
}

#[test]
fn test_no_color_flag_without_env() {
    k_installer()
        .env_remove("NO_COLOR")
        .args(["--no-color", "version"])
        .assert()
        .success();
}
