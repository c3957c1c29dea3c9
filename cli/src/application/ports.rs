//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::{ConnectTarget, InstallerConfig, SessionError, SessionOutput};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Read side of the pipe bound to a session's standard input.
pub type SessionInput = tokio::io::DuplexStream;

/// What `LocalWorkspace::recreate_dir` found before creating the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirSetup {
    /// The directory did not exist.
    Created,
    /// An old directory was removed first.
    Replaced,
}

// ── Remote Transport Ports ────────────────────────────────────────────────────

/// One live, authenticated remote shell connection.
///
/// Every call opens its own short-lived session and closes it before
/// returning, whether or not the command succeeded.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    /// Run `command` verbatim in a fresh session, capturing stdout.
    async fn run(&self, command: &str) -> Result<SessionOutput, SessionError>;

    /// Run `command` in a fresh session with its stdin fed from `input`.
    ///
    /// Implementations forward `input` until EOF, then signal EOF to the
    /// remote, while concurrently waiting for the command to finish.
    async fn run_with_input(
        &self,
        command: &str,
        input: SessionInput,
    ) -> Result<SessionOutput, SessionError>;

    /// Tear the connection down.
    async fn disconnect(&self) -> Result<()>;
}

/// Establishes remote shell connections.
#[allow(async_fn_in_trait)]
pub trait Dialer {
    type Connection: RemoteShell;

    /// Dial and authenticate once. Retrying is the caller's concern.
    async fn dial(&self, target: &ConnectTarget) -> Result<Self::Connection>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts local process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
}

// ── Local Collaborator Ports ──────────────────────────────────────────────────

/// Local filesystem operations the provisioning steps depend on.
pub trait LocalWorkspace {
    /// The current user's home directory.
    fn home_dir(&self) -> Result<PathBuf>;
    /// Read a whole file.
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    /// Create `path`, removing any previous directory at that location first.
    fn recreate_dir(&self, path: &Path) -> Result<DirSetup>;
    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// Local git operations against a working directory.
#[allow(async_fn_in_trait)]
pub trait LocalGit {
    /// `git clone <url> .` inside `dir`.
    async fn clone_into(&self, url: &str, dir: &Path) -> Result<Output>;
    /// `git remote rename <from> <to>` inside `dir`.
    async fn rename_remote(&self, dir: &Path, from: &str, to: &str) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a periodic liveness notice while something blocks.
    fn tick(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the installer configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<InstallerConfig>;
    /// Path of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
