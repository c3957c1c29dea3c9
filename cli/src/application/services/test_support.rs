//! Shared test doubles for application service tests.
//!
//! Provides cross-platform `exit_status()`, a scripted remote shell that acts
//! as a push sink, and recording implementations of the local ports.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use tokio::io::AsyncReadExt;

use crate::application::ports::{
    CommandRunner, Dialer, DirSetup, LocalGit, LocalWorkspace, ProgressReporter, RemoteShell,
    SessionInput,
};
use crate::domain::project::validate_password;
use crate::domain::{
    ConnectTarget, ProjectConfig, ProjectType, RemoteExit, SessionError, SessionOutput,
};

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

fn output(stderr: Option<&Vec<u8>>) -> Output {
    Output {
        status: exit_status(i32::from(stderr.is_some())),
        stdout: Vec::new(),
        stderr: stderr.cloned().unwrap_or_default(),
    }
}

/// A WordPress project named `blog` on `example.org:22`.
pub fn project() -> ProjectConfig {
    ProjectConfig {
        name: "blog".to_string(),
        host: "example.org".to_string(),
        password: validate_password("secret-pass").unwrap(),
        port: 22,
        project_type: ProjectType::WordPress,
        ssh_key: "id_rsa".to_string(),
    }
}

pub fn connect_target() -> ConnectTarget {
    project().connect_target()
}

// ── Remote shell ──────────────────────────────────────────────────────────────

/// Records sessions and fails scripted commands with a transport error.
///
/// `run_with_input` drains its input like a real sink before answering.
#[derive(Default)]
pub struct ScriptedShell {
    failures: HashMap<String, String>,
    events: Mutex<Vec<String>>,
    commands: Mutex<Vec<String>>,
    pushed: Mutex<Vec<(String, Vec<u8>)>>,
}

impl ScriptedShell {
    /// Make `command` fail with an error whose text is `error_text`.
    #[must_use]
    pub fn fail(mut self, command: &str, error_text: &str) -> Self {
        self.failures
            .insert(command.to_string(), error_text.to_string());
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock").clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().expect("lock").clone()
    }

    pub fn pushed(&self) -> Vec<(String, Vec<u8>)> {
        self.pushed.lock().expect("lock").clone()
    }

    fn open(&self, command: &str) {
        self.events.lock().expect("lock").push(format!("open {command}"));
        self.commands.lock().expect("lock").push(command.to_string());
    }

    fn close(&self, command: &str) -> Result<SessionOutput, SessionError> {
        self.events.lock().expect("lock").push(format!("close {command}"));
        match self.failures.get(command) {
            Some(text) => Err(SessionError::Transport(text.clone())),
            None => Ok(SessionOutput::default()),
        }
    }
}

impl RemoteShell for ScriptedShell {
    async fn run(&self, command: &str) -> Result<SessionOutput, SessionError> {
        self.open(command);
        self.close(command)
    }

    async fn run_with_input(
        &self,
        command: &str,
        mut input: SessionInput,
    ) -> Result<SessionOutput, SessionError> {
        self.open(command);
        let mut received = Vec::new();
        input
            .read_to_end(&mut received)
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;
        self.pushed
            .lock()
            .expect("lock")
            .push((command.to_string(), received));
        self.close(command)
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}

/// A sink that exits without reading its input, like `scp -t` refusing a
/// transfer. Answers with `exit`, or success when `None`.
pub struct EarlyExitShell {
    exit: Option<RemoteExit>,
}

impl EarlyExitShell {
    pub fn new(exit: Option<RemoteExit>) -> Self {
        Self { exit }
    }
}

impl RemoteShell for EarlyExitShell {
    async fn run(&self, _: &str) -> Result<SessionOutput, SessionError> {
        Ok(SessionOutput::default())
    }

    async fn run_with_input(
        &self,
        _: &str,
        input: SessionInput,
    ) -> Result<SessionOutput, SessionError> {
        tokio::task::yield_now().await;
        drop(input);
        match &self.exit {
            Some(exit) => Err(exit.clone().into()),
            None => Ok(SessionOutput::default()),
        }
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}

/// Fails the first `failures` dials, each taking `latency`.
pub struct FlakyDialer {
    failures: u32,
    latency: Duration,
    dials: Mutex<u32>,
}

impl FlakyDialer {
    pub fn new(failures: u32, latency: Duration) -> Self {
        Self {
            failures,
            latency,
            dials: Mutex::new(0),
        }
    }

    pub fn dial_count(&self) -> u32 {
        *self.dials.lock().expect("lock")
    }
}

impl Dialer for FlakyDialer {
    type Connection = ScriptedShell;

    async fn dial(&self, _: &ConnectTarget) -> Result<ScriptedShell> {
        tokio::time::sleep(self.latency).await;
        let n = {
            let mut dials = self.dials.lock().expect("lock");
            *dials += 1;
            *dials
        };
        if n <= self.failures {
            anyhow::bail!("dial tcp: connection refused");
        }
        Ok(ScriptedShell::default())
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingReporter {
    fn push(&self, kind: &'static str, message: &str) {
        self.events
            .lock()
            .expect("lock")
            .push((kind, message.to_string()));
    }

    fn of_kind(&self, kind: &str) -> Vec<String> {
        self.events
            .lock()
            .expect("lock")
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn ticks(&self) -> usize {
        self.of_kind("tick").len()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.of_kind("warn")
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.push("step", message);
    }
    fn success(&self, message: &str) {
        self.push("success", message);
    }
    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
    fn tick(&self, message: &str) {
        self.push("tick", message);
    }
}

// ── Local collaborators ───────────────────────────────────────────────────────

/// In-memory home directory with canned files.
pub struct MemoryWorkspace {
    home: PathBuf,
    files: HashMap<PathBuf, Vec<u8>>,
    recreated: Mutex<Vec<PathBuf>>,
}

impl MemoryWorkspace {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            files: HashMap::new(),
            recreated: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_file(mut self, path: &str, content: &[u8]) -> Self {
        self.files.insert(PathBuf::from(path), content.to_vec());
        self
    }

    pub fn recreated(&self) -> Vec<PathBuf> {
        self.recreated.lock().expect("lock").clone()
    }
}

impl LocalWorkspace for MemoryWorkspace {
    fn home_dir(&self) -> Result<PathBuf> {
        Ok(self.home.clone())
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No such file or directory"))
    }

    fn recreate_dir(&self, path: &Path) -> Result<DirSetup> {
        let mut dirs = self.recreated.lock().expect("lock");
        let setup = if dirs.iter().any(|d| d == path) {
            DirSetup::Replaced
        } else {
            DirSetup::Created
        };
        dirs.push(path.to_path_buf());
        Ok(setup)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.recreated.lock().expect("lock").iter().any(|d| d == path)
    }
}

/// Records git invocations; fails all of them when built with `failing`.
#[derive(Default)]
pub struct RecordingGit {
    calls: Mutex<Vec<String>>,
    stderr: Option<Vec<u8>>,
}

impl RecordingGit {
    pub fn failing(stderr: &[u8]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            stderr: Some(stderr.to_vec()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }
}

impl LocalGit for RecordingGit {
    async fn clone_into(&self, url: &str, dir: &Path) -> Result<Output> {
        self.calls
            .lock()
            .expect("lock")
            .push(format!("clone {url} {}", dir.display()));
        Ok(output(self.stderr.as_ref()))
    }

    async fn rename_remote(&self, dir: &Path, from: &str, to: &str) -> Result<Output> {
        self.calls
            .lock()
            .expect("lock")
            .push(format!("rename {} {from} {to}", dir.display()));
        Ok(output(self.stderr.as_ref()))
    }
}

/// Records `program args...` and stdin for every invocation.
pub struct RecordingRunner {
    calls: Mutex<Vec<(String, Vec<u8>)>>,
    stderr: Option<Vec<u8>>,
}

impl RecordingRunner {
    pub fn succeeding() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            stderr: None,
        }
    }

    pub fn failing(stderr: &[u8]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            stderr: Some(stderr.to_vec()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<u8>)> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, program: &str, args: &[&str], stdin: &[u8]) -> Output {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls
            .lock()
            .expect("lock")
            .push((line, stdin.to_vec()));
        output(self.stderr.as_ref())
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        Ok(self.record(program, args, &[]))
    }

    async fn run_with_timeout(&self, program: &str, args: &[&str], _: Duration) -> Result<Output> {
        Ok(self.record(program, args, &[]))
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output> {
        Ok(self.record(program, args, stdin))
    }
}
