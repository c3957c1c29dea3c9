//! Step executor — runs exactly one provisioning step.
//!
//! Remote success is judged against the ignorable-error allowlist rather
//! than the exit status alone. Local steps go through the workspace and git
//! ports and never touch the connection.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{DirSetup, LocalGit, LocalWorkspace, ProgressReporter, RemoteShell};
use crate::application::services::transfer::{PushOutcome, push_file};
use crate::domain::{
    FileKind, PathSettings, ProjectConfig, ProvisioningProfile, Step, StepError, push_spec,
};

/// Name the cloned remote is renamed to.
pub const HUB_REMOTE: &str = "hub";

/// Collaborators and inputs shared by every step of a run.
pub struct StepContext<'a, W, G, R> {
    pub project: &'a ProjectConfig,
    pub paths: &'a PathSettings,
    pub workspace: &'a W,
    pub git: &'a G,
    pub reporter: &'a R,
}

/// How a step finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    /// A remote error matched the allowlist and was swallowed.
    IgnoredError(String),
}

impl<W: LocalWorkspace, G: LocalGit, R: ProgressReporter> StepContext<'_, W, G, R> {
    /// Absolute path of the project's local working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn local_dir(&self) -> Result<PathBuf> {
        let home = self
            .workspace
            .home_dir()
            .context("Failed to find user home directory")?;
        Ok(home
            .join(&self.paths.sites_dir)
            .join(self.project.local_dir_name()))
    }

    /// Run `step`. Any error returned is fatal for the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the step fails with anything other than an
    /// ignorable remote error.
    pub async fn execute(
        &self,
        step: &Step,
        profile: &ProvisioningProfile,
        shell: &impl RemoteShell,
    ) -> Result<StepOutcome> {
        match step {
            Step::RemoteCommand(command) => self.run_remote(command, shell).await,
            Step::PushFile(kind) => self.push(*kind, profile, shell).await,
            Step::LocalDirSetup => {
                self.setup_local_dir()?;
                Ok(StepOutcome::Completed)
            }
            Step::LocalGitClone => {
                self.clone_locally().await?;
                Ok(StepOutcome::Completed)
            }
        }
    }

    async fn run_remote(&self, command: &str, shell: &impl RemoteShell) -> Result<StepOutcome> {
        self.reporter.step(command);
        match shell.run(command).await {
            Ok(output) => {
                tracing::debug!(command, stdout_bytes = output.stdout.len(), "command finished");
                Ok(StepOutcome::Completed)
            }
            Err(err) if err.is_ignorable() => {
                tracing::info!(command, error = %err, "ignoring benign remote exit");
                Ok(StepOutcome::IgnoredError(err.to_string()))
            }
            Err(err) => {
                tracing::error!(command, error = %err, "command failed on execution");
                Err(StepError::Remote {
                    command: command.to_string(),
                    source: err,
                }
                .into())
            }
        }
    }

    async fn push(
        &self,
        kind: FileKind,
        profile: &ProvisioningProfile,
        shell: &impl RemoteShell,
    ) -> Result<StepOutcome> {
        let home = self
            .workspace
            .home_dir()
            .context("Failed to find user home directory")?;
        let spec = push_spec(kind, self.project, profile, &self.paths.hooks_dir, &home);

        let content = self
            .workspace
            .read_file(&spec.source)
            .map_err(|e| StepError::ReadSource {
                path: spec.source.clone(),
                reason: format!("{e:#}"),
            })?;

        self.reporter
            .step(&format!("{}... {}", spec.filename, spec.sink_command));
        let outcome = push_file(shell, spec.filename, content, &spec.sink_command).await?;
        Ok(match outcome {
            PushOutcome::Completed => StepOutcome::Completed,
            PushOutcome::Ignored(text) => StepOutcome::IgnoredError(text),
        })
    }

    /// Create the local working directory, replacing an old one.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory is unknown or the directory
    /// cannot be recreated.
    pub fn setup_local_dir(&self) -> Result<PathBuf> {
        self.reporter.step("Creating directory...");
        let dir = self.local_dir()?;
        match self.workspace.recreate_dir(&dir)? {
            DirSetup::Created => {
                self.reporter
                    .success(&format!("{} successfully created.", dir.display()));
            }
            DirSetup::Replaced => {
                self.reporter.warn(&format!(
                    "{} already existed. Removed the old one and created a new one.",
                    dir.display()
                ));
            }
        }
        Ok(dir)
    }

    /// Clone the hub repository into the local directory, then rename its
    /// remote to [`HUB_REMOTE`].
    ///
    /// Git failures are reported as warnings; the run carries on.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is missing or git cannot be spawned.
    pub async fn clone_locally(&self) -> Result<()> {
        let dir = self.local_dir()?;
        anyhow::ensure!(
            self.workspace.is_dir(&dir),
            "Failed to change directory to {}",
            dir.display()
        );

        let url = self.project.remote_repo_url();
        self.reporter.step("Cloning repository...");
        let cloned = self.git.clone_into(&url, &dir).await?;
        self.report_git("git clone", &cloned);

        let renamed = self.git.rename_remote(&dir, "origin", HUB_REMOTE).await?;
        self.report_git("git remote rename", &renamed);
        Ok(())
    }

    fn report_git(&self, what: &str, output: &std::process::Output) {
        if output.status.success() {
            tracing::debug!(what, "local git command succeeded");
            return;
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::warn!(what, status = %output.status, stderr = %stderr.trim(), "local git command failed");
        self.reporter
            .warn(&format!("{what} failed ({}): {}", output.status, stderr.trim()));
    }
}
