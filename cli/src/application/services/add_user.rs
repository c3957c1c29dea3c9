//! Application service — add a user to an existing project.
//!
//! Appends the user's public key to the remote `authorized_keys` through the
//! system `ssh` client, then prepares the local working copy the same way a
//! new project does.

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, LocalGit, LocalWorkspace, ProgressReporter};
use crate::application::services::executor::StepContext;

/// Remote command that appends stdin to the authorized keys.
pub const APPEND_AUTHORIZED_KEY: &str = "cat >> ~/.ssh/authorized_keys";

/// Install the user's key on the remote, then set up the local clone.
///
/// # Errors
///
/// Returns an error if the key cannot be read, `ssh` fails, or the local
/// directory cannot be created.
pub async fn add_user(
    runner: &impl CommandRunner,
    ctx: &StepContext<'_, impl LocalWorkspace, impl LocalGit, impl ProgressReporter>,
) -> Result<()> {
    let project = ctx.project;
    ctx.reporter.step("Copying public key...");

    let home = ctx
        .workspace
        .home_dir()
        .context("Failed to find user home directory")?;
    let key_path = home.join(".ssh").join(format!("{}.pub", project.ssh_key));
    let key = ctx
        .workspace
        .read_file(&key_path)
        .with_context(|| format!("Failed to read file on {}", key_path.display()))?;

    let destination = format!("{}@{}", project.name, project.host);
    let port = project.port.to_string();
    let output = runner
        .run_with_stdin(
            "ssh",
            &["-p", &port, &destination, APPEND_AUTHORIZED_KEY],
            &key,
        )
        .await
        .context("ssh")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "failed to append key to {destination}: {} ({})",
            stderr.trim(),
            output.status
        );
    }
    tracing::info!(%destination, key = %key_path.display(), "public key appended");

    ctx.setup_local_dir()?;
    ctx.clone_locally().await?;
    Ok(())
}
