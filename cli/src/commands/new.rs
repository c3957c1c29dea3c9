//! `k-installer new` — provision a new project on its remote host.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::RemoteShell;
use crate::application::services::executor::StepContext;
use crate::application::services::orchestrator::Orchestrator;
use crate::commands::ProjectArgs;
use crate::commands::input::{PASSWORD_ENV, Prompter, collect_project};
use crate::domain::ProvisioningProfile;
use crate::infra::ssh::SshDialer;
use crate::output::TerminalReporter;

const OVERWRITE_WARNING: &str = "Be aware that setting a new project will overwrite all previous environment configuration. Do you want to continue?";

/// Run the new-project command.
///
/// # Errors
///
/// Returns an error if input is invalid, the connection cannot be
/// established, or a provisioning step fails fatally.
pub async fn run(
    app: &AppContext,
    args: &ProjectArgs,
    prompter: &impl Prompter,
) -> Result<ExitCode> {
    let policy = app.config.connect.policy()?;
    if !confirm_overwrite(app)? {
        app.output.dim("Exiting program...");
        return Ok(ExitCode::SUCCESS);
    }

    let password = std::env::var(PASSWORD_ENV).ok();
    let project = collect_project(args, password.as_deref(), app.non_interactive, prompter)?;
    let profile = ProvisioningProfile::for_project(&project);
    tracing::info!(
        project = %project.name,
        host = %project.host,
        project_type = %project.project_type,
        steps = profile.len(),
        "provisioning new project"
    );

    let reporter = TerminalReporter::new(&app.output);
    let mut orchestrator = Orchestrator::new(StepContext {
        project: &project,
        paths: &app.config.paths,
        workspace: &app.workspace,
        git: &app.git,
        reporter: &reporter,
    });

    let shell = orchestrator
        .connect(&SshDialer::new(), &project.connect_target(), &policy)
        .await?;
    let result = orchestrator.run(&profile, &shell).await;
    if let Err(e) = shell.disconnect().await {
        tracing::warn!(error = %e, "failed to close connection");
    }
    let summary = result?;
    if !summary.ignored.is_empty() {
        tracing::info!(ignored = ?summary.ignored, "run finished with ignored remote errors");
    }

    app.output.success("Project successfully created.");
    Ok(ExitCode::SUCCESS)
}

/// `--yes` accepts the overwrite; at the prompt only an explicit yes does.
fn confirm_overwrite(app: &AppContext) -> Result<bool> {
    if app.non_interactive {
        return Ok(true);
    }
    app.confirm(OVERWRITE_WARNING, false)
}
