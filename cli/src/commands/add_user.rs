//! `k-installer add-user` — give a user access to an existing project.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::add_user::add_user;
use crate::application::services::executor::StepContext;
use crate::commands::ProjectArgs;
use crate::commands::input::{PASSWORD_ENV, Prompter, collect_project};
use crate::output::TerminalReporter;

/// Run the add-user command.
///
/// # Errors
///
/// Returns an error if input is invalid, the key cannot be installed, or the
/// local directory cannot be prepared.
pub async fn run(
    app: &AppContext,
    args: &ProjectArgs,
    prompter: &impl Prompter,
) -> Result<ExitCode> {
    let password = std::env::var(PASSWORD_ENV).ok();
    let project = collect_project(args, password.as_deref(), app.non_interactive, prompter)?;

    let reporter = TerminalReporter::new(&app.output);
    let ctx = StepContext {
        project: &project,
        paths: &app.config.paths,
        workspace: &app.workspace,
        git: &app.git,
        reporter: &reporter,
    };

    add_user(&app.ssh_runner, &ctx).await?;

    app.output.success("User successfully added.");
    Ok(ExitCode::SUCCESS)
}
