//! `k-installer profile` — show the steps a project type runs (no connection).

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::commands::input::{Prompter, collect_name_and_type};
use crate::domain::ProvisioningProfile;

/// Arguments for the profile command.
#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    /// Project name used in repository paths
    #[arg(long)]
    pub name: Option<String>,

    /// Project type: 1 or yii, 2 or wp/hugo
    #[arg(long = "type", value_name = "TYPE")]
    pub project_type: Option<String>,
}

/// Run the profile command.
///
/// # Errors
///
/// Returns an error if the name or type is invalid or missing.
pub fn run(app: &AppContext, args: &ProfileArgs, prompter: &impl Prompter) -> Result<ExitCode> {
    let (name, project_type) = collect_name_and_type(
        args.name.as_deref(),
        args.project_type.as_deref(),
        app.non_interactive,
        prompter,
    )?;
    let profile = ProvisioningProfile::for_type(project_type, &name);

    app.output.header(&format!("{project_type} profile for '{name}'"));
    app.output.kv("hook template", profile.hook_template());
    if profile.is_empty() {
        app.output.dim("No remote steps.");
    }
    for (i, step) in profile.steps().iter().enumerate() {
        let shown = step.to_string().replace('\n', "\\n");
        app.output.kv(&format!("{:>2}.", i + 1), &shown);
    }
    Ok(ExitCode::SUCCESS)
}
