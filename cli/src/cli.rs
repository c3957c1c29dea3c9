//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::commands::input::DialoguerPrompter;

/// Provision remote hosts for web projects over SSH
#[derive(Parser)]
#[command(
    name = "k-installer",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Skip prompts; every project field must come from flags
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add new project
    New(commands::ProjectArgs),

    /// Add user to an existing project
    AddUser(commands::ProjectArgs),

    /// Show the provisioning steps for a project type
    Profile(commands::profile::ProfileArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            quiet,
            no_color,
            yes,
            config,
            command,
        } = self;

        if matches!(command, Command::Version) {
            commands::version::run();
            return Ok(ExitCode::SUCCESS);
        }

        let app = AppContext::new(&AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes, config },
        })?;
        let prompter = DialoguerPrompter::new(&app.output);

        match command {
            Command::New(args) => commands::new::run(&app, &args, &prompter).await,
            Command::AddUser(args) => commands::add_user::run(&app, &args, &prompter).await,
            Command::Profile(args) => commands::profile::run(&app, &args, &prompter),
            Command::Version => Ok(ExitCode::SUCCESS),
        }
    }
}
