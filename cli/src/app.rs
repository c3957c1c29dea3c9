//! Application context — unified state passed to every command handler.
//!
//! Adding a new cross-cutting concern (e.g. `--verbose`) requires only one
//! field change here — zero command signatures change.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::InstallerConfig;
use crate::infra::command_runner::{DEFAULT_GIT_TIMEOUT, DEFAULT_SSH_TIMEOUT, TokioCommandRunner};
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::infra::git::GitCli;
use crate::output::OutputContext;

/// Environment variable that implies `--yes`.
pub const YES_ENV: &str = "K_INSTALLER_YES";

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `K_INSTALLER_YES` env vars).
    pub yes: bool,
    /// Explicit config file (`--config`).
    pub config: Option<PathBuf>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
///
/// Constructed once in `Cli::run()` and passed as `&AppContext` to all
/// command handlers.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Loaded installer configuration (defaults when no file exists).
    pub config: InstallerConfig,
    /// Local filesystem under the user's home directory.
    pub workspace: LocalFs,
    /// Local `git` CLI.
    pub git: GitCli<TokioCommandRunner>,
    /// Runner for the system `ssh` client.
    pub ssh_runner: TokioCommandRunner,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or
    /// `K_INSTALLER_YES` environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var(YES_ENV).is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let store = YamlConfigStore::new(flags.behaviour.config.clone());
        let config = store.load()?;
        tracing::debug!(?config, "configuration loaded");

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            config,
            workspace: LocalFs::new(),
            git: GitCli::new(TokioCommandRunner::new(DEFAULT_GIT_TIMEOUT)),
            ssh_runner: TokioCommandRunner::new(DEFAULT_SSH_TIMEOUT),
            non_interactive,
        })
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or
    /// `K_INSTALLER_YES` env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
