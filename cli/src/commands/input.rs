//! Interactive collection of the project record.
//!
//! Flags win over prompts. An invalid flag value is fatal; an invalid answer
//! at a prompt prints the validation message and asks again.

use anyhow::Result;

use crate::commands::ProjectArgs;
use crate::domain::project::{
    parse_port, parse_project_type, validate_hostname, validate_key_name, validate_password,
    validate_project_name,
};
use crate::domain::{InputError, Password, ProjectConfig, ProjectType};
use crate::output::OutputContext;

/// Environment variable carrying the remote password.
pub const PASSWORD_ENV: &str = "K_INSTALLER_PASSWORD";

/// Source of answers for missing project fields.
pub trait Prompter {
    /// Ask for a line of text; an empty answer is allowed.
    fn input(&self, prompt: &str) -> Result<String>;
    /// Ask for a secret without echoing it.
    fn password(&self, prompt: &str) -> Result<String>;
    /// Tell the user why the last answer was rejected.
    fn invalid(&self, message: &str);
}

/// Terminal prompts via `dialoguer`.
pub struct DialoguerPrompter<'a> {
    output: &'a OutputContext,
}

impl<'a> DialoguerPrompter<'a> {
    #[must_use]
    pub fn new(output: &'a OutputContext) -> Self {
        Self { output }
    }
}

impl Prompter for DialoguerPrompter<'_> {
    fn input(&self, prompt: &str) -> Result<String> {
        let answer = dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn password(&self, prompt: &str) -> Result<String> {
        let answer = dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        Ok(answer)
    }

    fn invalid(&self, message: &str) {
        self.output.warn(message);
    }
}

/// How one field is asked for and checked.
struct Field<T> {
    label: &'static str,
    prompt: &'static str,
    secret: bool,
    /// Raw value used when prompting is disabled and no flag was given.
    fallback: Option<&'static str>,
    validate: fn(&str) -> Result<T, InputError>,
}

const NAME: Field<String> = Field {
    label: "name",
    prompt: "project name",
    secret: false,
    fallback: None,
    validate: validate_project_name,
};

const HOST: Field<String> = Field {
    label: "host",
    prompt: "hostname",
    secret: false,
    fallback: None,
    validate: validate_hostname,
};

const PASSWORD: Field<Password> = Field {
    label: "password",
    prompt: "password",
    secret: true,
    fallback: None,
    validate: validate_password,
};

const PORT: Field<u16> = Field {
    label: "port",
    prompt: "port (default 22)",
    secret: false,
    fallback: Some(""),
    validate: parse_port,
};

const TYPE: Field<ProjectType> = Field {
    label: "type",
    prompt: "[1] Yii, [2] WP or goHugo. Enter project type",
    secret: false,
    fallback: None,
    validate: parse_project_type,
};

const SSH_KEY: Field<String> = Field {
    label: "ssh-key",
    prompt: "public ssh key name",
    secret: false,
    fallback: None,
    validate: validate_key_name,
};

impl<T> Field<T> {
    fn resolve(
        &self,
        flag: Option<&str>,
        non_interactive: bool,
        prompter: &impl Prompter,
    ) -> Result<T> {
        if let Some(raw) = flag {
            return Ok((self.validate)(raw)?);
        }
        if non_interactive {
            let raw = self.fallback.ok_or(InputError::Missing(self.label))?;
            return Ok((self.validate)(raw)?);
        }
        loop {
            let raw = if self.secret {
                prompter.password(self.prompt)?
            } else {
                prompter.input(self.prompt)?
            };
            match (self.validate)(&raw) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    tracing::debug!(field = self.label, "rejected input");
                    prompter.invalid(&err.to_string());
                }
            }
        }
    }
}

/// Build the project record from flags, then prompts.
///
/// `password` is the value of [`PASSWORD_ENV`], if set.
///
/// # Errors
///
/// Returns an [`InputError`] for an invalid flag value or a field that is
/// missing while prompting is disabled, or a prompt I/O error.
pub fn collect_project(
    args: &ProjectArgs,
    password: Option<&str>,
    non_interactive: bool,
    prompter: &impl Prompter,
) -> Result<ProjectConfig> {
    let name = NAME.resolve(args.name.as_deref(), non_interactive, prompter)?;
    let host = HOST.resolve(args.host.as_deref(), non_interactive, prompter)?;
    let password = PASSWORD.resolve(password, non_interactive, prompter)?;
    let port = PORT.resolve(args.port.as_deref(), non_interactive, prompter)?;
    let project_type = TYPE.resolve(args.project_type.as_deref(), non_interactive, prompter)?;
    let ssh_key = SSH_KEY.resolve(args.ssh_key.as_deref(), non_interactive, prompter)?;

    Ok(ProjectConfig {
        name,
        host,
        password,
        port,
        project_type,
        ssh_key,
    })
}

/// Resolve just the name and type, for commands that never connect.
///
/// # Errors
///
/// Same as [`collect_project`] for those two fields.
pub fn collect_name_and_type(
    name: Option<&str>,
    project_type: Option<&str>,
    non_interactive: bool,
    prompter: &impl Prompter,
) -> Result<(String, ProjectType)> {
    Ok((
        NAME.resolve(name, non_interactive, prompter)?,
        TYPE.resolve(project_type, non_interactive, prompter)?,
    ))
}
