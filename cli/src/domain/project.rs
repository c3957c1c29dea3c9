//! The project record and its validators.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::InputError;

/// Port used when the user leaves the port prompt empty.
pub const DEFAULT_SSH_PORT: u16 = 22;

#[allow(clippy::expect_used)] // compile-time constant pattern
static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{2,19}$").expect("valid regex"));

// ── Types ─────────────────────────────────────────────────────────────────────

/// Kind of web project being provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    /// Yii application.
    Yii,
    /// WordPress or goHugo site.
    WordPress,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yii => f.write_str("Yii"),
            Self::WordPress => f.write_str("WP"),
        }
    }
}

/// A password that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Validated project record, built once by the input collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Project name; also the remote login user.
    pub name: String,
    pub host: String,
    pub password: Password,
    pub port: u16,
    pub project_type: ProjectType,
    /// Public key file name under `~/.ssh`, without the `.pub` suffix.
    pub ssh_key: String,
}

/// Everything the transport needs to dial one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Password,
}

impl fmt::Display for ConnectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.username, self.host, self.port)
    }
}

impl ProjectConfig {
    /// Connection parameters: the project name doubles as the SSH user.
    #[must_use]
    pub fn connect_target(&self) -> ConnectTarget {
        ConnectTarget {
            host: self.host.clone(),
            port: self.port,
            username: self.name.clone(),
            password: self.password.clone(),
        }
    }

    /// Name of the bare hub repository on the remote, e.g. `blog_hub.git`.
    #[must_use]
    pub fn hub_repo(&self) -> String {
        hub_repo_name(&self.name)
    }

    /// Remote hooks directory of the hub repository.
    #[must_use]
    pub fn hub_hooks_dir(&self) -> String {
        format!("~/private/repos/{}/hooks", self.hub_repo())
    }

    /// Name of the local working directory, e.g. `blog.dev`.
    #[must_use]
    pub fn local_dir_name(&self) -> String {
        format!("{}.dev", self.name)
    }

    /// SSH URL of the hub repository for local clones.
    #[must_use]
    pub fn remote_repo_url(&self) -> String {
        let authority = if self.port == DEFAULT_SSH_PORT {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        };
        format!(
            "ssh://{name}@{authority}/home/{name}/private/repos/{repo}",
            name = self.name,
            repo = self.hub_repo()
        )
    }
}

/// Bare hub repository name for a project called `name`.
#[must_use]
pub fn hub_repo_name(name: &str) -> String {
    format!("{name}_hub.git")
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates the project name (3 to 20 characters, no separators).
///
/// # Errors
///
/// Returns [`InputError::InvalidName`] when the name does not match.
pub fn validate_project_name(input: &str) -> Result<String, InputError> {
    let name = input.trim();
    if PROJECT_NAME_RE.is_match(name) {
        Ok(name.to_string())
    } else {
        Err(InputError::InvalidName(name.to_string()))
    }
}

/// Validates the hostname (more than 5 characters, no whitespace).
///
/// # Errors
///
/// Returns [`InputError::InvalidHost`] when the hostname is too short.
pub fn validate_hostname(input: &str) -> Result<String, InputError> {
    let host = input.trim();
    if host.len() <= 5 || host.chars().any(char::is_whitespace) {
        return Err(InputError::InvalidHost(host.to_string()));
    }
    Ok(host.to_string())
}

/// Validates the password (more than 6 characters).
///
/// # Errors
///
/// Returns [`InputError::InvalidPassword`] when the password is too short.
pub fn validate_password(input: &str) -> Result<Password, InputError> {
    if input.chars().count() <= 6 {
        return Err(InputError::InvalidPassword);
    }
    Ok(Password(input.to_string()))
}

/// Parses the port; an empty answer selects [`DEFAULT_SSH_PORT`].
///
/// # Errors
///
/// Returns [`InputError::InvalidPort`] for non-digits or more than 4 digits.
pub fn parse_port(input: &str) -> Result<u16, InputError> {
    let port = input.trim();
    if port.is_empty() {
        return Ok(DEFAULT_SSH_PORT);
    }
    if port.len() > 4 || !port.chars().all(|c| c.is_ascii_digit()) {
        return Err(InputError::InvalidPort(port.to_string()));
    }
    port.parse()
        .map_err(|_| InputError::InvalidPort(port.to_string()))
}

/// Parses the project type from a menu number or a name.
///
/// # Errors
///
/// Returns [`InputError::InvalidType`] for anything else.
pub fn parse_project_type(input: &str) -> Result<ProjectType, InputError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "yii" => Ok(ProjectType::Yii),
        "2" | "wp" | "wordpress" | "hugo" | "gohugo" => Ok(ProjectType::WordPress),
        other => Err(InputError::InvalidType(other.to_string())),
    }
}

/// Validates the public key name; a trailing `.pub` is stripped.
///
/// # Errors
///
/// Returns [`InputError::InvalidKeyName`] for empty names or path separators.
pub fn validate_key_name(input: &str) -> Result<String, InputError> {
    let key = input.trim();
    let key = key.strip_suffix(".pub").unwrap_or(key);
    if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(InputError::InvalidKeyName(key.to_string()));
    }
    Ok(key.to_string())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
