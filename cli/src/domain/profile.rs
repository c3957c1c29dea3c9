//! Provisioning profiles: the ordered step list for a project type.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::project::{ProjectConfig, ProjectType, hub_repo_name};

/// Header mode sent ahead of every pushed file.
pub const PUSH_FILE_MODE: &str = "C0644";

/// A file the installer knows how to place on the remote host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Git `post-update` hook for the hub repository.
    PostUpdateHook,
    /// The user's public key, installed as `authorized_keys`.
    SshPublicKey,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PostUpdateHook => f.write_str("post-update-hook"),
            Self::SshPublicKey => f.write_str("ssh-public-key"),
        }
    }
}

/// One provisioning step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Literal shell command run on the remote host.
    RemoteCommand(String),
    /// Push a well-known file to its remote destination.
    PushFile(FileKind),
    /// Create (or replace) the local working directory.
    LocalDirSetup,
    /// Clone the hub repository into the local working directory.
    LocalGitClone,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteCommand(cmd) => f.write_str(cmd),
            Self::PushFile(FileKind::PostUpdateHook) => f.write_str("post-update configuration"),
            Self::PushFile(FileKind::SshPublicKey) => f.write_str("copying ssh public key"),
            Self::LocalDirSetup => f.write_str("creating local directory"),
            Self::LocalGitClone => f.write_str("git clone on local directory"),
        }
    }
}

/// Where a pushed file comes from and how the remote sink receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSpec {
    /// Local file whose bytes are sent.
    pub source: PathBuf,
    /// File name announced in the push header.
    pub filename: &'static str,
    /// Remote command that consumes the push stream.
    pub sink_command: String,
}

/// Resolves the source and sink for `kind`.
///
/// `hooks_dir` holds the hook templates; `home` is the local home directory.
#[must_use]
pub fn push_spec(
    kind: FileKind,
    project: &ProjectConfig,
    profile: &ProvisioningProfile,
    hooks_dir: &Path,
    home: &Path,
) -> PushSpec {
    match kind {
        FileKind::PostUpdateHook => PushSpec {
            source: hooks_dir.join(profile.hook_template()),
            filename: "post-update",
            sink_command: format!("scp -qrt {}", project.hub_hooks_dir()),
        },
        FileKind::SshPublicKey => PushSpec {
            source: home.join(".ssh").join(format!("{}.pub", project.ssh_key)),
            filename: "authorized_keys",
            sink_command: "scp -qrt ~/.ssh".to_string(),
        },
    }
}

/// Encodes the push header line: `C0644 <len> <filename>\n`.
#[must_use]
pub fn push_header(len: usize, filename: &str) -> String {
    format!("{PUSH_FILE_MODE} {len} {filename}\n")
}

/// Ordered, immutable list of steps for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningProfile {
    hook_template: String,
    steps: Vec<Step>,
}

impl ProvisioningProfile {
    /// Builds the profile for the project's type.
    #[must_use]
    pub fn for_project(project: &ProjectConfig) -> Self {
        Self::for_type(project.project_type, &project.name)
    }

    /// Builds the profile for a project of `project_type` called `name`.
    #[must_use]
    pub fn for_type(project_type: ProjectType, name: &str) -> Self {
        match project_type {
            ProjectType::Yii => Self::from_steps("post-update-yii", Vec::new()),
            ProjectType::WordPress => {
                let repo = hub_repo_name(name);
                let steps = vec![
                    Step::RemoteCommand(
                        "echo -e '[User]\nname = Pipi, server girl' > .gitconfig".to_string(),
                    ),
                    Step::RemoteCommand("cd ~/www/www/ && git init".to_string()),
                    Step::RemoteCommand(
                        "cd ~/www/www/ && touch readme.txt && git add . ".to_string(),
                    ),
                    Step::RemoteCommand(
                        "cd ~/www/www/ && git commit -m 'on the beginning was the commit'"
                            .to_string(),
                    ),
                    Step::RemoteCommand(format!(
                        "cd ~/private/ && mkdir repos && cd repos && mkdir {repo} && cd {repo} && git --bare init"
                    )),
                    Step::RemoteCommand(format!(
                        "cd ~/www/www && git remote add hub ~/private/repos/{repo} && git push hub master"
                    )),
                    Step::PushFile(FileKind::PostUpdateHook),
                    Step::RemoteCommand(format!(
                        "cd ~/www/www && git remote add hub ~/private/repos/{repo}/hooks && chmod 755 post-update"
                    )),
                    Step::LocalDirSetup,
                    Step::LocalGitClone,
                    Step::PushFile(FileKind::SshPublicKey),
                ];
                Self::from_steps("post-update-wp", steps)
            }
        }
    }

    /// Builds a profile from an explicit step list.
    #[must_use]
    pub fn from_steps(hook_template: &str, steps: Vec<Step>) -> Self {
        Self {
            hook_template: hook_template.to_string(),
            steps,
        }
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// File name of the hook template under the hooks directory.
    #[must_use]
    pub fn hook_template(&self) -> &str {
        &self.hook_template
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
