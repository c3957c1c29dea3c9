//! Remote session outcomes and the ignorable-error rule.
//!
//! Pure types only: the SSH adapter in `crate::infra::ssh` translates wire
//! events into these values, and the step executor classifies them.

use std::fmt;

use thiserror::Error;

/// Substring that reclassifies a remote failure as benign.
///
/// Git and a few other tools exit non-zero while reporting an empty signal
/// reason even though the command did what we asked.
pub const IGNORABLE_MARKER: &str = "Reason was:  ()";

/// How a remote command terminated unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteExit {
    /// Exit status reported by the remote shell.
    pub status: u32,
    /// Exit signal, when the remote reported one.
    pub signal: Option<ExitSignal>,
}

/// Signal details attached to a remote exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitSignal {
    pub name: String,
    pub message: String,
    pub lang: String,
}

impl fmt::Display for RemoteExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.signal {
            None => write!(f, "Process exited with status {}", self.status),
            Some(sig) => write!(
                f,
                "Process exited with status {} from signal {}. Reason was: {} ({})",
                self.status, sig.name, sig.message, sig.lang
            ),
        }
    }
}

impl std::error::Error for RemoteExit {}

/// Error returned by a single remote session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to build session: {0}")]
    Open(String),

    #[error(transparent)]
    Exit(#[from] RemoteExit),

    /// Remote closed the session without reporting an exit status.
    #[error("wait: remote command exited without exit status or exit signal")]
    MissingStatus,

    #[error("{0}")]
    Transport(String),
}

impl SessionError {
    /// Returns `true` when the error text carries [`IGNORABLE_MARKER`].
    #[must_use]
    pub fn is_ignorable(&self) -> bool {
        is_ignorable(&self.to_string())
    }
}

/// Returns `true` when `error_text` contains [`IGNORABLE_MARKER`].
#[must_use]
pub fn is_ignorable(error_text: &str) -> bool {
    error_text.contains(IGNORABLE_MARKER)
}

/// Captured output of a successful session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionOutput {
    pub stdout: Vec<u8>,
}
