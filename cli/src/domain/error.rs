//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::remote::SessionError;

// ── Input errors ──────────────────────────────────────────────────────────────

/// Errors raised while validating the project record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("make sure you type a valid name for your project (3 to 20 characters).")]
    InvalidName(String),

    #[error(
        "make sure you type a valid hostname for your project. it must contain '.com', '.pt' or '.org', for example."
    )]
    InvalidHost(String),

    #[error("type a valid password. It must contain at least 7 characters.")]
    InvalidPassword,

    #[error("only digits allowed. min 0, max 9999.")]
    InvalidPort(String),

    #[error("pay attention to the options: [1] Yii, [2] WP or goHugo")]
    InvalidType(String),

    #[error("pay attention to the key name: '{0}' must be a file name under ~/.ssh")]
    InvalidKeyName(String),

    #[error("missing required value for '{0}' (pass it as a flag or run interactively)")]
    Missing(&'static str),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to installer configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}

// ── Connection errors ─────────────────────────────────────────────────────────

/// Errors from establishing the remote connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("could not connect to {target} after {attempts} attempts: {last}")]
    Exhausted {
        target: String,
        attempts: u32,
        last: String,
    },
}

// ── Step errors ───────────────────────────────────────────────────────────────

/// Fatal failures of a single provisioning step.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("command '{command}' failed on execution: {source}")]
    Remote {
        command: String,
        #[source]
        source: SessionError,
    },

    #[error("failed to push {filename} with '{sink}': {source}")]
    Transfer {
        filename: String,
        sink: String,
        #[source]
        source: SessionError,
    },

    #[error("failed to stream {filename} into the session: {reason}")]
    Payload { filename: String, reason: String },

    #[error("failed to read file on {}: {reason}", path.display())]
    ReadSource { path: PathBuf, reason: String },
}
