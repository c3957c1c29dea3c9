//! Domain types and validators for installer configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.k-installer/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    /// Connection retry settings.
    pub connect: ConnectSettings,
    /// Local paths.
    pub paths: PathSettings,
}

/// How the transport is (re)established.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectSettings {
    /// Wait before the first dial, giving a freshly booted host time to settle.
    pub initial_delay_ms: u64,
    /// Interval between "trying connection..." notices.
    pub tick_interval_ms: u64,
    /// Stop after this many failed dials. `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for ConnectSettings {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1500,
            tick_interval_ms: 800,
            max_attempts: None,
        }
    }
}

/// Local directories used by the installer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PathSettings {
    /// Parent of the local working directories, relative to the home directory.
    pub sites_dir: PathBuf,
    /// Directory holding the `post-update-*` hook templates.
    pub hooks_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            sites_dir: PathBuf::from("sites"),
            hooks_dir: PathBuf::from("post-update-files"),
        }
    }
}

/// Retry policy derived from [`ConnectSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectPolicy {
    pub initial_delay: Duration,
    pub tick_interval: Duration,
    pub max_attempts: Option<u32>,
}

impl ConnectSettings {
    /// Converts the raw settings into a retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick interval is zero or `max_attempts` is zero.
    pub fn policy(&self) -> Result<ConnectPolicy, ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "connect.tick_interval_ms".to_string(),
                value: "0".to_string(),
                valid: "any positive number of milliseconds".to_string(),
            });
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "connect.max_attempts".to_string(),
                value: "0".to_string(),
                valid: "a positive number, or omit for unlimited".to_string(),
            });
        }
        Ok(ConnectPolicy {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            max_attempts: self.max_attempts,
        })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
