//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::InstallerConfig;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "K_INSTALLER_CONFIG";

/// Loads `InstallerConfig` from a YAML file on disk.
///
/// Lookup order: explicit path (`--config`), `K_INSTALLER_CONFIG`,
/// `~/.k-installer/config.yaml`.
#[derive(Debug, Default)]
pub struct YamlConfigStore {
    override_path: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(override_path: Option<PathBuf>) -> Self {
        Self { override_path }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<InstallerConfig> {
        let path = self.path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(InstallerConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(InstallerConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.override_path {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".k-installer").join("config.yaml"))
    }
}
