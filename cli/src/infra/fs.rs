//! Filesystem infrastructure — implements `LocalWorkspace`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{DirSetup, LocalWorkspace};

/// Permissions of the local working directory.
#[cfg(unix)]
const LOCAL_DIR_MODE: u32 = 0o755;

/// Production `LocalWorkspace` over `std::fs`.
#[derive(Debug, Default)]
pub struct LocalFs {
    home: Option<PathBuf>,
}

impl LocalFs {
    /// Resolve the home directory from the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `home` instead of the real home directory.
    #[must_use]
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
        }
    }
}

impl LocalWorkspace for LocalFs {
    fn home_dir(&self) -> Result<PathBuf> {
        match &self.home {
            Some(home) => Ok(home.clone()),
            None => dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory")),
        }
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).with_context(|| format!("reading file {}", path.display()))
    }

    fn recreate_dir(&self, path: &Path) -> Result<DirSetup> {
        let setup = if std::fs::symlink_metadata(path).is_ok() {
            remove_any(path)?;
            DirSetup::Replaced
        } else {
            DirSetup::Created
        };
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))?;
        set_mode(path)?;
        Ok(setup)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

fn remove_any(path: &Path) -> Result<()> {
    let meta = std::fs::symlink_metadata(path)
        .with_context(|| format!("inspecting {}", path.display()))?;
    if meta.is_dir() {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("removing directory {}", path.display()))
    } else {
        std::fs::remove_file(path).with_context(|| format!("removing file {}", path.display()))
    }
}

fn set_mode(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(LOCAL_DIR_MODE))
            .with_context(|| format!("setting permissions on {}", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
