//! Infrastructure implementation of the `LocalGit` port via the `git` CLI.

use std::path::Path;
use std::process::Output;

use anyhow::Result;

use crate::application::ports::{CommandRunner, LocalGit};

/// Runs `git -C <dir> ...` through a [`CommandRunner`].
pub struct GitCli<R> {
    runner: R,
}

impl<R: CommandRunner> GitCli<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn git_in(&self, dir: &Path, args: &[&str]) -> Result<Output> {
        let dir = dir.to_string_lossy();
        let mut full = vec!["-C", &*dir];
        full.extend_from_slice(args);
        self.runner.run("git", &full).await
    }
}

impl<R: CommandRunner> LocalGit for GitCli<R> {
    async fn clone_into(&self, url: &str, dir: &Path) -> Result<Output> {
        self.git_in(dir, &["clone", url, "."]).await
    }

    async fn rename_remote(&self, dir: &Path, from: &str, to: &str) -> Result<Output> {
        self.git_in(dir, &["remote", "rename", from, to]).await
    }
}
