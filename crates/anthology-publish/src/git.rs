//! Git command execution.

use std::path::Path;
use std::process::Command;

use crate::error::PublishError;

/// Runs version-control commands.
pub trait Vcs {
    /// Run one command in `dir` and return its stdout.
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String, PublishError>;
}

/// [`Vcs`] backed by the `git` executable.
#[derive(Debug, Clone, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }
}

impl Vcs for GitCli {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String, PublishError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| PublishError::GitSpawn(e.to_string()))?;

        if !output.status.success() {
            // `git commit` reports "nothing to commit" on stdout.
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => String::from_utf8_lossy(&output.stdout).trim().to_string(),
                reason => reason.to_string(),
            };
            return Err(PublishError::Git {
                command: args.join(" "),
                message,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
