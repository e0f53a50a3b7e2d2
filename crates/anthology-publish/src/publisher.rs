//! Publish sequence: fresh repository, one commit, one force-push.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::env::{EnvVars, PublishEnv};
use crate::error::{redact, PublishError};
use crate::gate::{Gate, GateOutcome, SkipReason};
use crate::git::Vcs;

/// Name the hosting remote is registered under.
const REMOTE: &str = "upstream";

/// Configuration for publishing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Built output root to publish
    pub output_dir: PathBuf,

    /// Checkout whose HEAD the build came from
    pub source_dir: PathBuf,

    /// The only branch allowed to publish
    pub canonical_branch: String,

    /// Remote branch receiving the snapshot
    pub hosting_branch: String,

    /// Remote URL; `{token}` and `{slug}` are substituted
    pub remote_url: String,

    pub committer_name: String,
    pub committer_email: String,

    /// Environment variable names
    pub vars: EnvVars,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("_book"),
            source_dir: PathBuf::from("."),
            canonical_branch: "master".to_string(),
            hosting_branch: "gh-pages".to_string(),
            remote_url: "https://{token}@github.com/{slug}.git".to_string(),
            committer_name: "anthology".to_string(),
            committer_email: "anthology@localhost".to_string(),
            vars: EnvVars::default(),
        }
    }
}

/// Result of a publish that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published {
        commit_message: String,
        hosting_branch: String,
    },
    Skipped(SkipReason),
}

/// Publishes the build output to the hosting branch.
pub struct Publisher<V: Vcs> {
    config: PublishConfig,
    vcs: V,
}

impl<V: Vcs> Publisher<V> {
    pub fn new(config: PublishConfig, vcs: V) -> Self {
        Self { config, vcs }
    }

    /// Gate, then commit the output directory and force-push it.
    ///
    /// The remote branch is replaced wholesale; its previous history is
    /// discarded. Any failing git command aborts the publish and leaves the
    /// local repository as it is.
    pub fn publish(&self, env: &PublishEnv) -> Result<PublishOutcome, PublishError> {
        if let GateOutcome::Skip(reason) = Gate::evaluate(&self.config, env)? {
            tracing::info!("Skipping publish: {}", reason);
            return Ok(PublishOutcome::Skipped(reason));
        }

        let token = env
            .token
            .as_deref()
            .ok_or_else(|| PublishError::MissingVariable(self.config.vars.token.clone()))?;
        let slug = env
            .slug
            .as_deref()
            .ok_or_else(|| PublishError::MissingVariable(self.config.vars.slug.clone()))?;

        let revision = self.git(&self.config.source_dir, &["rev-parse", "--short", "HEAD"], token)?;
        let revision = revision.trim();
        let commit_message = format!("Rebuild book from {}@{}", slug, revision);

        let out = &self.config.output_dir;
        let stale = out.join(".git");
        if stale.exists() {
            tracing::debug!("Removing previous staging repository {}", stale.display());
            fs::remove_dir_all(&stale).map_err(|e| PublishError::Io {
                path: stale.clone(),
                message: e.to_string(),
            })?;
        }

        let remote = self
            .config
            .remote_url
            .replace("{token}", token)
            .replace("{slug}", slug);
        let refspec = format!("HEAD:refs/heads/{}", self.config.hosting_branch);

        self.git(out, &["init", "--quiet"], token)?;
        self.git(out, &["config", "user.name", &self.config.committer_name], token)?;
        self.git(out, &["config", "user.email", &self.config.committer_email], token)?;
        self.git(out, &["config", "commit.gpgsign", "false"], token)?;
        self.git(out, &["remote", "add", REMOTE, &remote], token)?;
        self.git(out, &["add", "--all", "."], token)?;
        self.git(out, &["commit", "--quiet", "-m", &commit_message], token)?;

        tracing::info!(
            "Pushing {} to {} ({})",
            out.display(),
            self.config.hosting_branch,
            commit_message
        );
        self.git(out, &["push", "--force", "--quiet", REMOTE, &refspec], token)?;

        Ok(PublishOutcome::Published {
            commit_message,
            hosting_branch: self.config.hosting_branch.clone(),
        })
    }

    fn git(
        &self,
        dir: &std::path::Path,
        args: &[&str],
        secret: &str,
    ) -> Result<String, PublishError> {
        tracing::debug!("git {}", redact(&args.join(" "), secret));
        self.vcs.run(dir, args).map_err(|e| e.redacted(secret))
    }
}
