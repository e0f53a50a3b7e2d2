//! Publish command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use anthology_publish::{GitCli, PublishEnv, PublishOutcome, Publisher};

use crate::config::load_config;

/// Run the publish command.
///
/// A publish skipped for a non-canonical branch is a success.
pub fn run(config_path: &Path, dir: Option<PathBuf>) -> Result<()> {
    let loaded = load_config(config_path)?;
    let config = loaded.publish_config(dir);
    let env = PublishEnv::from_process(&config.vars);

    let outcome = Publisher::new(config, GitCli::new())
        .publish(&env)
        .context("Publish failed")?;

    match outcome {
        PublishOutcome::Published {
            commit_message,
            hosting_branch,
        } => {
            tracing::info!("Published to {}: {}", hosting_branch, commit_message);
        }
        PublishOutcome::Skipped(reason) => {
            tracing::info!("Nothing published: {}", reason);
        }
    }

    Ok(())
}
