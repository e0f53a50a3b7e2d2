//! Book build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use anthology_static::StaticBuilder;

use crate::config::{load_config, RendererName};

/// Run the build command.
pub fn run(config_path: &Path, output: Option<PathBuf>, renderer: Option<RendererName>) -> Result<()> {
    let loaded = load_config(config_path)?;
    let config = loaded.build_config(output, renderer);

    tracing::info!("Building {} from {}", config.title, config.src_dir.display());

    let result = StaticBuilder::new(config)
        .build()
        .context("Build failed")?;

    tracing::info!("Built {} pages in {}ms", result.pages, result.duration_ms);
    tracing::info!(
        "Output: {} (entry {})",
        result.output_dir.display(),
        result.entry
    );

    Ok(())
}
