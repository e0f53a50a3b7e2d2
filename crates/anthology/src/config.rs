//! `anthology.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use anthology_publish::{EnvVars, PublishConfig};
use anthology_static::{BuildConfig, RendererKind, DEFAULT_COMMAND};

/// Configuration file structure (anthology.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub book: BookSection,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub publish: PublishSection,
}

#[derive(Debug, Deserialize)]
pub struct BookSection {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub description: Option<String>,
    #[serde(default = "default_src")]
    pub src: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RendererName {
    /// Built-in HTML renderer
    Html,
    /// External command from `build.command`
    Command,
}

#[derive(Debug, Deserialize)]
pub struct BuildSection {
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_volume")]
    pub volume: String,
    #[serde(default = "default_renderer")]
    pub renderer: RendererName,
    #[serde(default = "default_command")]
    pub command: Vec<String>,
    #[serde(default = "default_true")]
    pub minify: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PublishSection {
    pub canonical_branch: String,
    pub hosting_branch: String,
    pub remote_url: String,
    pub committer_name: String,
    pub committer_email: String,
    pub marker_var: String,
    pub branch_var: String,
    pub token_var: String,
    pub slug_var: String,
}

fn default_title() -> String {
    "Anthology".to_string()
}
fn default_src() -> String {
    "src".to_string()
}
fn default_language() -> String {
    "en".to_string()
}
fn default_output() -> String {
    "_book".to_string()
}
fn default_volume() -> String {
    "1".to_string()
}
fn default_renderer() -> RendererName {
    RendererName::Html
}
fn default_command() -> Vec<String> {
    DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect()
}
fn default_true() -> bool {
    true
}

impl Default for BookSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            authors: Vec::new(),
            description: None,
            src: default_src(),
            language: default_language(),
        }
    }
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output: default_output(),
            volume: default_volume(),
            renderer: default_renderer(),
            command: default_command(),
            minify: true,
        }
    }
}

impl Default for PublishSection {
    fn default() -> Self {
        let publish = PublishConfig::default();
        let vars = EnvVars::default();
        Self {
            canonical_branch: publish.canonical_branch,
            hosting_branch: publish.hosting_branch,
            remote_url: publish.remote_url,
            committer_name: publish.committer_name,
            committer_email: publish.committer_email,
            marker_var: vars.marker,
            branch_var: vars.branch,
            token_var: vars.token,
            slug_var: vars.slug,
        }
    }
}

/// A loaded config file and the directory its relative paths start from.
#[derive(Debug)]
pub struct Loaded {
    pub root: PathBuf,
    pub file: ConfigFile,
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<Loaded> {
    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let file: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::debug!("Loaded config from {}", path.display());
        return Ok(Loaded { root, file });
    }

    tracing::debug!("{} not found, using defaults", path.display());
    Ok(Loaded {
        root,
        file: ConfigFile::default(),
    })
}

impl Loaded {
    /// Output root, with an optional command-line override.
    pub fn output_dir(&self, output: Option<PathBuf>) -> PathBuf {
        output.unwrap_or_else(|| self.root.join(&self.file.build.output))
    }

    /// Builder configuration, with command-line overrides applied.
    pub fn build_config(&self, output: Option<PathBuf>, renderer: Option<RendererName>) -> BuildConfig {
        let book = &self.file.book;
        let build = &self.file.build;

        let renderer = match renderer.unwrap_or(build.renderer) {
            RendererName::Html => RendererKind::Html,
            RendererName::Command => RendererKind::Command(build.command.clone()),
        };

        BuildConfig {
            root: self.root.clone(),
            src_dir: self.root.join(&book.src),
            output_dir: self.output_dir(output),
            volume: build.volume.clone(),
            title: book.title.clone(),
            description: book.description.clone(),
            language: book.language.clone(),
            minify: build.minify,
            renderer,
        }
    }

    /// Publisher configuration, with command-line overrides applied.
    pub fn publish_config(&self, dir: Option<PathBuf>) -> PublishConfig {
        let publish = &self.file.publish;

        PublishConfig {
            output_dir: self.output_dir(dir),
            source_dir: self.root.clone(),
            canonical_branch: publish.canonical_branch.clone(),
            hosting_branch: publish.hosting_branch.clone(),
            remote_url: publish.remote_url.clone(),
            committer_name: publish.committer_name.clone(),
            committer_email: publish.committer_email.clone(),
            vars: EnvVars {
                marker: publish.marker_var.clone(),
                branch: publish.branch_var.clone(),
                token: publish.token_var.clone(),
                slug: publish.slug_var.clone(),
            },
        }
    }
}
