//! Book builder: render into the volume directory, then write the redirect page.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

use anthology_book::BookError;

use crate::html::{url_path, HtmlRenderer};
use crate::renderer::{CommandRenderer, RenderContext, Renderer, RendererKind};
use crate::templates::TemplateEngine;

/// Configuration for building a book.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Book root; external renderers run here
    pub root: PathBuf,

    /// Directory holding `SUMMARY.md` and the chapters
    pub src_dir: PathBuf,

    /// Output root; receives the volume directory and the redirect page
    pub output_dir: PathBuf,

    /// Name of the subdirectory holding the rendered book
    pub volume: String,

    /// Book title
    pub title: String,

    /// Book description for the meta tag
    pub description: Option<String>,

    /// Document language
    pub language: String,

    /// Minify the stylesheet
    pub minify: bool,

    /// Which renderer produces the book
    pub renderer: RendererKind,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            src_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("_book"),
            volume: "1".to_string(),
            title: "Anthology".to_string(),
            description: None,
            language: "en".to_string(),
            minify: true,
            renderer: RendererKind::Html,
        }
    }
}

impl BuildConfig {
    /// Directory the renderer writes into.
    pub fn book_dir(&self) -> PathBuf {
        self.output_dir.join(&self.volume)
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of HTML pages in the rendered book
    pub pages: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output root
    pub output_dir: PathBuf,

    /// Redirect target, relative to the output root
    pub entry: String,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to load book: {0}")]
    Book(#[from] BookError),

    #[error("Invalid volume name `{0}`: must be a single directory name")]
    InvalidVolume(String),

    #[error("Failed to read source: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Renderer `{command}` could not be started: {message}")]
    RendererSpawn { command: String, message: String },

    #[error("Renderer `{command}` failed with {status}")]
    RendererFailed { command: String, status: String },

    #[error("Renderer produced no entry page at {0}")]
    MissingEntry(PathBuf),
}

/// Book builder.
pub struct StaticBuilder {
    config: BuildConfig,
    renderer: Box<dyn Renderer>,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a builder using the renderer named in the config.
    pub fn new(config: BuildConfig) -> Self {
        let renderer: Box<dyn Renderer> = match &config.renderer {
            RendererKind::Html => Box::new(HtmlRenderer::new()),
            RendererKind::Command(command) => Box::new(CommandRenderer::new(command.clone())),
        };

        Self::with_renderer(config, renderer)
    }

    /// Create a builder with an explicit renderer.
    pub fn with_renderer(config: BuildConfig, renderer: Box<dyn Renderer>) -> Self {
        Self {
            config,
            renderer,
            templates: TemplateEngine::new(),
        }
    }

    /// Build the book.
    ///
    /// The volume directory is recreated from scratch; anything else in the
    /// output root apart from the redirect page is left alone.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        validate_volume(&self.config.volume)?;

        let book_dir = self.config.book_dir();
        if book_dir.exists() {
            tracing::debug!("Removing previous build at {}", book_dir.display());
            fs::remove_dir_all(&book_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }
        fs::create_dir_all(&book_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::info!(
            "Rendering {} with the {} renderer",
            self.config.src_dir.display(),
            self.renderer.name()
        );

        self.renderer.render(&RenderContext {
            config: &self.config,
            dest: &book_dir,
        })?;

        let entry_page = book_dir.join("index.html");
        if !entry_page.is_file() {
            return Err(BuildError::MissingEntry(entry_page));
        }

        let entry = format!("{}/index.html", url_path(Path::new(&self.config.volume)));
        write_redirect(&self.templates, &self.config.output_dir, &entry)?;

        let pages = count_pages(&book_dir);
        let duration = start.elapsed();

        Ok(BuildResult {
            pages,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
            entry,
        })
    }
}

/// Write `index.html` at `output_root` forwarding visitors to `target`.
pub fn write_redirect(
    templates: &TemplateEngine,
    output_root: &Path,
    target: &str,
) -> Result<(), BuildError> {
    let html = templates
        .render_redirect(target)
        .map_err(|e| BuildError::TemplateError(e.to_string()))?;

    fs::create_dir_all(output_root).map_err(|e| BuildError::WriteError(e.to_string()))?;
    fs::write(output_root.join("index.html"), html)
        .map_err(|e| BuildError::WriteError(e.to_string()))?;

    tracing::debug!("Wrote redirect to {}", target);

    Ok(())
}

/// The volume directory is deleted on every build, so it must be one plain name.
fn validate_volume(volume: &str) -> Result<(), BuildError> {
    let mut components = Path::new(volume).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(BuildError::InvalidVolume(volume.to_string())),
    }
}

fn count_pages(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("html"))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct FixedPages(Vec<&'static str>);

    impl Renderer for FixedPages {
        fn name(&self) -> &str {
            "fixed"
        }

        fn render(&self, ctx: &RenderContext<'_>) -> Result<(), BuildError> {
            for page in &self.0 {
                fs::write(ctx.dest.join(page), "<p>page</p>")
                    .map_err(|e| BuildError::WriteError(e.to_string()))?;
            }
            Ok(())
        }
    }

    fn config(out: &Path) -> BuildConfig {
        BuildConfig {
            output_dir: out.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn writes_redirect_to_volume() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("_book");

        let builder = StaticBuilder::with_renderer(
            config(&out),
            Box::new(FixedPages(vec!["index.html", "a.html"])),
        );
        let result = builder.build().unwrap();

        assert_eq!(result.pages, 2);
        assert_eq!(result.entry, "1/index.html");
        let redirect = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(redirect.contains("url=1/index.html"));
    }

    #[test]
    fn clears_previous_volume() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("_book");
        fs::create_dir_all(out.join("1")).unwrap();
        fs::write(out.join("1/stale.html"), "old").unwrap();
        fs::write(out.join("CNAME"), "books.example.com").unwrap();

        let builder =
            StaticBuilder::with_renderer(config(&out), Box::new(FixedPages(vec!["index.html"])));
        builder.build().unwrap();

        assert!(!out.join("1/stale.html").exists());
        assert!(out.join("CNAME").exists());
    }

    #[test]
    fn missing_entry_page_is_an_error() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("_book");

        let builder =
            StaticBuilder::with_renderer(config(&out), Box::new(FixedPages(vec!["other.html"])));
        let err = builder.build().unwrap_err();

        assert!(matches!(err, BuildError::MissingEntry(_)));
        assert!(!out.join("index.html").exists());
    }

    #[test]
    fn rejects_unsafe_volume_names() {
        for volume in ["", "..", "a/b", "/abs"] {
            assert!(validate_volume(volume).is_err(), "{volume:?} accepted");
        }
        assert!(validate_volume("2").is_ok());
    }
}
