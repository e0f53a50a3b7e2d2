//! Renderer seam: what turns the source tree into the rendered book.

use std::path::Path;
use std::process::Command;

use crate::builder::{BuildConfig, BuildError};

/// External command used when none is configured.
pub const DEFAULT_COMMAND: &[&str] = &["mdbook", "build", "--dest-dir", "{dest}"];

/// Which renderer a build uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererKind {
    /// Built-in HTML renderer
    Html,

    /// External tool; `{dest}` and `{src}` in arguments are substituted
    Command(Vec<String>),
}

/// Everything a renderer gets to see.
pub struct RenderContext<'a> {
    pub config: &'a BuildConfig,

    /// Empty directory to render into
    pub dest: &'a Path,
}

/// Produces a rendered book in `ctx.dest`.
pub trait Renderer {
    /// Short name for log output.
    fn name(&self) -> &str;

    /// Render the book. Any error aborts the build.
    fn render(&self, ctx: &RenderContext<'_>) -> Result<(), BuildError>;
}

/// Runs an external book tool such as `mdbook build`.
///
/// The tool's own output goes straight to the terminal; only the exit
/// status is inspected.
pub struct CommandRenderer {
    command: Vec<String>,
}

impl CommandRenderer {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    fn display(&self) -> String {
        self.command.join(" ")
    }
}

impl Renderer for CommandRenderer {
    fn name(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or("command")
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<(), BuildError> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(BuildError::RendererSpawn {
                command: String::new(),
                message: "renderer command is empty".to_string(),
            });
        };

        // The tool runs in the book root, so hand it absolute paths.
        let dest = ctx
            .dest
            .canonicalize()
            .map_err(|e| BuildError::WriteError(e.to_string()))?;
        let src = ctx
            .config
            .src_dir
            .canonicalize()
            .map_err(|e| BuildError::ReadError(format!("{}: {}", ctx.config.src_dir.display(), e)))?;

        let args: Vec<String> = args
            .iter()
            .map(|arg| {
                arg.replace("{dest}", &dest.to_string_lossy())
                    .replace("{src}", &src.to_string_lossy())
            })
            .collect();

        tracing::debug!("Running {} {}", program, args.join(" "));

        let status = Command::new(program)
            .args(&args)
            .current_dir(&ctx.config.root)
            .status()
            .map_err(|e| BuildError::RendererSpawn {
                command: self.display(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(BuildError::RendererFailed {
                command: self.display(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sh(script: &str) -> CommandRenderer {
        CommandRenderer::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
            "{dest}".to_string(),
        ])
    }

    fn setup() -> (tempfile::TempDir, BuildConfig) {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(temp.path().join("out")).unwrap();

        let config = BuildConfig {
            root: temp.path().to_path_buf(),
            src_dir: src,
            ..Default::default()
        };
        (temp, config)
    }

    #[test]
    fn substitutes_destination() {
        let (temp, config) = setup();
        let dest = temp.path().join("out");

        sh(r#"echo built > "$0/index.html""#)
            .render(&RenderContext {
                config: &config,
                dest: &dest,
            })
            .unwrap();

        assert_eq!(fs::read_to_string(dest.join("index.html")).unwrap(), "built\n");
    }

    #[test]
    fn non_zero_exit_fails() {
        let (temp, config) = setup();
        let dest = temp.path().join("out");

        let err = sh("exit 3")
            .render(&RenderContext {
                config: &config,
                dest: &dest,
            })
            .unwrap_err();

        assert!(matches!(err, BuildError::RendererFailed { .. }));
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let (temp, config) = setup();
        let dest = temp.path().join("out");

        let err = CommandRenderer::new(vec!["anthology-no-such-renderer".to_string()])
            .render(&RenderContext {
                config: &config,
                dest: &dest,
            })
            .unwrap_err();

        assert!(matches!(err, BuildError::RendererSpawn { .. }));
    }

    #[test]
    fn default_command_is_mdbook() {
        let renderer = CommandRenderer::new(DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect());

        assert_eq!(renderer.name(), "mdbook");
        assert_eq!(renderer.display(), "mdbook build --dest-dir {dest}");
    }
}
