//! Anthology CLI: build a curated article collection into a book and publish it.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use config::RendererName;

#[derive(Parser)]
#[command(name = "anthology")]
#[command(about = "Build a curated article anthology into a static book and publish it")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to anthology.toml config file
    #[arg(short, long, default_value = "anthology.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new anthology in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Render the book into the output directory
    Build {
        /// Output directory (defaults to config or "_book")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Renderer to use (defaults to config or "html")
        #[arg(short, long, value_enum)]
        renderer: Option<RendererName>,
    },

    /// Force-push the built output to the hosting branch
    Publish {
        /// Built output directory (defaults to config or "_book")
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Preview the built book
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to config or "_book")
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes)?;
        }
        Commands::Build { output, renderer } => {
            commands::build::run(&cli.config, output, renderer)?;
        }
        Commands::Publish { dir } => {
            commands::publish::run(&cli.config, dir)?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(&cli.config, port, dir, !no_open).await?;
        }
    }

    Ok(())
}
