//! Command-line interface for build-weeks
//!
//! A single invocation builds every week listed in the manifest.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod build;

pub use build::BuildArgs;

/// Assemble weekly course notebooks from upstream Jupyter notebooks
#[derive(Parser)]
#[command(name = "build-weeks")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    build: BuildArgs,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    build::run(cli.build)
}
