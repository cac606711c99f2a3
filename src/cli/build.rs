//! Build command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::manifest::load_manifest;
use crate::merge::merge;

#[derive(Args)]
pub struct BuildArgs {
    /// YAML manifest mapping each week to its title and source notebooks
    #[arg(short = 'm', long = "map", visible_alias = "manifest", value_name = "FILE")]
    pub map: PathBuf,

    /// Directory receiving <week>.ipynb files [default: course/weeks]
    #[arg(short = 'o', long, value_name = "DIR", env = "BUILD_WEEKS_OUTDIR")]
    pub outdir: Option<PathBuf>,

    /// Upstream checkout whose git revision is recorded [default: vendor/virtual-pyprog]
    #[arg(short = 's', long, value_name = "DIR", env = "BUILD_WEEKS_SRCROOT")]
    pub srcroot: Option<PathBuf>,

    /// Path to config file (build-weeks.toml or build-weeks.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: BuildArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed resolving current directory")?;
    let config = load_config(&cwd, args.config.as_deref())?;
    let config = merge_cli_with_config(
        config,
        CliOverrides { outdir: args.outdir, srcroot: args.srcroot },
    );

    let manifest = load_manifest(&args.map)
        .with_context(|| format!("Failed loading manifest {}", args.map.display()))?;
    if manifest.entries.is_empty() {
        tracing::warn!("Manifest {} lists no weeks", args.map.display());
    }

    for entry in &manifest.entries {
        let out_path = entry.output_path(&config.outdir);
        tracing::debug!("Building {} from {} notebooks", entry.key, entry.files.len());
        merge(&out_path, &entry.title, &entry.files, &config.srcroot, &config.kernel)
            .with_context(|| format!("Failed building week '{}'", entry.key))?;
        println!("Wrote {}", out_path.display());
    }

    Ok(())
}
