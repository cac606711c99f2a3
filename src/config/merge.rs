//! Merge CLI arguments over file configuration

use super::Config;
use std::path::PathBuf;

/// Values given on the command line (or through their environment variables).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub outdir: Option<PathBuf>,
    pub srcroot: Option<PathBuf>,
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if let Some(outdir) = cli.outdir {
        config.outdir = outdir;
    }
    if let Some(srcroot) = cli.srcroot {
        config.srcroot = srcroot;
    }
    config
}
