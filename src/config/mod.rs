//! Configuration loading and merging
//!
//! Handles loading from config files, environment variables, and CLI arguments
//! with proper precedence (CLI > Env > File > Defaults).

pub mod loader;
pub mod merge;

pub use loader::load_config;
pub use merge::{merge_cli_with_config, CliOverrides};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;

pub const DEFAULT_OUTDIR: &str = "course/weeks";
pub const DEFAULT_SRCROOT: &str = "vendor/virtual-pyprog";

/// Settings for a build run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory receiving `<week>.ipynb` files.
    pub outdir: PathBuf,
    /// Upstream checkout, used only for the revision lookup.
    pub srcroot: PathBuf,
    pub kernel: KernelSpec,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            outdir: PathBuf::from(DEFAULT_OUTDIR),
            srcroot: PathBuf::from(DEFAULT_SRCROOT),
            kernel: KernelSpec::default(),
        }
    }
}

/// The `kernelspec` written into every merged notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelSpec {
    pub name: String,
    pub display_name: String,
    pub language: String,
}

impl Default for KernelSpec {
    fn default() -> Self {
        Self {
            name: "python3".to_string(),
            display_name: "Python 3".to_string(),
            language: "python".to_string(),
        }
    }
}

impl KernelSpec {
    pub fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "display_name": self.display_name,
            "language": self.language,
        })
    }
}
