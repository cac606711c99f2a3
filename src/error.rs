//! Error types for notebook loading, manifest parsing and merging.
//!
//! The library reports failures through [`BuildError`]; the binary wraps them
//! with `anyhow` context.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Filesystem I/O error.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid notebook JSON.
    #[error("invalid notebook {}: {source}", .path.display())]
    Notebook {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Only nbformat v4 documents are read.
    #[error(
        "unsupported notebook format v{major} in {} (expected v4; upgrade it with \
         `jupyter nbconvert --to notebook --inplace`)",
        .path.display()
    )]
    UnsupportedFormat { path: PathBuf, major: u64 },

    /// The manifest is not valid YAML or does not have the expected shape.
    #[error("invalid manifest {}: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    /// A merge was requested with no source notebooks.
    #[error("no source notebooks given for '{title}'")]
    NoSources { title: String },
}

pub type Result<T> = std::result::Result<T, BuildError>;

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest { path: path.into(), message: message.into() }
    }
}
