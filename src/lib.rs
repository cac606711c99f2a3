//! Merge upstream Jupyter notebooks into weekly course notebooks.

pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod merge;
pub mod notebook;
pub mod provenance;
pub mod utils;

pub use error::{BuildError, Result};
pub use merge::{merge, MergeReport};
