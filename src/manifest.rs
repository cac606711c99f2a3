//! Week manifest loading
//!
//! A manifest is a YAML mapping from week key to `{title, files}`:
//!
//! ```yaml
//! week01:
//!   title: "Week 1: Basics"
//!   files:
//!     - vendor/virtual-pyprog/01_intro.ipynb
//!     - vendor/virtual-pyprog/02_variables.ipynb
//! ```

use crate::error::{BuildError, Result};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// One output notebook to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekEntry {
    pub key: String,
    pub title: String,
    pub files: Vec<PathBuf>,
}

impl WeekEntry {
    /// `<outdir>/<key>.ipynb`
    pub fn output_path(&self, outdir: &Path) -> PathBuf {
        outdir.join(format!("{}.ipynb", self.key))
    }
}

/// Entries in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<WeekEntry>,
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    parse_manifest(&content, path)
}

/// Parse manifest text; `path` is only used in error messages.
pub fn parse_manifest(content: &str, path: &Path) -> Result<Manifest> {
    let raw: Value = serde_yaml::from_str(content)
        .map_err(|e| BuildError::manifest(path, format!("invalid YAML: {e}")))?;

    let mapping = match raw {
        // An empty document parses as null.
        Value::Null => return Ok(Manifest::default()),
        Value::Mapping(mapping) => mapping,
        _ => return Err(BuildError::manifest(path, "top level must be a mapping of weeks")),
    };

    let mut entries = Vec::with_capacity(mapping.len());
    for (key, spec) in mapping {
        let key = week_key(&key).ok_or_else(|| {
            BuildError::manifest(path, "week keys must be strings or numbers")
        })?;
        entries.push(parse_entry(key, &spec, path)?);
    }

    Ok(Manifest { entries })
}

fn parse_entry(key: String, spec: &Value, path: &Path) -> Result<WeekEntry> {
    let Value::Mapping(spec) = spec else {
        return Err(BuildError::manifest(path, format!("week '{key}' must be a mapping")));
    };

    let title = match spec.get("title") {
        None | Some(Value::Null) => key.clone(),
        Some(value) => scalar_key(value).ok_or_else(|| {
            BuildError::manifest(path, format!("week '{key}': title must be a string"))
        })?,
    };

    let files = match spec.get("files") {
        Some(Value::Sequence(items)) => items,
        Some(_) => {
            return Err(BuildError::manifest(path, format!("week '{key}': files must be a list")))
        }
        None => return Err(BuildError::manifest(path, format!("week '{key}': missing files"))),
    };
    if files.is_empty() {
        return Err(BuildError::manifest(path, format!("week '{key}': files is empty")));
    }

    let files = files
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(PathBuf::from(s)),
            _ => Err(BuildError::manifest(
                path,
                format!("week '{key}': file entries must be strings"),
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(WeekEntry { key, title, files })
}

/// Week keys name output files; booleans (`yes:`, `true:`) are rejected.
fn week_key(value: &Value) -> Option<String> {
    match value {
        Value::Bool(_) => None,
        other => scalar_key(other),
    }
}

/// String form of a scalar YAML value (`week01`, `1`, `true`).
fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
