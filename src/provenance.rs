//! Provenance metadata for merged notebooks.

use git2::Repository;
use serde_json::{Map, Value};
use std::path::Path;

/// Where a merged notebook's content came from.
///
/// Stored under the `provenance` key of the notebook metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub vendor_root: String,
    pub vendor_sha: Option<String>,
    pub sources: Vec<String>,
}

impl Provenance {
    /// Metadata form; `vendor_sha` is left out rather than written as null.
    pub fn to_value(&self) -> Value {
        let mut record = Map::new();
        record.insert("vendor_root".to_string(), Value::String(self.vendor_root.clone()));
        if let Some(sha) = &self.vendor_sha {
            record.insert("vendor_sha".to_string(), Value::String(sha.clone()));
        }
        record.insert(
            "sources".to_string(),
            Value::Array(self.sources.iter().cloned().map(Value::String).collect()),
        );
        Value::Object(record)
    }
}

/// Abbreviated commit id of `HEAD` for the repository containing `path`.
///
/// Never fails: a missing directory, a directory outside any repository or an
/// unborn `HEAD` all give `None`.
pub fn short_revision(path: &Path) -> Option<String> {
    let repo = match Repository::discover(path) {
        Ok(repo) => repo,
        Err(e) => {
            tracing::debug!("No git repository at {}: {}", path.display(), e.message());
            return None;
        }
    };

    let short = repo
        .head()
        .and_then(|head| head.peel_to_commit())
        .and_then(|commit| commit.as_object().short_id());

    match short {
        Ok(buf) => buf.as_str().map(str::to_string),
        Err(e) => {
            tracing::debug!("Could not resolve HEAD in {}: {}", path.display(), e.message());
            None
        }
    }
}
