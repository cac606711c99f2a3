//! Merging upstream notebooks into one week notebook.
//!
//! Output layout is a title banner, then per source file a file banner
//! followed by that file's cells. Code cells whose trimmed text was already
//! appended are dropped; every other cell is kept.

use crate::config::KernelSpec;
use crate::error::{BuildError, Result};
use crate::notebook::{read_notebook, write_notebook, Cell, Notebook};
use crate::provenance::{short_revision, Provenance};
use crate::utils::{display_path, stable_cell_id};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const ORIGIN_PATH_KEY: &str = "origin_path";
pub const ORIGIN_CELL_ID_KEY: &str = "origin_cell_id";
/// Metadata flag marking synthesized banner cells.
pub const KEEP_KEY: &str = "keep";

/// Outcome of a [`merge`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub output: PathBuf,
    pub revision: Option<String>,
    /// Cells in the written notebook, banners included.
    pub cells_written: usize,
    pub duplicates_skipped: usize,
}

/// Merge `source_files` in order into one notebook written to `output_path`.
///
/// `source_root` is only consulted for the short revision recorded in the
/// provenance metadata. Any unreadable or invalid source aborts the merge
/// before anything is written.
pub fn merge(
    output_path: &Path,
    title: &str,
    source_files: &[PathBuf],
    source_root: &Path,
    kernel: &KernelSpec,
) -> Result<MergeReport> {
    if source_files.is_empty() {
        return Err(BuildError::NoSources { title: title.to_string() });
    }

    let revision = short_revision(source_root);
    let provenance = Provenance {
        vendor_root: display_path(source_root),
        vendor_sha: revision.clone(),
        sources: source_files.iter().map(|p| p.to_string_lossy().into_owned()).collect(),
    };

    let mut merger = NotebookMerger::new(title, &provenance, kernel);
    for path in source_files {
        tracing::debug!("Reading {}", path.display());
        let source = read_notebook(path)?;
        merger.append_source(path, &source);
    }

    let duplicates_skipped = merger.duplicates_skipped();
    let notebook = merger.finish();
    write_notebook(output_path, &notebook)?;
    tracing::info!(
        "Merged {} notebooks into {} ({} cells, {} duplicate code cells skipped)",
        source_files.len(),
        output_path.display(),
        notebook.cells.len(),
        duplicates_skipped
    );

    Ok(MergeReport {
        output: output_path.to_path_buf(),
        revision,
        cells_written: notebook.cells.len(),
        duplicates_skipped,
    })
}

/// Markdown banner: `# heading`, plus a `> subtitle` quote line when given.
pub fn banner_cell(heading: &str, subtitle: Option<&str>) -> Cell {
    let mut text = format!("# {heading}\n");
    if let Some(subtitle) = subtitle {
        text.push_str(&format!("\n> {subtitle}\n"));
    }
    let mut cell = Cell::markdown(text);
    cell.metadata.insert(KEEP_KEY.to_string(), Value::Bool(true));
    cell
}

/// In-memory merge state for one output notebook.
pub struct NotebookMerger {
    notebook: Notebook,
    seen_code: HashSet<String>,
    used_ids: HashSet<String>,
    duplicates_skipped: usize,
}

impl NotebookMerger {
    /// Start a notebook with its metadata and title banner.
    pub fn new(title: &str, provenance: &Provenance, kernel: &KernelSpec) -> Self {
        let mut metadata = Map::new();
        metadata.insert("kernelspec".to_string(), kernel.to_value());
        metadata.insert("provenance".to_string(), provenance.to_value());

        let mut subtitle = format!("Built from {} upstream notebooks", provenance.sources.len());
        if let Some(sha) = &provenance.vendor_sha {
            subtitle.push_str(&format!(" @ {sha}"));
        }

        let mut merger = Self {
            notebook: Notebook::new(metadata),
            seen_code: HashSet::new(),
            used_ids: HashSet::new(),
            duplicates_skipped: 0,
        };
        merger.push(banner_cell(title, Some(&subtitle)));
        merger
    }

    /// Append a file banner and copies of `source`'s cells.
    ///
    /// `source` is left untouched; the merged notebook owns its own copies.
    pub fn append_source(&mut self, path: &Path, source: &Notebook) {
        let origin = display_path(path);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| origin.clone());
        self.push(banner_cell(&format!("From: {file_name}"), Some(&origin)));

        for original in &source.cells {
            let mut cell = original.clone();
            cell.metadata
                .entry(ORIGIN_PATH_KEY)
                .or_insert_with(|| Value::String(origin.clone()));
            if let Some(id) = &cell.id {
                cell.metadata
                    .entry(ORIGIN_CELL_ID_KEY)
                    .or_insert_with(|| Value::String(id.clone()));
            }

            if cell.is_code() && !self.seen_code.insert(cell.source.as_str().trim().to_string()) {
                tracing::debug!(
                    "Skipping duplicate code cell {} from {}",
                    cell.id.as_deref().unwrap_or("<no id>"),
                    origin
                );
                self.duplicates_skipped += 1;
                continue;
            }
            self.push(cell);
        }
    }

    pub fn duplicates_skipped(&self) -> usize {
        self.duplicates_skipped
    }

    pub fn finish(self) -> Notebook {
        self.notebook
    }

    /// Append a cell, giving it an id unique within the notebook.
    fn push(&mut self, mut cell: Cell) {
        let position = self.notebook.cells.len();
        let id = match cell.id.take() {
            Some(id) if !self.used_ids.contains(&id) => id,
            previous => {
                let fresh = self.fresh_id(cell.source.as_str(), position);
                if let Some(previous) = previous {
                    tracing::debug!("Cell id '{}' already used; renamed to '{}'", previous, fresh);
                }
                fresh
            }
        };
        self.used_ids.insert(id.clone());
        cell.id = Some(id);
        self.notebook.cells.push(cell);
    }

    fn fresh_id(&self, seed: &str, position: usize) -> String {
        let mut id = stable_cell_id(seed, position);
        let mut attempt = 0usize;
        while self.used_ids.contains(&id) {
            attempt += 1;
            id = stable_cell_id(&format!("{seed}#{attempt}"), position);
        }
        id
    }
}
