//! Jupyter notebook (nbformat v4) model, reading and writing.

use crate::error::{BuildError, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Major format version read and written.
pub const NBFORMAT: u64 = 4;
/// Minor version of written notebooks; 4.5 is the first with cell ids.
pub const NBFORMAT_MINOR: u64 = 5;

/// A notebook document: ordered cells plus document-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub nbformat: u64,
    #[serde(default)]
    pub nbformat_minor: u64,
}

impl Notebook {
    pub fn new(metadata: Map<String, Value>) -> Self {
        Self { cells: Vec::new(), metadata, nbformat: NBFORMAT, nbformat_minor: NBFORMAT_MINOR }
    }
}

/// One notebook cell.
///
/// Keys other than type, id, metadata and source (`outputs`,
/// `execution_count`, `attachments`, ...) are kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub source: Source,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            cell_type: CellType::Markdown,
            id: None,
            metadata: Map::new(),
            source: Source::new(text),
            extra: Map::new(),
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("execution_count".to_string(), Value::Null);
        extra.insert("outputs".to_string(), Value::Array(Vec::new()));
        Self {
            cell_type: CellType::Code,
            id: None,
            metadata: Map::new(),
            source: Source::new(text),
            extra,
        }
    }

    pub fn is_code(&self) -> bool {
        self.cell_type == CellType::Code
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
    /// Any other type string, passed through unchanged.
    Other(String),
}

impl From<String> for CellType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "code" => CellType::Code,
            "markdown" => CellType::Markdown,
            "raw" => CellType::Raw,
            _ => CellType::Other(value),
        }
    }
}

impl From<CellType> for String {
    fn from(value: CellType) -> Self {
        match value {
            CellType::Code => "code".to_string(),
            CellType::Markdown => "markdown".to_string(),
            CellType::Raw => "raw".to_string(),
            CellType::Other(other) => other,
        }
    }
}

/// Cell text.
///
/// Read from either a single string or a list of lines; always written as a
/// list of lines that keep their trailing newline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawSource")]
pub struct Source(String);

impl Source {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Text(String),
    Lines(Vec<String>),
}

impl From<RawSource> for Source {
    fn from(raw: RawSource) -> Self {
        match raw {
            RawSource::Text(text) => Source(text),
            RawSource::Lines(lines) => Source(lines.concat()),
        }
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.split_inclusive('\n'))
    }
}

/// Read and parse a v4 notebook.
pub fn read_notebook(path: &Path) -> Result<Notebook> {
    let content = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    let raw: Value = serde_json::from_str(&content)
        .map_err(|source| BuildError::Notebook { path: path.to_path_buf(), source })?;

    let major = raw.get("nbformat").and_then(Value::as_u64).unwrap_or(0);
    if major != NBFORMAT {
        return Err(BuildError::UnsupportedFormat { path: path.to_path_buf(), major });
    }

    serde_json::from_value(raw)
        .map_err(|source| BuildError::Notebook { path: path.to_path_buf(), source })
}

/// Render a notebook the way nbformat writes it: sorted keys, one-space
/// indent, literal non-ASCII, trailing newline.
pub fn to_notebook_json(notebook: &Notebook) -> serde_json::Result<String> {
    // Going through `Value` sorts every object's keys.
    let value = serde_json::to_value(notebook)?;
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a notebook atomically, creating parent directories as needed.
pub fn write_notebook(path: &Path, notebook: &Notebook) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;

    let json = to_notebook_json(notebook)
        .map_err(|source| BuildError::Notebook { path: path.to_path_buf(), source })?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| BuildError::io(parent, e))?;
    tmp.write_all(json.as_bytes()).map_err(|e| BuildError::io(tmp.path(), e))?;
    // Temp files are created 0600; give the notebook ordinary file permissions.
    if let Some(permissions) = output_permissions(path) {
        tmp.as_file().set_permissions(permissions).map_err(|e| BuildError::io(tmp.path(), e))?;
    }
    tmp.persist(path).map_err(|e| BuildError::io(path, e.error))?;
    Ok(())
}

/// Permissions of the file being replaced, else 0644 on unix.
fn output_permissions(path: &Path) -> Option<fs::Permissions> {
    if let Ok(existing) = fs::metadata(path) {
        return Some(existing.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(fs::Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}
