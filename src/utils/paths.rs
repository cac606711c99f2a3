//! Path display normalization

use std::path::{Component, Path};

/// Render a path the way it is recorded in notebook metadata.
///
/// Redundant separators and `.` components are dropped (`./a//b/` becomes
/// `a/b`); a path consisting only of `.` stays `.`.
pub fn display_path(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| match c {
            Component::RootDir => String::new(),
            other => other.as_os_str().to_string_lossy().into_owned(),
        })
        .collect();

    match parts.as_slice() {
        [] if path.as_os_str().is_empty() => String::new(),
        [] => ".".to_string(),
        [root] if root.is_empty() => "/".to_string(),
        _ => parts.join("/"),
    }
}
