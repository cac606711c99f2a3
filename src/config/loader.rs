//! Config file loading

use super::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const NESTED_SECTION: &str = "build-weeks";

/// Load config from `config_path`, or from the first candidate file found in
/// `base_dir` when no path is given.
///
/// An explicit file must load cleanly. A discovered file that cannot be read
/// or parsed is skipped with a warning and defaults are used.
pub fn load_config(base_dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(base_dir),
    };

    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    match read_config_file(&config_file) {
        Ok(cfg) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if config_path_provided => Err(e),
        Err(e) => {
            tracing::warn!(
                "Ignoring auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(Config::default())
        }
    }
}

fn read_config_file(config_file: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    match ext.as_str() {
        "toml" => parse_toml_config(&content, config_file),
        "yaml" | "yml" => parse_yaml_config(&content, config_file),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    }
}

/// Parse TOML config, supporting a nested `[build-weeks]` section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = if let Some(nested) = raw.get(NESTED_SECTION) { nested.clone() } else { raw };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, supporting a nested `build-weeks:` section.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = if let Some(nested) = raw.get(NESTED_SECTION) {
        nested.clone()
    } else if raw.is_null() {
        // An empty file parses as null; treat it as an empty mapping.
        serde_yaml::Value::Mapping(serde_yaml::Mapping::new())
    } else {
        raw
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(base_dir: &Path) -> Option<PathBuf> {
    let candidates =
        ["build-weeks.toml", ".build-weeks.toml", "build-weeks.yml", "build-weeks.yaml"];

    candidates.iter().map(|candidate| base_dir.join(candidate)).find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KernelSpec;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.outdir, PathBuf::from("course/weeks"));
        assert_eq!(cfg.srcroot, PathBuf::from("vendor/virtual-pyprog"));
    }

    #[test]
    fn test_load_discovered_toml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("build-weeks.toml"),
            "outdir = 'out/weeks'\n\n[kernel]\nname = 'ir'\ndisplay_name = 'R'\nlanguage = 'R'\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.outdir, PathBuf::from("out/weeks"));
        assert_eq!(cfg.srcroot, Config::default().srcroot);
        assert_eq!(
            cfg.kernel,
            KernelSpec {
                name: "ir".to_string(),
                display_name: "R".to_string(),
                language: "R".to_string()
            }
        );
    }

    #[test]
    fn test_nested_toml_section() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("project.toml");
        fs::write(&path, "[build-weeks]\nsrcroot = 'upstream'\n").expect("write");

        let cfg = load_config(tmp.path(), Some(&path)).expect("config");
        assert_eq!(cfg.srcroot, PathBuf::from("upstream"));
    }

    #[test]
    fn test_load_yaml_config_with_partial_kernel() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("build-weeks.yml");
        fs::write(&path, "srcroot: vendor/other\nkernel:\n  display_name: Python 3 (course)\n")
            .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.srcroot, PathBuf::from("vendor/other"));
        assert_eq!(cfg.kernel.name, "python3");
        assert_eq!(cfg.kernel.display_name, "Python 3 (course)");
    }

    #[test]
    fn test_empty_yaml_config_is_defaults() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("build-weeks.yaml");
        fs::write(&path, "").expect("write");

        let cfg = load_config(tmp.path(), Some(&path)).expect("config");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_explicit_config_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "outdir = 123\n").expect("write");

        let result = load_config(tmp.path(), Some(&path));
        assert!(result.is_err(), "explicit config with invalid type should return Err");
    }

    #[test]
    fn test_explicit_config_unknown_key_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.yml");
        fs::write(&path, "out_dir: somewhere\n").expect("write");

        assert!(load_config(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_config_unsupported_extension_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("settings.ini");
        fs::write(&path, "outdir=x\n").expect("write");

        let err = load_config(tmp.path(), Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Unsupported config extension"));
    }

    #[test]
    fn test_explicit_config_missing_file_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        assert!(load_config(tmp.path(), Some(&tmp.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_auto_discovered_invalid_config_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("build-weeks.toml"), "outdir = [1, 2]\n").expect("write");

        let cfg = load_config(tmp.path(), None).expect("should not error on auto-discovery");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_auto_discovered_unreadable_config_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        // A directory at a candidate path is found by discovery but cannot be read.
        fs::create_dir(tmp.path().join("build-weeks.toml")).expect("mkdir");

        let cfg = load_config(tmp.path(), None).expect("should not error on auto-discovery");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_explicit_unreadable_config_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("build-weeks.toml");
        fs::create_dir(&path).expect("mkdir");

        let err = load_config(tmp.path(), Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed reading config file"), "got {err:#}");
    }

    #[test]
    fn test_discovery_prefers_toml_over_yaml() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("build-weeks.toml"), "outdir = 'toml-out'\n").expect("write");
        fs::write(tmp.path().join("build-weeks.yml"), "outdir: yaml-out\n").expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.outdir, PathBuf::from("toml-out"));
    }
}
