//! YAML settings documents on disk.

use crate::error::{Result, SettingsError};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read and parse a settings document.
///
/// An empty document is an empty mapping. Any other non-mapping root is an
/// error.
pub fn load_document(path: &Path) -> Result<Mapping> {
    let content =
        std::fs::read_to_string(path).map_err(|source| SettingsError::read_file(path, source))?;
    let mapping = parse_document(&content, path)?;
    info!(path = %path.display(), entries = mapping.len(), "Loaded settings document");
    Ok(mapping)
}

/// Like [`load_document`], but a file that does not exist is `Ok(None)`.
pub fn load_optional_document(path: &Path) -> Result<Option<Mapping>> {
    if !path.exists() {
        debug!(path = %path.display(), "Settings document not found, skipping");
        return Ok(None);
    }
    load_document(path).map(Some)
}

/// Parse document text. `path` is only used for error context.
///
/// YAML merge keys (`<<: *anchor`) are applied before the mapping is returned.
pub fn parse_document(content: &str, path: &Path) -> Result<Mapping> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let mut value: Value =
        serde_yaml::from_str(content).map_err(|source| SettingsError::parse_yaml(path, source))?;
    value
        .apply_merge()
        .map_err(|source| SettingsError::parse_yaml(path, source))?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(SettingsError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// The machine-local companion of a settings document:
/// `config/settings.yml` becomes `config/settings.local.yml`.
pub fn adjacent_local_path(primary: &Path) -> PathBuf {
    let stem = primary
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match primary.extension() {
        Some(ext) => format!("{stem}.local.{}", ext.to_string_lossy()),
        None => format!("{stem}.local"),
    };
    primary.with_file_name(file_name)
}
