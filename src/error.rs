//! Error types for settings resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or reading a settings tree.
///
/// Only `ConfigurationMissing` and the document variants can surface from
/// construction. Absent local overrides, absent scopes and unmatched
/// environment variables are not errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No primary source was supplied and no default document exists.
    #[error("no settings source given and none of the default locations exist: {}", display_paths(.searched))]
    ConfigurationMissing { searched: Vec<PathBuf> },

    /// Attribute-style access on a key that is not present.
    #[error("unknown setting '{key}'")]
    AttributeNotFound { key: String },

    /// A settings document exists but could not be read.
    #[error("failed to read settings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings document is not valid YAML.
    #[error("failed to parse settings file '{path}': {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A settings document parsed, but its root is not a mapping.
    #[error("settings file '{path}' must contain a mapping at the top level")]
    NotAMapping { path: PathBuf },

    /// Rendering a tree as YAML failed.
    #[error("failed to render settings as YAML: {0}")]
    EmitYaml(#[from] serde_yaml::Error),

    /// Rendering a tree as JSON failed.
    #[error("failed to render settings as JSON: {0}")]
    EmitJson(#[from] serde_json::Error),
}

impl SettingsError {
    /// Creates an attribute-not-found error.
    pub fn attribute_not_found(key: impl Into<String>) -> Self {
        Self::AttributeNotFound { key: key.into() }
    }

    /// Creates a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a YAML parse error.
    pub fn parse_yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::ParseYaml {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is recoverable by the caller (a failed lookup).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AttributeNotFound { .. })
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(no default locations configured)".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
