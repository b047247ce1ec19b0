//! Ordered override stages applied to a freshly built tree.

use super::env::resolve_environment;
use super::merge::merge_into;
use super::node::ConfigNode;
use serde_yaml::Mapping;
use std::path::PathBuf;
use tracing::debug;

/// Override stage, in application order (lowest to highest precedence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverrideStage {
    /// The primary source, after scope selection
    Primary = 0,
    /// Machine-local override document
    Local = 1,
    /// Programmatic override mapping
    Explicit = 2,
    /// Environment variables (highest priority)
    Environment = 3,
}

impl std::fmt::Display for OverrideStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverrideStage::Primary => write!(f, "primary"),
            OverrideStage::Local => write!(f, "local"),
            OverrideStage::Explicit => write!(f, "explicit"),
            OverrideStage::Environment => write!(f, "environment"),
        }
    }
}

/// A stage that contributed to the final tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedSource {
    pub stage: OverrideStage,
    /// Document the values came from, if any.
    pub path: Option<PathBuf>,
    /// Top-level entries merged, or variables applied for the environment stage.
    pub entries: usize,
}

/// Parsed local override.
#[derive(Debug, Clone)]
pub(crate) struct LocalInput {
    pub mapping: Mapping,
    pub path: Option<PathBuf>,
}

/// Environment variables selected for the environment stage.
#[derive(Debug, Clone)]
pub(crate) struct EnvironmentInput {
    pub vars: Vec<(String, String)>,
    pub create_missing: bool,
}

/// Apply local, explicit and environment overrides to `root`, in that order.
///
/// Returns the stages that ran.
pub(crate) fn apply_overrides(
    root: &mut ConfigNode,
    local: Option<LocalInput>,
    explicit: Option<&Mapping>,
    environment: Option<EnvironmentInput>,
) -> Vec<AppliedSource> {
    let mut applied = Vec::new();

    if let Some(local) = local {
        merge_into(root, &local.mapping);
        debug!(stage = %OverrideStage::Local, entries = local.mapping.len(), "Applied override stage");
        applied.push(AppliedSource {
            stage: OverrideStage::Local,
            path: local.path,
            entries: local.mapping.len(),
        });
    }

    if let Some(explicit) = explicit {
        merge_into(root, explicit);
        debug!(stage = %OverrideStage::Explicit, entries = explicit.len(), "Applied override stage");
        applied.push(AppliedSource {
            stage: OverrideStage::Explicit,
            path: None,
            entries: explicit.len(),
        });
    }

    if let Some(environment) = environment {
        let candidates = environment.vars.len();
        let count = resolve_environment(root, environment.vars, environment.create_missing);
        debug!(
            stage = %OverrideStage::Environment,
            candidates,
            applied = count,
            create_missing = environment.create_missing,
            "Applied override stage"
        );
        applied.push(AppliedSource {
            stage: OverrideStage::Environment,
            path: None,
            entries: count,
        });
    }

    applied
}
