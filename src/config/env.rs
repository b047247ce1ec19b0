//! Environment variable overrides.
//!
//! A variable such as `DATABASE__POOL__SIZE=10` addresses the nested key
//! `database.pool.size`. Names are lowercased and split on [`PATH_SEPARATOR`].
//!
//! The resolver never reads the process environment itself. Variables come
//! from an [`EnvSource`]: [`ProcessEnv`] in production, [`MapEnv`] in tests
//! and embedding code.

use super::key::Key;
use super::node::{ConfigNode, Setting};
use serde_yaml::Value;
use std::collections::BTreeMap;
use tracing::trace;

/// Separator between path segments in a variable name.
pub const PATH_SEPARATOR: &str = "__";

/// Provider of environment variables.
pub trait EnvSource {
    /// Value of a single variable, if set.
    fn var(&self, name: &str) -> Option<String>;

    /// Every variable, in the provider's iteration order.
    fn vars(&self) -> Vec<(String, String)>;
}

/// The real process environment.
///
/// Variables whose name or value is not valid Unicode are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }
}

/// A fixed set of variables. Iterates in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv(BTreeMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

/// Split a variable name into the canonical key path it addresses.
///
/// Empty segments (from leading, trailing or repeated separators) are dropped.
/// Each segment is normalized like a document key, so `:NAME` addresses `name`.
pub fn env_path(name: &str) -> Vec<Key> {
    name.to_lowercase()
        .split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(|segment| Key::normalize(&Value::from(segment)))
        .collect()
}

/// Apply environment variables to a tree under construction.
///
/// With `create_missing`, intermediate nodes are created as needed and the
/// final key is always set. Without it, a variable only updates a key that
/// already exists at that position. A path through a scalar is never
/// followed. Returns how many variables changed the tree.
pub(crate) fn resolve_environment<I, N, V>(
    root: &mut ConfigNode,
    vars: I,
    create_missing: bool,
) -> usize
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: AsRef<str>,
{
    let mut applied = 0;
    for (name, value) in vars {
        let name = name.as_ref();
        let path = env_path(name);
        if apply_variable(root, &path, value.as_ref(), create_missing) {
            applied += 1;
        } else {
            trace!(variable = %name, "Environment variable did not match a setting");
        }
    }
    applied
}

fn apply_variable(root: &mut ConfigNode, path: &[Key], value: &str, create_missing: bool) -> bool {
    let Some((last, parents)) = path.split_last() else {
        return false;
    };

    let mut node = root;
    for segment in parents {
        if !node.contains_key(segment) {
            if !create_missing {
                return false;
            }
            node.insert(segment.clone(), Setting::Node(ConfigNode::default()));
        }
        node = match node.get_mut(segment.as_str()) {
            Some(Setting::Node(child)) => child,
            _ => return false,
        };
    }

    if !create_missing && !node.contains_key(last) {
        return false;
    }
    node.insert(last.clone(), Setting::Scalar(Value::from(value)));
    true
}
