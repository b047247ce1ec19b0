//! Deep merge of parsed mappings into a settings tree.
//!
//! Nested mappings merge key by key into existing nodes, so a later source can
//! change one leaf without touching its siblings. Everything else replaces
//! whatever was at that key, including whole subtrees.

use super::key::Key;
use super::node::{ConfigNode, Setting};
use serde_yaml::{Mapping, Value};

impl ConfigNode {
    /// Build a tree from a parsed mapping, normalizing every key.
    pub fn build(source: &Mapping) -> Self {
        let mut node = Self::default();
        merge_into(&mut node, source);
        node
    }
}

/// Merge `source` into `target`, with `source` taking precedence.
///
/// - Mapping over node: merged recursively
/// - Mapping over scalar or nothing: a fresh node is built and installed
/// - Scalar (null included) over anything: replaces it
pub(crate) fn merge_into(target: &mut ConfigNode, source: &Mapping) {
    for (raw_key, value) in source {
        let key = Key::normalize(raw_key);
        match value {
            Value::Mapping(nested) => match target.get_mut(key.as_str()) {
                Some(Setting::Node(existing)) => merge_into(existing, nested),
                _ => target.insert(key, Setting::Node(ConfigNode::build(nested))),
            },
            scalar => target.insert(key, Setting::Scalar(scalar.clone())),
        }
    }
}
