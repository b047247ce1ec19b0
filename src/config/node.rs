//! The settings tree.
//!
//! A [`ConfigNode`] is one level of the tree. It owns its children outright,
//! and nothing outside this crate can change it once it has been built.

use super::key::Key;
use crate::error::{Result, SettingsError};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// A value stored in the tree: an opaque scalar or a nested node.
///
/// Sequences, tagged values and nulls are scalars; they are replaced whole,
/// never merged.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Scalar(Value),
    Node(ConfigNode),
}

impl Setting {
    /// The nested node, if this setting is a subtree.
    pub fn as_node(&self) -> Option<&ConfigNode> {
        match self {
            Setting::Node(node) => Some(node),
            Setting::Scalar(_) => None,
        }
    }

    /// The raw scalar, if this setting is not a subtree.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Setting::Scalar(value) => Some(value),
            Setting::Node(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_scalar().and_then(Value::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar().and_then(Value::as_f64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Value::as_bool)
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Setting::Node(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Setting::Scalar(Value::Null))
    }

    /// Look up a child key when this setting is a subtree.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&Setting> {
        self.as_node()?.get(key)
    }

    /// Convert back into a plain YAML value.
    pub fn to_value(&self) -> Value {
        match self {
            Setting::Scalar(value) => value.clone(),
            Setting::Node(node) => node.to_value(),
        }
    }
}

impl From<Value> for Setting {
    fn from(value: Value) -> Self {
        Setting::Scalar(value)
    }
}

impl PartialEq<Value> for Setting {
    fn eq(&self, other: &Value) -> bool {
        matches!(self, Setting::Scalar(value) if value == other)
    }
}

impl PartialEq<&str> for Setting {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for Setting {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<i32> for Setting {
    fn eq(&self, other: &i32) -> bool {
        self.as_i64() == Some(i64::from(*other))
    }
}

impl PartialEq<bool> for Setting {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

/// One level of the settings tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNode {
    entries: BTreeMap<Key, Setting>,
}

impl ConfigNode {
    /// Look up a key. Subtrees come back as [`Setting::Node`].
    pub fn get(&self, key: impl AsRef<str>) -> Option<&Setting> {
        self.entries.get(key.as_ref())
    }

    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.entries.contains_key(key.as_ref())
    }

    /// Attribute-style access: like [`get`](Self::get), but an absent key is an error.
    pub fn attr(&self, name: impl AsRef<str>) -> Result<&Setting> {
        let name = name.as_ref();
        self.get(name)
            .ok_or_else(|| SettingsError::attribute_not_found(name))
    }

    /// Follow a path of keys through nested nodes.
    ///
    /// Returns `None` for an empty path, a missing key, or a path that runs
    /// through a scalar.
    pub fn dig<I, K>(&self, path: I) -> Option<&Setting>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut keys = path.into_iter();
        let mut current = self.get(keys.next()?)?;
        for key in keys {
            current = current.get(key)?;
        }
        Some(current)
    }

    /// Entries in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Setting)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert back into a plain YAML mapping value with string keys.
    pub fn to_value(&self) -> Value {
        let mut mapping = Mapping::new();
        for (key, setting) in &self.entries {
            mapping.insert(Value::from(key.as_str()), setting.to_value());
        }
        Value::Mapping(mapping)
    }

    // Construction-time mutators. Only the merge and environment stages call these.

    pub(crate) fn insert(&mut self, key: Key, setting: Setting) {
        self.entries.insert(key, setting);
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Setting> {
        self.entries.get_mut(key)
    }
}

impl<'a> IntoIterator for &'a ConfigNode {
    type Item = (&'a Key, &'a Setting);
    type IntoIter = std::collections::btree_map::Iter<'a, Key, Setting>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for ConfigNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, setting) in &self.entries {
            map.serialize_entry(key.as_str(), setting)?;
        }
        map.end()
    }
}

impl Serialize for Setting {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Setting::Scalar(value) => value.serialize(serializer),
            Setting::Node(node) => node.serialize(serializer),
        }
    }
}
