//! Canonical setting keys.
//!
//! Every key stored in a [`ConfigNode`](super::ConfigNode) goes through
//! [`Key::normalize`] or one of the `From` conversions, so lookups by `"name"`,
//! by a document key written as `:name`, or by an existing [`Key`] all land on
//! the same entry.

use serde_yaml::Value;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// A canonical, case-preserving setting key.
///
/// Cloning is cheap; the text is shared.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(Arc<str>);

impl Key {
    /// Canonicalize a raw document key.
    ///
    /// - Strings are kept as written, except the symbol form `:name`, which
    ///   maps to `name`.
    /// - Numbers and booleans use their display form, null becomes `null`.
    /// - Tagged keys are canonicalized by their inner value.
    /// - Sequences and mappings use their single-line flow YAML rendering.
    pub fn normalize(raw: &Value) -> Self {
        match raw {
            Value::String(text) => Self::from(symbol_name(text).unwrap_or(text)),
            Value::Number(number) => Self::from(number.to_string()),
            Value::Bool(flag) => Self::from(flag.to_string()),
            Value::Null => Self::from("null"),
            Value::Tagged(tagged) => Self::normalize(&tagged.value),
            composite => Self::from(flow_text(composite)),
        }
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The symbol form of this key, as it would be written in a document.
    pub fn symbol_form(&self) -> String {
        format!(":{}", self.0)
    }
}

/// Returns the bare name if `text` is written in symbol form.
///
/// `:name` counts, `:` and `::name` do not.
pub(crate) fn symbol_name(text: &str) -> Option<&str> {
    let name = text.strip_prefix(':')?;
    if name.is_empty() || name.starts_with(':') {
        None
    } else {
        Some(name)
    }
}

fn flow_text(value: &Value) -> String {
    match value {
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().map(flow_text).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Mapping(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", flow_text(k), flow_text(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => "null".to_string(),
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, flow_text(&tagged.value)),
    }
}

impl From<&str> for Key {
    fn from(text: &str) -> Self {
        Self(Arc::from(text))
    }
}

impl From<String> for Key {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}

impl From<&String> for Key {
    fn from(text: &String) -> Self {
        Self::from(text.as_str())
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl From<&Value> for Key {
    fn from(raw: &Value) -> Self {
        Self::normalize(raw)
    }
}

macro_rules! key_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Key {
                fn from(value: $ty) -> Self {
                    Self::from(value.to_string())
                }
            }
        )*
    };
}

key_from_display!(i32, i64, u32, u64, usize, bool);

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
