//! Scope selection on the primary source.

use super::key::Key;
use serde_yaml::{Mapping, Value};

/// Find the sub-mapping stored under `scope` in a raw primary source.
///
/// The key is tried as given, then as text, then in symbol form (`:name`).
/// The first candidate that holds a mapping wins. Returns `None` when no
/// candidate does; callers treat that as an empty configuration.
pub fn select_scope<'a>(source: &'a Mapping, scope: &Value) -> Option<&'a Mapping> {
    scope_candidates(scope)
        .iter()
        .find_map(|candidate| source.get(candidate).and_then(Value::as_mapping))
}

fn scope_candidates(scope: &Value) -> [Value; 3] {
    let text = Key::normalize(scope);
    [
        scope.clone(),
        Value::from(text.as_str()),
        Value::from(text.symbol_form()),
    ]
}
