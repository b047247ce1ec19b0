//! `--set dotted.key=value` assignments.

use super::split_path;
use anyhow::{Result, bail};
use serde_yaml::{Mapping, Value};

/// Build an explicit override mapping from `key.path=value` assignments.
///
/// Values are parsed as YAML scalars (`8080` is a number, `true` a boolean);
/// anything that does not parse is kept as text. Later assignments win.
pub fn overrides_from_assignments(assignments: &[String]) -> Result<Mapping> {
    let mut overrides = Mapping::new();
    for assignment in assignments {
        let Some((path, raw)) = assignment.split_once('=') else {
            bail!("invalid assignment '{assignment}', expected KEY=VALUE");
        };
        let keys = split_path(path);
        if keys.is_empty() {
            bail!("invalid assignment '{assignment}', key is empty");
        }
        insert_path(&mut overrides, &keys, parse_value(raw));
    }
    Ok(overrides)
}

fn parse_value(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::from(raw))
}

/// Parse a single key written on the command line: `2024` is a number,
/// `true` a boolean, anything that is not a plain scalar stays text.
pub fn parse_scalar(raw: &str) -> Value {
    match parse_value(raw) {
        value @ (Value::String(_) | Value::Number(_) | Value::Bool(_)) => value,
        _ => Value::from(raw),
    }
}

fn insert_path(target: &mut Mapping, path: &[&str], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    if rest.is_empty() {
        target.insert(Value::from(*first), value);
        return;
    }
    if !matches!(target.get(*first), Some(Value::Mapping(_))) {
        target.insert(Value::from(*first), Value::Mapping(Mapping::new()));
    }
    if let Some(Value::Mapping(child)) = target.get_mut(*first) {
        insert_path(child, rest, value);
    }
}
