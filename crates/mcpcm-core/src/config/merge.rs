//! Merge and removal of server mappings.
//!
//! All functions here borrow their inputs and build a fresh mapping, so the
//! caller can keep using what it passed in.

use serde_json::Value;

use super::servers::ServerMapping;

/// Combine `incoming` into `existing`.
///
/// Names present on one side only are carried over unchanged. For a name on
/// both sides, `replace` swaps in the incoming definition wholesale;
/// otherwise the two are shallow-merged: each top-level field of the incoming
/// definition overwrites the existing one, so an incoming `env` or `args`
/// replaces the old value instead of being combined with it.
pub fn merge_servers(
    existing: &ServerMapping,
    incoming: &ServerMapping,
    replace: bool,
) -> ServerMapping {
    let mut merged = existing.clone();
    for (name, definition) in incoming.iter() {
        let value = match (replace, existing.get(name)) {
            (false, Some(current)) => shallow_merge(current, definition),
            _ => definition.clone(),
        };
        merged.insert(name.clone(), value);
    }
    merged
}

fn shallow_merge(current: &Value, overlay: &Value) -> Value {
    match (current, overlay) {
        (Value::Object(base), Value::Object(fields)) => {
            let mut out = base.clone();
            for (key, value) in fields {
                out.insert(key.clone(), value.clone());
            }
            Value::Object(out)
        }
        // Not both objects: nothing field-wise to keep.
        _ => overlay.clone(),
    }
}

/// Drop every listed name from `config`. Unknown names are ignored.
pub fn remove_servers<S: AsRef<str>>(config: &ServerMapping, names: &[S]) -> ServerMapping {
    config
        .iter()
        .filter(|(name, _)| !names.iter().any(|n| n.as_ref() == name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Split `incoming` by whether each name already exists in `existing`.
///
/// Returns the entries that can be applied as updates and, in incoming order,
/// the names that were not found.
pub fn split_existing(
    existing: &ServerMapping,
    incoming: &ServerMapping,
) -> (ServerMapping, Vec<String>) {
    let mut applicable = ServerMapping::new();
    let mut missing = Vec::new();
    for (name, definition) in incoming.iter() {
        if existing.contains(name) {
            applicable.insert(name.clone(), definition.clone());
        } else {
            missing.push(name.clone());
        }
    }
    (applicable, missing)
}
