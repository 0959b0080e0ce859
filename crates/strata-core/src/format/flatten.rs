use indexmap::IndexMap;
use serde_json::Value;

use crate::config::{Snapshot, compose_key};
use crate::error::{ConfigError, Result};

/// Separator used when a list of scalars collapses into one value.
pub const LIST_SEPARATOR: &str = ",";

/// Flattens a hierarchical document into a snapshot with dot-notation keys.
///
/// Example:
/// {"server": {"port": 80}} -> {"server.port": "80"}
///
/// Lists of scalars become a single comma-separated value, so they bind to
/// list-typed accessors. Lists containing mappings are expanded with an
/// index segment (`servers.0.host`). An empty document yields an empty
/// snapshot. Keys keep the order they appear in the document.
pub fn flatten_document(format: &str, document: Value) -> Result<Snapshot> {
    match document {
        Value::Object(map) => {
            let mut flat = IndexMap::new();
            for (key, value) in map {
                flatten_value(&key, value, &mut flat);
            }
            Ok(Snapshot::from(flat))
        },
        Value::Null => Ok(Snapshot::new()),
        other => Err(ConfigError::parse_error(
            format,
            format!("expected a mapping at the top level, found {}", kind_of(&other)),
        )),
    }
}

fn flatten_value(prefix: &str, value: Value, target: &mut IndexMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (curr_key, curr_val) in map {
                flatten_value(&compose_key(prefix, &curr_key), curr_val, target);
            }
        },
        Value::Array(items) if items.iter().all(is_scalar) => {
            let joined = items
                .into_iter()
                .map(scalar_to_string)
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR);
            target.insert(prefix.to_string(), joined);
        },
        Value::Array(items) => {
            for (index, item) in items.into_iter().enumerate() {
                flatten_value(&compose_key(prefix, &index.to_string()), item, target);
            }
        },
        scalar => {
            target.insert(prefix.to_string(), scalar_to_string(scalar));
        },
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
