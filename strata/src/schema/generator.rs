//! Option generators driven by the record being edited.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::lookup;

/// Named strategy that derives a field's options at resolution time.
///
/// Generators read the owning record, which the caller passes explicitly to
/// [`super::SchemaResolver::resolve`]. Paths are dotted and start at the
/// owning record's root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "camelCase")]
pub enum Generator {
    /// Options are the entries of a list in the owning record. String entries
    /// are used as-is; object entries contribute their `id`, else `name`.
    SiblingOptions {
        /// Dotted path of the list.
        field: String,
    },
    /// Options are the keys of an object in the owning record.
    SiblingKeys {
        /// Dotted path of the object.
        field: String,
    },
}

impl Generator {
    /// Generate options from `owner`; no owner yields no options.
    #[must_use]
    pub fn generate(&self, owner: Option<&Value>) -> Vec<Value> {
        let Some(record) = owner else {
            return Vec::new();
        };
        match self {
            Self::SiblingOptions { field } => lookup(record, field)
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(option_from_entry).collect())
                .unwrap_or_default(),
            Self::SiblingKeys { field } => lookup(record, field)
                .and_then(Value::as_object)
                .map(|map| map.keys().cloned().map(Value::String).collect())
                .unwrap_or_default(),
        }
    }
}

fn option_from_entry(entry: &Value) -> Option<Value> {
    match entry {
        Value::String(_) | Value::Number(_) => Some(entry.clone()),
        Value::Object(map) => map
            .get("id")
            .or_else(|| map.get("name"))
            .filter(|v| v.is_string() || v.is_number())
            .cloned(),
        _ => None,
    }
}
