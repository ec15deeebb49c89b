//! Record grouping and JSON deep-merge mechanics.

use std::cmp::Ordering;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::{Map, Value};

use super::CollectionLayer;

/// Field that, when numeric on any merged record, sorts the whole result.
const ORDER_FIELD: &str = "order";

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - Objects merge recursively; a non-object target is replaced by `{}` first.
/// - Arrays concatenate in precedence order. Incoming elements already held
///   by the lower layer's array are not appended twice, so overlaying a
///   layer on itself is a no-op.
/// - Scalars, and values whose type differs from the target, replace the
///   target wholesale.
///
/// # Examples
///
/// ```rust
/// use strata::layer::merge_value;
/// use serde_json::json;
///
/// let mut acc = json!({"a": {"x": 1, "y": 2}, "arr": [1, 2]});
/// merge_value(&mut acc, json!({"a": {"y": 3}, "arr": [3]}));
/// assert_eq!(acc, json!({"a": {"x": 1, "y": 3}, "arr": [1, 2, 3]}));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match layer {
        Value::Object(map) => merge_object(target, map),
        Value::Array(items) => merge_array(target, items),
        scalar => *target = scalar,
    }
}

fn merge_object(target: &mut Value, map: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    let Some(target_map) = target.as_object_mut() else {
        return;
    };

    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}

fn merge_array(target: &mut Value, items: Vec<Value>) {
    let Value::Array(existing) = target else {
        *target = Value::Array(items);
        return;
    };
    let inherited = existing.len();
    for item in items {
        if !existing.iter().take(inherited).any(|held| held == &item) {
            existing.push(item);
        }
    }
}

/// Identity of a record within its collection.
///
/// String ids are used verbatim; numeric ids use their decimal text. Records
/// without a usable id return `None`.
///
/// ```rust
/// use strata::layer::record_id;
/// use serde_json::json;
///
/// assert_eq!(record_id(&json!({"id": "sword"})).as_deref(), Some("sword"));
/// assert_eq!(record_id(&json!({"id": 7})).as_deref(), Some("7"));
/// assert_eq!(record_id(&json!({"name": "no id"})), None);
/// ```
#[must_use]
pub fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Merge ordered layers (lowest precedence first) into one record list.
///
/// Records sharing an `id` are combined with [`merge_value`]; records
/// without an id are dropped. The result keeps first-seen id order unless a
/// merged record carries a numeric `order`, in which case the whole list is
/// stably sorted by `order` with missing values counting as zero.
#[must_use]
pub fn merge_layers<'a, I>(layers: I) -> Vec<Value>
where
    I: IntoIterator<Item = CollectionLayer<'a>>,
{
    let mut merged: IndexMap<String, Value> = IndexMap::new();
    for layer in layers {
        let provenance = layer.provenance();
        for record in layer.into_records() {
            let Some(id) = record_id(&record) else {
                tracing::debug!(?provenance, "dropping record without an id");
                continue;
            };
            match merged.entry(id) {
                Entry::Occupied(slot) => merge_value(slot.into_mut(), record),
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }
    }

    let mut records: Vec<Value> = merged.into_values().collect();
    if records.iter().any(|record| numeric_order(record).is_some()) {
        records.sort_by(|a, b| compare_order(a, b));
    }
    records
}

fn numeric_order(record: &Value) -> Option<f64> {
    record.get(ORDER_FIELD).and_then(Value::as_f64)
}

fn compare_order(a: &Value, b: &Value) -> Ordering {
    let left = numeric_order(a).unwrap_or(0.0);
    let right = numeric_order(b).unwrap_or(0.0);
    left.total_cmp(&right)
}
