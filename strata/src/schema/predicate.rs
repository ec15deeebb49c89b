//! Record predicates declared on reference fields.

use serde_json::{Map, Value};

use crate::path::lookup;

use super::FieldDefinition;

/// Every dotted path in `expected` must equal its expected value.
#[must_use]
pub fn matches_all(record: &Value, expected: &Map<String, Value>) -> bool {
    expected
        .iter()
        .all(|(path, want)| lookup(record, path) == Some(want))
}

/// At least one dotted path in `expected` must equal its expected value, or
/// be a member of it when the expected value is a list. An empty map matches.
#[must_use]
pub fn matches_any(record: &Value, expected: &Map<String, Value>) -> bool {
    expected.is_empty()
        || expected.iter().any(|(path, want)| {
            lookup(record, path).is_some_and(|actual| {
                actual == want
                    || want
                        .as_array()
                        .is_some_and(|accepted| accepted.contains(actual))
            })
        })
}

/// Both of `field`'s predicates, where present, accept `record`.
#[must_use]
pub fn record_passes(field: &FieldDefinition, record: &Value) -> bool {
    field
        .match_all
        .as_ref()
        .is_none_or(|expected| matches_all(record, expected))
        && field
            .match_any
            .as_ref()
            .is_none_or(|expected| matches_any(record, expected))
}
