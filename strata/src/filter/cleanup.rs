//! Sweeping stored filter values after the filter set changes.

use serde_json::Value;

use crate::path::for_each_mut;

/// Delete keys not listed in `keep` from every object reached by
/// `value_paths` in `record`.
///
/// Returns the number of keys removed.
///
/// ```
/// use serde_json::json;
/// use strata::filter::remove_stale_keys;
///
/// let mut record = json!({"filters": {"a": 1, "b": 2}});
/// let removed = remove_stale_keys(&mut record, &["filters".into()], &["a".into(), "c".into()]);
/// assert_eq!(removed, 1);
/// assert_eq!(record, json!({"filters": {"a": 1}}));
/// ```
pub fn remove_stale_keys(record: &mut Value, value_paths: &[String], keep: &[String]) -> usize {
    let mut removed = 0;
    for path in value_paths {
        for_each_mut(record, path, &mut |values| {
            if let Some(map) = values.as_object_mut() {
                let before = map.len();
                map.retain(|key, _| keep.contains(key));
                removed += before - map.len();
            }
        });
    }
    removed
}
