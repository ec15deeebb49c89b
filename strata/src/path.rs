//! Dotted-path access into JSON records.
//!
//! Paths such as `meta.slot` step through nested objects one segment at a
//! time. A numeric segment indexes into an array.

use serde_json::Value;

/// Follow `path` through `value`.
///
/// ```
/// use serde_json::json;
/// use strata::path::lookup;
///
/// let record = json!({"meta": {"slot": "hand"}, "tags": ["a", "b"]});
/// assert_eq!(lookup(&record, "meta.slot"), Some(&json!("hand")));
/// assert_eq!(lookup(&record, "tags.1"), Some(&json!("b")));
/// assert_eq!(lookup(&record, "meta.missing"), None);
/// ```
#[must_use]
pub fn lookup<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    segments(path).try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Apply `visit` to every value reached by `path`, fanning out over arrays.
///
/// Unlike [`lookup`], an array met mid-path applies the remaining segments to
/// each element, so `rules.filter` visits the `filter` of every rule.
pub fn for_each_mut<F>(value: &mut Value, path: &str, visit: &mut F)
where
    F: FnMut(&mut Value),
{
    let parts: Vec<&str> = segments(path).collect();
    visit_parts(value, &parts, visit);
}

fn visit_parts<F>(value: &mut Value, parts: &[&str], visit: &mut F)
where
    F: FnMut(&mut Value),
{
    let Some((head, rest)) = parts.split_first() else {
        visit(value);
        return;
    };
    match value {
        Value::Object(map) => {
            if let Some(child) = map.get_mut(*head) {
                visit_parts(child, rest, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                visit_parts(item, parts, visit);
            }
        }
        _ => {}
    }
}

/// Non-empty segments of a dotted path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').map(str::trim).filter(|s| !s.is_empty())
}
