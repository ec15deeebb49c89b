//! Schema default materialisation for base-authoring records.
//!
//! Defaults are only written where a record defines the base value of an
//! entity. In a mod override an absent key means "inherit from below", so
//! materialising a default there would silently shadow the lower layer.

use serde_json::{Map, Value};

use crate::EditContext;
use crate::schema::{FieldDefinition, FieldKind, Schema};

/// What the record being edited represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthoringMode {
    /// Editing the base game's own content.
    Core,
    /// Creating an entity that exists in no lower layer.
    NewEntity,
    /// Overriding an entity defined by a lower layer.
    ModOverride,
}

impl AuthoringMode {
    /// Mode for editing in `context`; `is_new` marks an entity with no base.
    #[must_use]
    pub fn for_context(context: &EditContext, is_new: bool) -> Self {
        if is_new {
            Self::NewEntity
        } else if context.is_core() {
            Self::Core
        } else {
            Self::ModOverride
        }
    }

    /// Returns `true` when the record defines base values.
    #[must_use]
    pub const fn is_base_authoring(self) -> bool {
        matches!(self, Self::Core | Self::NewEntity)
    }
}

/// Fills absent fields of base-authoring records from schema defaults.
///
/// A key that is present, even with an explicit `null`, is never touched.
///
/// ```
/// use serde_json::json;
/// use strata::defaults::{AuthoringMode, DefaultValueInjector};
/// use strata::schema::Schema;
///
/// let schema: Schema = serde_json::from_value(json!({
///     "name": {"type": "string", "default": "Unnamed"},
///     "color": {"type": "color", "default": "#ffffff"}
/// }))?;
/// let mut record = json!({"name": "custom"});
/// let added = DefaultValueInjector::new(AuthoringMode::Core).inject(&mut record, &schema);
/// assert_eq!(added, 1);
/// assert_eq!(record, json!({"name": "custom", "color": "#ffffff"}));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DefaultValueInjector {
    mode: AuthoringMode,
    skip_all: bool,
}

impl DefaultValueInjector {
    /// Injector for records authored in `mode`.
    #[must_use]
    pub const fn new(mode: AuthoringMode) -> Self {
        Self {
            mode,
            skip_all: false,
        }
    }

    /// Force-skip injection regardless of mode.
    #[must_use]
    pub const fn with_skip(mut self, skip: bool) -> Self {
        self.skip_all = skip;
        self
    }

    /// Authoring mode in effect.
    #[must_use]
    pub const fn mode(&self) -> AuthoringMode {
        self.mode
    }

    /// Returns `true` when [`Self::inject`] will write anything at all.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.skip_all && self.mode.is_base_authoring()
    }

    /// Materialise defaults into `target`, a record or an array of records.
    ///
    /// Returns the number of keys written, nested ones included.
    pub fn inject(&self, target: &mut Value, schema: &Schema) -> usize {
        if !self.is_active() {
            return 0;
        }
        let added = inject_value(target, schema);
        if added > 0 {
            tracing::debug!(added, "materialised schema defaults");
        }
        added
    }
}

fn inject_value(target: &mut Value, schema: &Schema) -> usize {
    match target {
        Value::Object(record) => inject_record(record, schema),
        Value::Array(items) => items.iter_mut().map(|item| inject_value(item, schema)).sum(),
        _ => 0,
    }
}

fn inject_record(record: &mut Map<String, Value>, schema: &Schema) -> usize {
    let mut added = 0;
    for (name, field) in schema {
        let Some(value) = record.get_mut(name) else {
            if let Some((value, written)) = materialise(field) {
                record.insert(name.clone(), value);
                added += written;
            }
            continue;
        };
        if field.kind.is_nested()
            && let Some(objects) = &field.objects
        {
            added += inject_value(value, objects);
        }
    }
    added
}

/// Value for an absent field and the number of keys it accounts for.
fn materialise(field: &FieldDefinition) -> Option<(Value, usize)> {
    if let Some(default) = &field.default {
        let mut value = default.clone();
        let nested = match (&field.objects, field.kind.is_nested()) {
            (Some(objects), true) => inject_value(&mut value, objects),
            _ => 0,
        };
        return Some((value, nested + 1));
    }
    match field.kind {
        FieldKind::Object => {
            let mut value = Value::Object(Map::new());
            let nested = field
                .objects
                .as_ref()
                .map_or(0, |objects| inject_value(&mut value, objects));
            (nested > 0).then_some((value, nested + 1))
        }
        FieldKind::ObjectList => Some((Value::Array(Vec::new()), 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::{AuthoringMode, DefaultValueInjector};
    use crate::EditContext;
    use crate::schema::Schema;

    #[fixture]
    fn schema() -> Schema {
        serde_json::from_value(json!({
            "name": {"type": "string", "default": "Unnamed"},
            "color": {"type": "color", "default": "#ffffff"},
            "tags": {"type": "string[]", "default": ["new"]},
            "stats": {
                "type": "object",
                "objects": {
                    "hp": {"type": "integer", "default": 10},
                    "notes": {"type": "text"}
                }
            },
            "meta": {"type": "object", "objects": {"note": {"type": "text"}}},
            "drops": {
                "type": "object[]",
                "objects": {"chance": {"type": "number", "default": 0.5}}
            }
        }))
        .expect("schema literal parses")
    }

    #[rstest]
    #[case::core(false, "core", AuthoringMode::Core)]
    #[case::new_in_core(true, "core", AuthoringMode::NewEntity)]
    #[case::new_in_mod(true, "hardmode", AuthoringMode::NewEntity)]
    #[case::override_in_mod(false, "hardmode", AuthoringMode::ModOverride)]
    fn mode_follows_context(
        #[case] is_new: bool,
        #[case] mod_name: &str,
        #[case] expected: AuthoringMode,
    ) {
        let ctx = EditContext::new("/c", "rpg", mod_name);
        assert_eq!(AuthoringMode::for_context(&ctx, is_new), expected);
    }

    #[rstest]
    fn core_records_receive_every_missing_default(schema: Schema) {
        let mut record = json!({"id": "orc"});
        let added = DefaultValueInjector::new(AuthoringMode::Core).inject(&mut record, &schema);
        assert_eq!(
            record,
            json!({
                "id": "orc",
                "name": "Unnamed",
                "color": "#ffffff",
                "tags": ["new"],
                "stats": {"hp": 10},
                "drops": []
            })
        );
        assert_eq!(added, 6);
    }

    #[rstest]
    fn defined_values_are_never_overwritten(schema: Schema) {
        let mut record = json!({"name": "custom", "color": null, "tags": []});
        DefaultValueInjector::new(AuthoringMode::NewEntity).inject(&mut record, &schema);
        assert_eq!(record["name"], json!("custom"));
        assert_eq!(record["color"], json!(null));
        assert_eq!(record["tags"], json!([]));
    }

    #[rstest]
    fn mod_override_leaves_fields_absent(schema: Schema) {
        let mut record = json!({"id": "orc", "name": "Big Orc"});
        let added =
            DefaultValueInjector::new(AuthoringMode::ModOverride).inject(&mut record, &schema);
        assert_eq!(added, 0);
        assert_eq!(record.get("color"), None);
    }

    #[rstest]
    fn skip_flag_wins_over_mode(schema: Schema) {
        let mut record = json!({});
        let injector = DefaultValueInjector::new(AuthoringMode::Core).with_skip(true);
        assert!(!injector.is_active());
        assert_eq!(injector.inject(&mut record, &schema), 0);
        assert_eq!(record, json!({}));
    }

    #[rstest]
    fn existing_nested_objects_and_lists_are_filled(schema: Schema) {
        let mut record = json!({
            "stats": {"notes": "tough"},
            "drops": [{"item": "tooth"}, {"item": "club", "chance": 0.1}]
        });
        DefaultValueInjector::new(AuthoringMode::Core).inject(&mut record, &schema);
        assert_eq!(record["stats"], json!({"notes": "tough", "hp": 10}));
        assert_eq!(
            record["drops"],
            json!([{"item": "tooth", "chance": 0.5}, {"item": "club", "chance": 0.1}])
        );
    }

    #[rstest]
    fn arrays_of_records_are_filled_per_element(schema: Schema) {
        let mut records = json!([{"id": "a"}, {"id": "b", "name": "Bee"}, "stray"]);
        DefaultValueInjector::new(AuthoringMode::Core).inject(&mut records, &schema);
        assert_eq!(records[0]["name"], json!("Unnamed"));
        assert_eq!(records[1]["name"], json!("Bee"));
        assert_eq!(records[2], json!("stray"));
    }
}
