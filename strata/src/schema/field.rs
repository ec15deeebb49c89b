//! Field definitions and the closed set of field kinds.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Generator, SourceKind};

/// Ordered mapping from field name to definition.
pub type Schema = IndexMap<String, FieldDefinition>;

/// Shape of a field's value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Single-line text.
    #[default]
    #[serde(rename = "string")]
    String,
    /// Multi-line text.
    #[serde(rename = "text", alias = "textarea")]
    Text,
    /// Floating-point number.
    #[serde(rename = "number", alias = "float")]
    Number,
    /// Whole number.
    #[serde(rename = "integer", alias = "int")]
    Integer,
    /// True or false.
    #[serde(rename = "boolean", alias = "bool")]
    Boolean,
    /// Colour value.
    #[serde(rename = "color", alias = "colour")]
    Color,
    /// Reference to an asset file; `subtype` narrows it (e.g. `image`).
    #[serde(rename = "file")]
    File,
    /// One value from `options`.
    #[serde(rename = "select", alias = "choice")]
    Select,
    /// Any number of values from `options`.
    #[serde(rename = "multiselect", alias = "multi-select")]
    MultiSelect,
    /// Free list of strings.
    #[serde(rename = "string[]", alias = "string-list", alias = "tags")]
    StringList,
    /// Nested record described by `objects`.
    #[serde(rename = "object")]
    Object,
    /// List of nested records described by `objects`.
    #[serde(rename = "object[]")]
    ObjectList,
}

impl FieldKind {
    /// Numeric kinds.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Integer)
    }

    /// Kinds whose values come from an option list.
    #[must_use]
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }

    /// Kinds that hold a nested schema.
    #[must_use]
    pub const fn is_nested(self) -> bool {
        matches!(self, Self::Object | Self::ObjectList)
    }

    /// Spelling used in schema documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Color => "color",
            Self::File => "file",
            Self::Select => "select",
            Self::MultiSelect => "multiselect",
            Self::StringList => "string[]",
            Self::Object => "object",
            Self::ObjectList => "object[]",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of a schema, before or after resolution.
///
/// After [`super::SchemaResolver`] has run, reference fields carry `options`
/// (choice kinds) or `objects` (nested kinds). The directives stay in place
/// so the schema can be resolved again when the owning record changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Shape of the value.
    #[serde(rename = "type", alias = "kind")]
    pub kind: FieldKind,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value materialised into base-authoring records that omit the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Lower bound for numeric kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound for numeric kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Narrower asset type for `file` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Allowed values for choice kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,
    /// Nested schema for `object` and `object[]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objects: Option<Schema>,
    /// Collection whose records drive this field's options or objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_collection: Option<String>,
    /// How each source record is converted into a nested field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_kind: Option<SourceKind>,
    /// Dynamic option generation strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<Generator>,
    /// Source records must match every dotted path listed here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_all: Option<Map<String, Value>>,
    /// Source records must match at least one dotted path listed here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_any: Option<Map<String, Value>>,
}

impl FieldDefinition {
    /// A bare field of `kind`.
    #[must_use]
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Set the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the default value.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the option list.
    #[must_use]
    pub fn with_options(mut self, options: Vec<Value>) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the nested schema.
    #[must_use]
    pub fn with_objects(mut self, objects: Schema) -> Self {
        self.objects = Some(objects);
        self
    }

    /// Point the field at `collection`.
    #[must_use]
    pub fn with_source(mut self, collection: impl Into<String>, kind: Option<SourceKind>) -> Self {
        self.source_collection = Some(collection.into());
        self.source_kind = kind;
        self
    }

    /// Returns `true` when the field needs runtime resolution.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        self.source_collection.is_some() || self.generator.is_some()
    }

    /// Label for display, falling back to `fallback`.
    #[must_use]
    pub fn label_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(fallback)
    }
}
