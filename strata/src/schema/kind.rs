//! Conversion of source records into field definitions.
//!
//! A nested field pointing at another collection turns each record of that
//! collection into one child field. The child's shape comes either from the
//! parent's `sourceKind` or, for `custom`, from the record's own `type`.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FieldDefinition, FieldKind, Schema};

/// Shapes a source record can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeclaredKind {
    /// Floating-point number.
    Number,
    /// Whole number.
    Integer,
    /// True or false.
    Boolean,
    /// Single-line text.
    String,
    /// Multi-line text.
    Text,
    /// Colour value.
    Color,
    /// Image file.
    Image,
    /// Any file.
    File,
    /// Single choice from the record's own `options`.
    Select,
    /// Multiple choices from the record's own `options`.
    MultiSelect,
    /// Free list of strings.
    StringList,
    /// Nested record described by the record's `objects`.
    Object,
    /// List of nested records described by the record's `objects`.
    ObjectList,
}

impl DeclaredKind {
    /// Field kind produced for this shape.
    #[must_use]
    pub const fn field_kind(self) -> FieldKind {
        match self {
            Self::Number => FieldKind::Number,
            Self::Integer => FieldKind::Integer,
            Self::Boolean => FieldKind::Boolean,
            Self::String => FieldKind::String,
            Self::Text => FieldKind::Text,
            Self::Color => FieldKind::Color,
            Self::Image | Self::File => FieldKind::File,
            Self::Select => FieldKind::Select,
            Self::MultiSelect => FieldKind::MultiSelect,
            Self::StringList => FieldKind::StringList,
            Self::Object => FieldKind::Object,
            Self::ObjectList => FieldKind::ObjectList,
        }
    }

    /// File subtype implied by this shape.
    #[must_use]
    pub const fn subtype(self) -> Option<&'static str> {
        match self {
            Self::Image => Some("image"),
            _ => None,
        }
    }

    /// Canonical spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Text => "text",
            Self::Color => "color",
            Self::Image => "image",
            Self::File => "file",
            Self::Select => "select",
            Self::MultiSelect => "multiselect",
            Self::StringList => "string[]",
            Self::Object => "object",
            Self::ObjectList => "object[]",
        }
    }

    /// Parse a declared kind, accepting the common aliases.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let kind = match raw.trim().to_ascii_lowercase().as_str() {
            "number" | "float" => Self::Number,
            "integer" | "int" => Self::Integer,
            "boolean" | "bool" => Self::Boolean,
            "string" => Self::String,
            "text" | "textarea" => Self::Text,
            "color" | "colour" => Self::Color,
            "image" => Self::Image,
            "file" => Self::File,
            "select" | "choice" => Self::Select,
            "multiselect" | "multi-select" => Self::MultiSelect,
            "string[]" | "string-list" | "tags" => Self::StringList,
            "object" => Self::Object,
            "object[]" => Self::ObjectList,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for DeclaredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DeclaredKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown kind '{value}'"))
    }
}

impl From<DeclaredKind> for String {
    fn from(kind: DeclaredKind) -> Self {
        kind.as_str().to_owned()
    }
}

/// How a reference field interprets each record of its source collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SourceKind {
    /// Every record becomes a field of the same fixed shape.
    Declared(DeclaredKind),
    /// Each record declares its own shape in its `type` attribute.
    Custom,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("custom") {
            return Ok(Self::Custom);
        }
        DeclaredKind::parse(raw)
            .map(Self::Declared)
            .ok_or_else(|| format!("unknown source kind '{raw}'"))
    }
}

impl TryFrom<String> for SourceKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SourceKind> for String {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Declared(declared) => declared.into(),
            SourceKind::Custom => "custom".to_owned(),
        }
    }
}

impl SourceKind {
    /// Shape this kind selects for `record`.
    ///
    /// `Custom` reads the record's `type`; a missing or unknown type falls
    /// back to a plain string field so the record stays editable.
    #[must_use]
    pub fn declared_for(self, id: &str, record: &Value) -> DeclaredKind {
        match self {
            Self::Declared(declared) => declared,
            Self::Custom => {
                let declared = record.get("type").and_then(Value::as_str);
                declared.and_then(DeclaredKind::parse).unwrap_or_else(|| {
                    tracing::warn!(
                        id,
                        declared = declared.unwrap_or("<missing>"),
                        "source record declares no known type; using a string field"
                    );
                    DeclaredKind::String
                })
            }
        }
    }

    /// Convert the source record `id` into a field definition.
    ///
    /// Attributes are read one at a time; an unreadable attribute is logged
    /// and left unset without affecting the others.
    #[must_use]
    pub fn convert(self, id: &str, record: &Value) -> FieldDefinition {
        let mut field = self.shape(id, record);
        let label = field.label.take().or_else(|| attribute(id, record, "name"));
        field.label = Some(label.unwrap_or_else(|| id.to_owned()));
        field
    }

    fn shape(self, id: &str, record: &Value) -> FieldDefinition {
        let declared = self.declared_for(id, record);
        let mut field = FieldDefinition::new(declared.field_kind());
        field.subtype = declared
            .subtype()
            .map(str::to_owned)
            .or_else(|| attribute(id, record, "subtype"));
        field.label = attribute(id, record, "label");
        field.description = attribute(id, record, "description");
        field.default = attribute(id, record, "default");
        field.source_collection = attribute(id, record, "sourceCollection");
        field.source_kind = attribute(id, record, "sourceKind");
        field.generator = attribute(id, record, "generator");
        field.match_all = attribute(id, record, "matchAll");
        field.match_any = attribute(id, record, "matchAny");

        match declared {
            DeclaredKind::Number | DeclaredKind::Integer => {
                field.min = attribute(id, record, "min");
                field.max = attribute(id, record, "max");
            }
            DeclaredKind::Select | DeclaredKind::MultiSelect => {
                field.options = Some(attribute(id, record, "options").unwrap_or_default());
            }
            DeclaredKind::Object | DeclaredKind::ObjectList => {
                field.objects = Some(nested_objects(id, record));
            }
            DeclaredKind::Boolean
            | DeclaredKind::String
            | DeclaredKind::Text
            | DeclaredKind::Color
            | DeclaredKind::Image
            | DeclaredKind::File
            | DeclaredKind::StringList => {}
        }
        field
    }
}

/// Entries of `record.objects`, each read with the same vocabulary as a
/// `custom` source record.
fn nested_objects(id: &str, record: &Value) -> Schema {
    let Some(objects) = record.get("objects").filter(|raw| !raw.is_null()) else {
        return Schema::new();
    };
    let Some(entries) = objects.as_object() else {
        tracing::warn!(id, "source record `objects` is not a map; ignoring it");
        return Schema::new();
    };
    entries
        .iter()
        .map(|(key, entry)| (key.clone(), SourceKind::Custom.shape(key, entry)))
        .collect()
}

fn attribute<T: DeserializeOwned>(id: &str, record: &Value, key: &str) -> Option<T> {
    let raw = record.get(key).filter(|raw| !raw.is_null())?;
    T::deserialize(raw)
        .inspect_err(|err| {
            tracing::warn!(id, attribute = key, error = %err, "source record attribute unreadable; ignoring it");
        })
        .ok()
}
