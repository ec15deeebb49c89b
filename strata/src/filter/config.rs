//! Where the generator finds its inputs.

use serde::{Deserialize, Serialize};

fn default_source_schema_field() -> String {
    "sourceSchema".to_owned()
}

fn default_field_list_field() -> String {
    "fields".to_owned()
}

/// Field names the filter generator reads.
///
/// Every name is a dotted path. `reference_field` is read from the record
/// being edited, `source_schema_field` and `field_list_field` from the pool
/// record it points at. `filter_value_fields` lists the objects in the edited
/// record whose keys are filter paths; an array met along such a path applies
/// the rest of the path to each element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSchemaConfig {
    /// Path of the pool reference in the edited record.
    pub reference_field: String,
    /// Collection holding pool records.
    pub pool_collection: String,
    /// Path of the target schema name in the pool record.
    #[serde(default = "default_source_schema_field")]
    pub source_schema_field: String,
    /// Path of the filterable field list in the pool record.
    #[serde(default = "default_field_list_field")]
    pub field_list_field: String,
    /// Paths of dependent filter-value objects in the edited record.
    #[serde(default)]
    pub filter_value_fields: Vec<String>,
}

impl FilterSchemaConfig {
    /// Config reading the pool id from `reference_field` and looking it up in
    /// `pool_collection`.
    #[must_use]
    pub fn new(reference_field: impl Into<String>, pool_collection: impl Into<String>) -> Self {
        Self {
            reference_field: reference_field.into(),
            pool_collection: pool_collection.into(),
            source_schema_field: default_source_schema_field(),
            field_list_field: default_field_list_field(),
            filter_value_fields: Vec::new(),
        }
    }

    /// Override where the pool record names its target schema.
    #[must_use]
    pub fn with_source_schema_field(mut self, path: impl Into<String>) -> Self {
        self.source_schema_field = path.into();
        self
    }

    /// Override where the pool record lists its filterable paths.
    #[must_use]
    pub fn with_field_list_field(mut self, path: impl Into<String>) -> Self {
        self.field_list_field = path.into();
        self
    }

    /// Add a dependent filter-value object path.
    #[must_use]
    pub fn with_filter_values(mut self, path: impl Into<String>) -> Self {
        self.filter_value_fields.push(path.into());
        self
    }
}
