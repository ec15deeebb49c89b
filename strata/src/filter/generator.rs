//! Filter schema generation for the record being edited.

use serde_json::Value;

use crate::StrataError;
use crate::layer::record_id;
use crate::path::lookup;
use crate::schema::{SchemaRegistry, SchemaResolver};
use crate::source::CollectionLoader;

use super::{FilterField, FilterSchema, FilterSchemaConfig, filter_field, remove_stale_keys};

/// Result of [`FilterSchemaGenerator::refresh`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterRefresh {
    /// One control per listed path, in list order.
    pub schema: FilterSchema,
    /// Pool id the schema was built for, if the reference resolved.
    pub reference: Option<String>,
    /// Stored filter values deleted because their path is no longer listed.
    pub removed: usize,
}

/// Builds filter schemas and keeps stored filter values consistent.
///
/// The generator remembers the pool id it last built for, including across
/// refreshes where the reference is cleared. Stored filter values are only
/// swept when that id changes, so opening a record never loses its values.
#[derive(Clone, Debug)]
pub struct FilterSchemaGenerator {
    config: FilterSchemaConfig,
    last_reference: Option<String>,
}

impl FilterSchemaGenerator {
    /// Generator driven by `config`.
    #[must_use]
    pub const fn new(config: FilterSchemaConfig) -> Self {
        Self {
            config,
            last_reference: None,
        }
    }

    /// Config in use.
    #[must_use]
    pub const fn config(&self) -> &FilterSchemaConfig {
        &self.config
    }

    /// Pool id of the previous successful refresh.
    #[must_use]
    pub fn last_reference(&self) -> Option<&str> {
        self.last_reference.as_deref()
    }

    /// Pool id `record` currently points at.
    ///
    /// The reference may be the id itself or an object carrying an `id`.
    #[must_use]
    pub fn reference_of(&self, record: &Value) -> Option<String> {
        let reference = lookup(record, &self.config.reference_field)?;
        match reference {
            Value::Object(_) => record_id(reference),
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Rebuild the filter schema for `record`.
    ///
    /// When the pool reference differs from the one seen by the previous
    /// refresh, keys of the configured filter-value objects that are not in
    /// the new field list are deleted from `record`.
    pub async fn refresh(
        &mut self,
        loader: CollectionLoader<'_>,
        registry: &SchemaRegistry,
        record: &mut Value,
    ) -> FilterRefresh {
        let Some(reference) = self.reference_of(record) else {
            return FilterRefresh::default();
        };
        let Some(pool) = loader.find(&self.config.pool_collection, &reference).await else {
            tracing::warn!(
                collection = %self.config.pool_collection,
                id = %reference,
                "pool record not found; filter schema left empty"
            );
            return FilterRefresh::default();
        };

        let paths = field_list(&pool, &self.config.field_list_field);
        let schema_name = lookup(&pool, &self.config.source_schema_field).and_then(Value::as_str);
        let target = schema_name.and_then(|name| registry.get(name));
        let resolver = SchemaResolver::new(loader);

        let mut schema = FilterSchema::with_capacity(paths.len());
        for path in &paths {
            let field = match &target {
                Some(target) => filter_field(&resolver, target, path)
                    .await
                    .unwrap_or_else(|err| placeholder(path, err)),
                None => FilterField::invalid(
                    path.as_str(),
                    format!(
                        "schema '{}' is not registered",
                        schema_name.unwrap_or_default()
                    ),
                ),
            };
            schema.insert(path.clone(), field);
        }

        let changed = self
            .last_reference
            .as_deref()
            .is_some_and(|previous| previous != reference);
        let removed = if changed {
            remove_stale_keys(record, &self.config.filter_value_fields, &paths)
        } else {
            0
        };
        if removed > 0 {
            tracing::debug!(id = %reference, removed, "dropped stale filter values");
        }
        self.last_reference = Some(reference.clone());

        FilterRefresh {
            schema,
            reference: Some(reference),
            removed,
        }
    }
}

fn field_list(pool: &Value, path: &str) -> Vec<String> {
    lookup(pool, path)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn placeholder(path: &str, err: StrataError) -> FilterField {
    tracing::debug!(path, error = %err, "filter path unusable");
    let reason = match err {
        StrataError::UnresolvedReference { reason, .. } => reason,
        other => other.to_string(),
    };
    FilterField::invalid(path, reason)
}
