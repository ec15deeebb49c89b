//! Static schemas known to the host.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::context::normalize_collection_name;
use crate::{StrataResult, StrataResultExt};

use super::Schema;

/// Static schemas keyed by collection name.
///
/// Names are normalised with [`normalize_collection_name`], so a pool record
/// naming `"items.json"` finds the schema registered as `"items"`.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, schema: Schema) {
        self.schemas
            .insert(normalize_collection_name(name).to_owned(), Arc::new(schema));
    }

    /// Builder form of [`SchemaRegistry::register`].
    #[must_use]
    pub fn with(mut self, name: &str, schema: Schema) -> Self {
        self.register(name, schema);
        self
    }

    /// Parse `document` as a schema and register it under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::Json`] when `document` is not a schema.
    pub fn register_json(&mut self, name: &str, document: Value) -> StrataResult<()> {
        let schema: Schema = serde_json::from_value(document).into_strata()?;
        self.register(name, schema);
        Ok(())
    }

    /// Schema registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(normalize_collection_name(name)).cloned()
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}
