//! Layer reads for one collection in one game/mod context.

use std::sync::Arc;

use camino::Utf8Path;
use serde_json::Value;

use crate::layer::{CollectionLayer, LayerComposer, merge_layers};
use crate::storage::Storage;
use crate::{EditContext, StrataError, StrataResult};

use super::PluginLayers;

/// Split a parsed collection document into its records.
///
/// # Errors
///
/// Returns [`StrataError::MalformedSource`] when the document is not an
/// array.
pub fn records_from_document(path: &Utf8Path, document: Value) -> StrataResult<Vec<Value>> {
    match document {
        Value::Array(records) => Ok(records),
        other => Err(StrataError::malformed(
            path,
            format!("expected an array of records, found {}", json_type(&other)),
        )),
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reads the layers of any collection for a fixed context.
#[derive(Clone)]
pub struct CollectionSource {
    storage: Arc<dyn Storage>,
    context: EditContext,
    plugins: Arc<PluginLayers>,
}

impl std::fmt::Debug for CollectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionSource")
            .field("context", &self.context)
            .field("plugins", &self.plugins)
            .field("storage", &"<storage>")
            .finish()
    }
}

impl CollectionSource {
    /// Create a source reading through `storage` for `context`.
    #[must_use]
    pub fn new(
        storage: Arc<dyn Storage>,
        context: EditContext,
        plugins: Arc<PluginLayers>,
    ) -> Self {
        Self {
            storage,
            context,
            plugins,
        }
    }

    /// Context this source reads for.
    #[must_use]
    pub const fn context(&self) -> &EditContext {
        &self.context
    }

    /// Storage collaborator used for reads and writes.
    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        &*self.storage
    }

    /// Read every layer of `collection`, lowest precedence first.
    ///
    /// Plugin layers come first, then core (skipped when the active mod is
    /// core), then the active mod. Unreadable or malformed layers are empty.
    pub async fn read_layers(&self, collection: &str) -> Vec<CollectionLayer<'static>> {
        let mut composer = LayerComposer::new();
        for layer in self.plugins.layers_for(collection) {
            composer.push_layer(layer.into_owned());
        }

        let mod_path = self.context.collection_path(collection);
        if self.context.is_core() {
            let records = self.read_layer(&mod_path).await;
            composer.push_core(records, Some(mod_path));
        } else {
            let core_path = self.context.core_collection_path(collection);
            let (core_records, mod_records) =
                futures::join!(self.read_layer(&core_path), self.read_layer(&mod_path));
            composer.push_core(core_records, Some(core_path));
            composer.push_mod(mod_records, Some(mod_path));
        }
        composer.layers()
    }

    /// Read and merge `collection`.
    pub async fn load_merged(&self, collection: &str) -> Vec<Value> {
        merge_layers(self.read_layers(collection).await)
    }

    /// Replace the active mod's layer of `collection` with `records`.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the storage collaborator.
    pub async fn write_mod_layer(&self, collection: &str, records: &[Value]) -> StrataResult<()> {
        let path = self.context.collection_path(collection);
        self.storage.write_collection(&path, records).await
    }

    async fn read_layer(&self, path: &Utf8Path) -> Vec<Value> {
        let outcome = match self.storage.read_collection(path).await {
            Ok(Some(document)) => records_from_document(path, document),
            Ok(None) => {
                tracing::debug!(path = %path, "layer source missing; treating as empty");
                return Vec::new();
            }
            Err(err) => Err(err),
        };
        outcome.unwrap_or_else(|err| {
            tracing::warn!(path = %path, error = %err, "layer source degraded to empty");
            Vec::new()
        })
    }
}
