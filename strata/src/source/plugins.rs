//! Records contributed by built-in plugins.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::context::normalize_collection_name;
use crate::layer::CollectionLayer;

/// Plugin records keyed by collection name.
///
/// Plugins live in their own namespace rather than in the game/mod tree, so
/// the host registers their records here and the loader adds them as the
/// lowest-precedence layers. Plugins registered earlier sit below later ones.
#[derive(Clone, Debug, Default)]
pub struct PluginLayers {
    collections: HashMap<String, Vec<(String, Arc<[Value]>)>>,
}

impl PluginLayers {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `records` from `plugin` for `collection`.
    pub fn register(
        &mut self,
        plugin: impl Into<String>,
        collection: &str,
        records: impl Into<Arc<[Value]>>,
    ) {
        self.collections
            .entry(normalize_collection_name(collection).to_owned())
            .or_default()
            .push((plugin.into(), records.into()));
    }

    /// Builder form of [`PluginLayers::register`].
    #[must_use]
    pub fn with(
        mut self,
        plugin: impl Into<String>,
        collection: &str,
        records: impl Into<Arc<[Value]>>,
    ) -> Self {
        self.register(plugin, collection, records);
        self
    }

    /// Layers contributed to `collection`, in registration order.
    pub fn layers_for(&self, collection: &str) -> impl Iterator<Item = CollectionLayer<'_>> {
        self.collections
            .get(normalize_collection_name(collection))
            .into_iter()
            .flatten()
            .map(|(plugin, records)| {
                CollectionLayer::plugin(plugin.as_str(), Cow::Borrowed(&**records))
            })
    }

    /// Returns `true` when no plugin contributes anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
