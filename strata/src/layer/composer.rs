//! Layer composition helpers.

use std::borrow::Cow;

use camino::Utf8PathBuf;
use serde_json::Value;

use super::{CollectionLayer, merge_layers};

/// Builder that accumulates [`CollectionLayer`] instances.
///
/// Layers may be pushed in any order; [`LayerComposer::layers`] always
/// returns them as plugin, core, mod, keeping push order within each rank.
/// Every caller therefore sees the same precedence.
#[derive(Debug, Default)]
pub struct LayerComposer {
    layers: Vec<CollectionLayer<'static>>,
}

impl LayerComposer {
    /// Create an empty composer.
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Create a composer with preallocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            layers: Vec::with_capacity(capacity),
        }
    }

    /// Push a plugin layer.
    pub fn push_plugin(&mut self, name: impl Into<String>, records: Vec<Value>) {
        self.push_layer(CollectionLayer::plugin(name, Cow::Owned(records)));
    }

    /// Push the core game's layer.
    pub fn push_core(&mut self, records: Vec<Value>, path: Option<Utf8PathBuf>) {
        self.push_layer(CollectionLayer::core(Cow::Owned(records), path));
    }

    /// Push the active mod's layer.
    pub fn push_mod(&mut self, records: Vec<Value>, path: Option<Utf8PathBuf>) {
        self.push_layer(CollectionLayer::active_mod(Cow::Owned(records), path));
    }

    /// Push an arbitrary layer.
    pub fn push_layer(&mut self, layer: CollectionLayer<'static>) {
        self.layers.push(layer);
    }

    /// Consume the composer and return the accumulated layers in precedence
    /// order.
    #[must_use]
    pub fn layers(mut self) -> Vec<CollectionLayer<'static>> {
        self.layers.sort_by_key(CollectionLayer::provenance);
        self.layers
    }

    /// Consume the composer and merge its layers.
    #[must_use]
    pub fn merge(self) -> Vec<Value> {
        merge_layers(self.layers())
    }
}

impl IntoIterator for LayerComposer {
    type Item = CollectionLayer<'static>;
    type IntoIter = std::vec::IntoIter<CollectionLayer<'static>>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers().into_iter()
    }
}
