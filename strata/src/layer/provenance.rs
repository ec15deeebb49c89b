//! Layer metadata and transport values for collection merges.

use std::borrow::Cow;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

/// Where a layer's records came from.
///
/// The declaration order is the precedence order: later variants override
/// earlier ones.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[non_exhaustive]
pub enum LayerProvenance {
    /// Records contributed by a built-in plugin.
    Plugin,
    /// Records shipped with the base game.
    Core,
    /// Records from the active user mod.
    Mod,
}

/// Representation of one layer of a collection.
#[derive(Clone, Debug)]
pub struct CollectionLayer<'a> {
    provenance: LayerProvenance,
    label: Option<String>,
    records: Cow<'a, [Value]>,
    path: Option<Utf8PathBuf>,
}

impl<'a> CollectionLayer<'a> {
    /// Construct a layer contributed by the plugin called `name`.
    #[must_use]
    pub fn plugin(name: impl Into<String>, records: Cow<'a, [Value]>) -> Self {
        Self {
            provenance: LayerProvenance::Plugin,
            label: Some(name.into()),
            records,
            path: None,
        }
    }

    /// Construct a layer read from the core game.
    #[must_use]
    pub const fn core(records: Cow<'a, [Value]>, path: Option<Utf8PathBuf>) -> Self {
        Self {
            provenance: LayerProvenance::Core,
            label: None,
            records,
            path,
        }
    }

    /// Construct a layer read from the active mod.
    #[must_use]
    pub const fn active_mod(records: Cow<'a, [Value]>, path: Option<Utf8PathBuf>) -> Self {
        Self {
            provenance: LayerProvenance::Mod,
            label: None,
            records,
            path,
        }
    }

    /// Returns the provenance of the layer.
    #[must_use]
    pub const fn provenance(&self) -> LayerProvenance {
        self.provenance
    }

    /// Plugin name for plugin layers.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the storage path this layer was read from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Borrow the layer's records.
    #[must_use]
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// Returns `true` when the layer contributes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns owned copies of the records, cloning borrowed data.
    #[must_use]
    pub fn into_records(self) -> Vec<Value> {
        self.records.into_owned()
    }

    /// Convert this layer into a `'static` owned variant.
    #[must_use]
    pub fn into_owned(self) -> CollectionLayer<'static> {
        CollectionLayer {
            provenance: self.provenance,
            label: self.label,
            records: Cow::Owned(self.records.into_owned()),
            path: self.path,
        }
    }
}
