//! Builders for game content trees.
//!
//! ```
//! use camino::Utf8Path;
//! use serde_json::json;
//! use strata_test_helpers::{ContentTree, record};
//!
//! let storage = ContentTree::new("/data", "dungeon")
//!     .core("items", [record("sword", json!({"dmg": 5}))])
//!     .layer("hardmode", "items", [record("sword", json!({"name": "Iron Sword"}))])
//!     .into_memory();
//! assert!(storage.get(Utf8Path::new("/data/dungeon/hardmode/items")).is_some());
//! ```

use std::fs;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value};
use strata::storage::MemoryStorage;
use strata::{CORE_MOD, EditContext};

/// A record with `id` and the fields of `fields` (ignored unless an object).
#[must_use]
pub fn record(id: &str, fields: Value) -> Value {
    let mut map = Map::new();
    map.insert("id".to_owned(), Value::String(id.to_owned()));
    if let Value::Object(extra) = fields {
        map.extend(extra);
    }
    Value::Object(map)
}

/// Collection documents for one game, grouped by mod.
#[derive(Clone, Debug)]
pub struct ContentTree {
    root: Utf8PathBuf,
    game: String,
    documents: Vec<(Utf8PathBuf, Value)>,
}

impl ContentTree {
    /// Empty tree for `game` under `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>, game: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            game: game.into(),
            documents: Vec::new(),
        }
    }

    /// Add `records` as the core mod's layer of `collection`.
    #[must_use]
    pub fn core(self, collection: &str, records: impl IntoIterator<Item = Value>) -> Self {
        self.layer(CORE_MOD, collection, records)
    }

    /// Add `records` as `mod_name`'s layer of `collection`.
    #[must_use]
    pub fn layer(
        self,
        mod_name: &str,
        collection: &str,
        records: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.raw(mod_name, collection, Value::Array(records.into_iter().collect()))
    }

    /// Store `document` verbatim, for malformed-layer tests.
    #[must_use]
    pub fn raw(mut self, mod_name: &str, collection: &str, document: Value) -> Self {
        let path = self.context(mod_name).collection_path(collection);
        self.documents.push((path, document));
        self
    }

    /// Context for editing `mod_name` in this tree.
    #[must_use]
    pub fn context(&self, mod_name: &str) -> EditContext {
        EditContext::new(self.root.clone(), self.game.clone(), mod_name)
    }

    /// Load every document into a fresh [`MemoryStorage`].
    #[must_use]
    pub fn into_memory(self) -> MemoryStorage {
        self.documents
            .into_iter()
            .fold(MemoryStorage::new(), |storage, (path, document)| {
                storage.with_document(path, document)
            })
    }

    /// Write every document below `dir`, which stands in for the tree root.
    ///
    /// # Errors
    ///
    /// Returns an error when a folder or file cannot be written.
    pub fn write_to(&self, dir: &Utf8Path) -> Result<()> {
        for (path, document) in &self.documents {
            let relative = path
                .strip_prefix(&self.root)
                .with_context(|| format!("{path} lies outside {}", self.root))?;
            let target = dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
            }
            let text = serde_json::to_string_pretty(document)?;
            fs::write(&target, text).with_context(|| format!("write {target}"))?;
        }
        Ok(())
    }
}
