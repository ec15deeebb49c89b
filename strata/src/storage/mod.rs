//! Storage collaborator contract and its bundled implementations.
//!
//! The engine only ever talks to storage through [`Storage`]: read a
//! collection file, write one back, and list subfolders. Paths follow the
//! `<root>/<game>/<mod>/<collectionName>` convention produced by
//! [`crate::EditContext`]; implementations must not re-derive them.

mod fs;
mod memory;

use async_trait::async_trait;
use camino::Utf8Path;
use serde_json::Value;

use crate::StrataResult;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

/// Narrow persistence contract used by the loaders.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the JSON document stored at `path`.
    ///
    /// Returns `Ok(None)` when nothing is stored there.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::SourceUnavailable`] when the file exists
    /// but cannot be read, or [`crate::StrataError::MalformedSource`] when it
    /// does not parse.
    async fn read_collection(&self, path: &Utf8Path) -> StrataResult<Option<Value>>;

    /// Replace the document stored at `path` with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be encoded or written.
    async fn write_collection(&self, path: &Utf8Path, records: &[Value]) -> StrataResult<()>;

    /// List the names of the folders directly below `path`, sorted.
    ///
    /// A missing folder lists as empty.
    ///
    /// # Errors
    ///
    /// Returns an error when the folder exists but cannot be enumerated.
    async fn list_subfolders(&self, path: &Utf8Path) -> StrataResult<Vec<String>>;
}

/// List the games available under `root`.
///
/// # Errors
///
/// Propagates listing failures from `storage`.
pub async fn list_games(storage: &dyn Storage, root: &Utf8Path) -> StrataResult<Vec<String>> {
    storage.list_subfolders(root).await
}

/// List the mods (including the core mod) installed for `game`.
///
/// # Errors
///
/// Propagates listing failures from `storage`.
pub async fn list_mods(
    storage: &dyn Storage,
    root: &Utf8Path,
    game: &str,
) -> StrataResult<Vec<String>> {
    storage.list_subfolders(&root.join(game)).await
}
