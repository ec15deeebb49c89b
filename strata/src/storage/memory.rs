//! In-memory storage for hosts that keep content outside the filesystem.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::RwLock;
use serde_json::Value;

use crate::{StrataError, StrataResult};

use super::Storage;

/// Storage backed by a map from path to JSON document.
///
/// Paths can be marked unreadable to exercise degraded loading.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RwLock<BTreeMap<Utf8PathBuf, Value>>,
    unreadable: RwLock<BTreeSet<Utf8PathBuf>>,
    reads: AtomicUsize,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `document` at `path`, replacing anything already there.
    pub fn insert(&self, path: impl Into<Utf8PathBuf>, document: Value) {
        self.documents.write().insert(path.into(), document);
    }

    /// Builder form of [`MemoryStorage::insert`].
    #[must_use]
    pub fn with_document(self, path: impl Into<Utf8PathBuf>, document: Value) -> Self {
        self.insert(path, document);
        self
    }

    /// Make reads of `path` fail as if the file were unreadable.
    pub fn mark_unreadable(&self, path: impl Into<Utf8PathBuf>) {
        self.unreadable.write().insert(path.into());
    }

    /// Document currently stored at `path`.
    #[must_use]
    pub fn get(&self, path: &Utf8Path) -> Option<Value> {
        self.documents.read().get(path).cloned()
    }

    /// Number of reads served so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read_collection(&self, path: &Utf8Path) -> StrataResult<Option<Value>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        if self.unreadable.read().contains(path) {
            return Err(StrataError::unavailable(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "marked unreadable"),
            ));
        }
        Ok(self.get(path))
    }

    async fn write_collection(&self, path: &Utf8Path, records: &[Value]) -> StrataResult<()> {
        self.insert(path, Value::Array(records.to_vec()));
        Ok(())
    }

    async fn list_subfolders(&self, path: &Utf8Path) -> StrataResult<Vec<String>> {
        let documents = self.documents.read();
        let folders: BTreeSet<String> = documents
            .keys()
            .filter_map(|key| key.strip_prefix(path).ok())
            .filter_map(|rest| {
                let mut components = rest.components();
                let first = components.next()?;
                // Only entries with something beneath them are folders.
                components.next().map(|_| first.as_str().to_owned())
            })
            .collect();
        Ok(folders.into_iter().collect())
    }
}
