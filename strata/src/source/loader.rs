//! Cached collection loading shared by the resolvers.

use std::sync::Arc;

use serde_json::Value;

use crate::layer::record_id;

use super::{CollectionCache, CollectionSource};

/// Loads merged collections through a [`CollectionCache`].
#[derive(Clone, Copy, Debug)]
pub struct CollectionLoader<'a> {
    source: &'a CollectionSource,
    cache: &'a CollectionCache,
}

impl<'a> CollectionLoader<'a> {
    /// Pair `source` with `cache`.
    #[must_use]
    pub const fn new(source: &'a CollectionSource, cache: &'a CollectionCache) -> Self {
        Self { source, cache }
    }

    /// Source the loader reads through.
    #[must_use]
    pub const fn source(&self) -> &'a CollectionSource {
        self.source
    }

    /// Merged records of `collection`, from cache when available.
    ///
    /// Never fails: unreadable layers contribute nothing, so the worst case
    /// is an empty collection.
    pub async fn load(&self, collection: &str) -> Arc<[Value]> {
        if let Some(hit) = self.cache.get(collection) {
            tracing::trace!(collection, "collection cache hit");
            return hit;
        }
        let stamp = self.cache.stamp(collection);
        let records: Arc<[Value]> = self.source.load_merged(collection).await.into();
        if !self
            .cache
            .insert_if_current(stamp, collection, Arc::clone(&records))
        {
            tracing::debug!(collection, "collection invalidated during load; result not cached");
        }
        records
    }

    /// The merged record with `id` in `collection`.
    pub async fn find(&self, collection: &str, id: &str) -> Option<Value> {
        self.load(collection)
            .await
            .iter()
            .find(|record| record_id(record).as_deref() == Some(id))
            .cloned()
    }
}
