//! Explicit read-through cache of merged collections.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

/// Point in the cache's history at which a load of one collection began.
///
/// Obtained from [`CollectionCache::stamp`] before reading and handed back to
/// [`CollectionCache::insert_if_current`] afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheStamp {
    generation: u64,
    writes: u64,
}

#[derive(Debug, Default)]
struct Entries {
    generation: u64,
    records: HashMap<String, Arc<[Value]>>,
    writes: HashMap<String, u64>,
}

impl Entries {
    fn stamp(&self, collection: &str) -> CacheStamp {
        CacheStamp {
            generation: self.generation,
            writes: self.writes.get(collection).copied().unwrap_or_default(),
        }
    }
}

/// Merged collections keyed by collection name.
///
/// Names are used exactly as given, the same way
/// [`crate::EditContext::collection_path`] uses them, so `"items"` and
/// `"items.json"` are separate entries because they are separate files.
///
/// Concurrent population is tolerated: the last write for a name wins and
/// in-flight loads are not deduplicated. Every [`CollectionCache::invalidate`]
/// starts a new generation and every [`CollectionCache::invalidate_collection`]
/// counts a write to that one collection. A load stamped before either is not
/// allowed to populate the cache, so neither a fast context switch nor a save
/// can leave older data behind.
#[derive(Debug, Default)]
pub struct CollectionCache {
    entries: RwLock<Entries>,
}

impl CollectionCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation; bumped by every full invalidation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.entries.read().generation
    }

    /// Stamp for a load of `collection` starting now.
    #[must_use]
    pub fn stamp(&self, collection: &str) -> CacheStamp {
        self.entries.read().stamp(collection)
    }

    /// Cached records for `collection`.
    #[must_use]
    pub fn get(&self, collection: &str) -> Option<Arc<[Value]>> {
        self.entries.read().records.get(collection).cloned()
    }

    /// Store `records` for `collection` if nothing invalidated it since
    /// `stamp` was taken. Returns whether the entry was stored.
    pub fn insert_if_current(
        &self,
        stamp: CacheStamp,
        collection: &str,
        records: Arc<[Value]>,
    ) -> bool {
        let mut entries = self.entries.write();
        if entries.stamp(collection) != stamp {
            return false;
        }
        entries.records.insert(collection.to_owned(), records);
        true
    }

    /// Drop every entry and start a new generation. Call on context switch.
    pub fn invalidate(&self) {
        let mut entries = self.entries.write();
        entries.generation += 1;
        entries.records.clear();
        entries.writes.clear();
    }

    /// Drop the entry for one collection, e.g. after writing it.
    ///
    /// Loads of that collection already in flight will not be cached.
    pub fn invalidate_collection(&self, collection: &str) {
        let mut entries = self.entries.write();
        entries.records.remove(collection);
        *entries.writes.entry(collection.to_owned()).or_default() += 1;
    }

    /// Number of cached collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().records.len()
    }

    /// Returns `true` when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().records.is_empty()
    }
}
