//! One editing session: storage, context, caches and resolvers wired together.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::defaults::{AuthoringMode, DefaultValueInjector};
use crate::filter::{FilterRefresh, FilterSchemaGenerator};
use crate::schema::{Schema, SchemaRegistry, SchemaResolver};
use crate::settings::EngineSettings;
use crate::source::{CollectionCache, CollectionLoader, CollectionSource, PluginLayers};
use crate::storage::{FsStorage, Storage, list_games, list_mods};
use crate::supersede::LatestOnly;
use crate::{EditContext, StrataResult};

/// Outcome of [`AuthoringSession::resolve_schema`].
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// The resolved schema, now the session's current one.
    Adopted(Arc<Schema>),
    /// A later resolution was requested before this one finished.
    Superseded,
    /// No schema is registered under the requested name.
    UnknownSchema,
}

impl Resolution {
    /// The schema, if it was adopted.
    #[must_use]
    pub fn adopted(self) -> Option<Arc<Schema>> {
        match self {
            Self::Adopted(schema) => Some(schema),
            Self::Superseded | Self::UnknownSchema => None,
        }
    }
}

/// Editing session over one storage root.
///
/// Merged collections are cached for the lifetime of the current context and
/// dropped when [`Self::switch_context`] selects another game or mod. Loads
/// that were already running when the context changed finish against the old
/// context but never reach the cache.
pub struct AuthoringSession {
    storage: Arc<dyn Storage>,
    plugins: Arc<PluginLayers>,
    registry: SchemaRegistry,
    source: RwLock<Arc<CollectionSource>>,
    cache: CollectionCache,
    caching: bool,
    latest: LatestOnly<Arc<Schema>>,
}

impl std::fmt::Debug for AuthoringSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthoringSession")
            .field("context", &self.context())
            .field("registry", &self.registry)
            .field("cached_collections", &self.cache.len())
            .field("caching", &self.caching)
            .finish_non_exhaustive()
    }
}

impl AuthoringSession {
    /// Session reading through `storage`, opened on `context`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, context: EditContext) -> Self {
        let plugins = Arc::new(PluginLayers::new());
        let source = CollectionSource::new(Arc::clone(&storage), context, Arc::clone(&plugins));
        Self {
            storage,
            plugins,
            registry: SchemaRegistry::new(),
            source: RwLock::new(Arc::new(source)),
            cache: CollectionCache::new(),
            caching: true,
            latest: LatestOnly::new(),
        }
    }

    /// Session over the filesystem root and context named by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::Io`] when the root cannot be opened.
    pub fn from_settings(settings: &EngineSettings) -> StrataResult<Self> {
        let storage = FsStorage::open(settings.root.clone())?;
        tracing::debug!(root = %settings.root, game = %settings.game, "opened authoring session");
        Ok(Self::new(Arc::new(storage), settings.context()).with_caching(settings.cache))
    }

    /// Supply the synthetic plugin layers placed below core content.
    #[must_use]
    pub fn with_plugins(mut self, plugins: PluginLayers) -> Self {
        self.plugins = Arc::new(plugins);
        let context = self.context();
        self.replace_source(context);
        self
    }

    /// Supply the static schemas.
    #[must_use]
    pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Keep merged collections between operations (the default), or reload
    /// them for every operation.
    #[must_use]
    pub const fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }

    /// Static schemas known to the session.
    #[must_use]
    pub const fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Mutable access to the static schemas.
    pub const fn registry_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.registry
    }

    /// Context currently being edited.
    #[must_use]
    pub fn context(&self) -> EditContext {
        self.source.read().context().clone()
    }

    /// Snapshot of the layer source for the current context.
    #[must_use]
    pub fn source(&self) -> Arc<CollectionSource> {
        Arc::clone(&self.source.read())
    }

    /// Edit `context` from now on.
    ///
    /// Cached collections and the adopted schema belong to the old context
    /// and are dropped; resolutions still running are superseded.
    pub fn switch_context(&self, context: EditContext) {
        tracing::debug!(game = %context.game(), mod_name = %context.mod_name(), "switching context");
        self.replace_source(context);
        self.cache.invalidate();
        self.latest.issue();
        self.latest.clear();
    }

    fn replace_source(&self, context: EditContext) {
        let source = CollectionSource::new(
            Arc::clone(&self.storage),
            context,
            Arc::clone(&self.plugins),
        );
        *self.source.write() = Arc::new(source);
    }

    /// Merged records of `collection` in the current context.
    ///
    /// The name is used verbatim for the storage path and the cache key.
    pub async fn merged(&self, collection: &str) -> Arc<[Value]> {
        let source = self.source();
        if self.caching {
            CollectionLoader::new(&source, &self.cache).load(collection).await
        } else {
            source.load_merged(collection).await.into()
        }
    }

    /// Resolve the schema registered as `name` for `owner`.
    ///
    /// Only the most recently requested resolution is adopted; an earlier
    /// one that finishes late reports [`Resolution::Superseded`].
    pub async fn resolve_schema(&self, name: &str, owner: Option<&Value>) -> Resolution {
        let ticket = self.latest.issue();
        let Some(schema) = self.registry.get(name) else {
            return Resolution::UnknownSchema;
        };
        let source = self.source();
        let scratch = CollectionCache::new();
        let loader = CollectionLoader::new(&source, self.cache_for_operation(&scratch));
        let resolved = Arc::new(SchemaResolver::new(loader).resolve(&schema, owner).await);
        if self.latest.commit(ticket, Arc::clone(&resolved)) {
            Resolution::Adopted(resolved)
        } else {
            Resolution::Superseded
        }
    }

    /// Most recently adopted resolved schema.
    #[must_use]
    pub fn current_schema(&self) -> Option<Arc<Schema>> {
        self.latest.current()
    }

    /// Default injector for a record in the current context.
    #[must_use]
    pub fn injector(&self, is_new: bool) -> DefaultValueInjector {
        DefaultValueInjector::new(AuthoringMode::for_context(&self.context(), is_new))
    }

    /// Rebuild `generator`'s filter schema for `record`.
    pub async fn refresh_filters(
        &self,
        generator: &mut FilterSchemaGenerator,
        record: &mut Value,
    ) -> FilterRefresh {
        let source = self.source();
        let scratch = CollectionCache::new();
        let loader = CollectionLoader::new(&source, self.cache_for_operation(&scratch));
        generator.refresh(loader, &self.registry, record).await
    }

    /// Write the active mod's layer of `collection` and drop its cached merge.
    ///
    /// `collection` names the file exactly, as for [`Self::merged`]; loads of
    /// it still in flight are not cached afterwards.
    ///
    /// # Errors
    ///
    /// Propagates write failures from storage.
    pub async fn save(&self, collection: &str, records: &[Value]) -> StrataResult<()> {
        self.source().write_mod_layer(collection, records).await?;
        self.cache.invalidate_collection(collection);
        Ok(())
    }

    /// Games available under the current root.
    ///
    /// # Errors
    ///
    /// Propagates listing failures from storage.
    pub async fn games(&self) -> StrataResult<Vec<String>> {
        let context = self.context();
        list_games(&*self.storage, context.root()).await
    }

    /// Mods installed for the current game.
    ///
    /// # Errors
    ///
    /// Propagates listing failures from storage.
    pub async fn mods(&self) -> StrataResult<Vec<String>> {
        let context = self.context();
        list_mods(&*self.storage, context.root(), context.game()).await
    }

    const fn cache_for_operation<'a>(&'a self, scratch: &'a CollectionCache) -> &'a CollectionCache {
        if self.caching { &self.cache } else { scratch }
    }
}
