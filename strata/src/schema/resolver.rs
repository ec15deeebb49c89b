//! Runtime resolution of reference fields.

use futures::future::{BoxFuture, FutureExt, join_all};
use serde_json::Value;

use crate::layer::record_id;
use crate::source::CollectionLoader;

use super::{FieldDefinition, Schema, SourceKind, record_passes};

/// Deepest chain of nested reference fields followed before giving up.
pub const MAX_RESOLUTION_DEPTH: usize = 16;

/// Rewrites reference fields into ready-to-render definitions.
///
/// Choice fields with a `sourceCollection` receive the ids of that
/// collection's merged records as `options`; nested fields receive one
/// generated child per record as `objects`. Generated children are resolved
/// in turn, so chains of references are complete when [`Self::resolve`]
/// returns. A collection that cannot be loaded simply contributes nothing.
#[derive(Clone, Copy, Debug)]
pub struct SchemaResolver<'a> {
    loader: CollectionLoader<'a>,
}

impl<'a> SchemaResolver<'a> {
    /// Resolve through `loader`.
    #[must_use]
    pub const fn new(loader: CollectionLoader<'a>) -> Self {
        Self { loader }
    }

    /// Loader used to fetch referenced collections.
    #[must_use]
    pub const fn loader(&self) -> CollectionLoader<'a> {
        self.loader
    }

    /// Resolve every field of `schema`.
    ///
    /// `owner` is the record being edited; generators read from it.
    pub async fn resolve(&self, schema: &Schema, owner: Option<&Value>) -> Schema {
        self.resolve_schema(schema, owner, &[]).await
    }

    /// Resolve a single field.
    pub async fn resolve_field(
        &self,
        field: &FieldDefinition,
        owner: Option<&Value>,
    ) -> FieldDefinition {
        self.resolve_field_in(field, owner, &[]).await
    }

    /// Ids of `field`'s source records that pass its predicates.
    pub async fn source_options(&self, field: &FieldDefinition) -> Vec<Value> {
        let Some(collection) = field.source_collection.as_deref() else {
            return Vec::new();
        };
        self.loader
            .load(collection)
            .await
            .iter()
            .filter(|record| record_passes(field, record))
            .filter_map(record_id)
            .map(Value::String)
            .collect()
    }

    /// Children generated from `field`'s source records, unresolved.
    pub async fn source_objects(&self, field: &FieldDefinition) -> Schema {
        let Some(collection) = field.source_collection.as_deref() else {
            return Schema::new();
        };
        let kind = field.source_kind.unwrap_or(SourceKind::Custom);
        self.loader
            .load(collection)
            .await
            .iter()
            .filter(|record| record_passes(field, record))
            .filter_map(|record| {
                let id = record_id(record)?;
                let child = kind.convert(&id, record);
                Some((id, child))
            })
            .collect()
    }

    fn resolve_schema<'s>(
        &'s self,
        schema: &'s Schema,
        owner: Option<&'s Value>,
        chain: &'s [String],
    ) -> BoxFuture<'s, Schema> {
        async move {
            let mut pending = Vec::with_capacity(schema.len());
            for (name, field) in schema {
                pending.push(self.resolve_entry(name, field, owner, chain));
            }
            join_all(pending).await.into_iter().collect()
        }
        .boxed()
    }

    async fn resolve_entry(
        &self,
        name: &str,
        field: &FieldDefinition,
        owner: Option<&Value>,
        chain: &[String],
    ) -> (String, FieldDefinition) {
        (
            name.to_owned(),
            self.resolve_field_in(field, owner, chain).await,
        )
    }

    async fn resolve_field_in(
        &self,
        field: &FieldDefinition,
        owner: Option<&Value>,
        chain: &[String],
    ) -> FieldDefinition {
        let mut resolved = field.clone();
        if let Some(generator) = &field.generator {
            resolved.options = Some(generator.generate(owner));
        }

        let mut next_chain = chain.to_vec();
        if let Some(collection) = field.source_collection.as_deref() {
            if !field.kind.is_nested() {
                // Options are ids only; nothing below them is resolved.
                resolved.options = Some(self.source_options(field).await);
            } else if chain.iter().any(|seen| seen == collection)
                || chain.len() >= MAX_RESOLUTION_DEPTH
            {
                tracing::warn!(
                    collection,
                    chain = ?chain,
                    "reference chain revisits a collection or runs too deep; leaving it empty"
                );
                resolved.objects.get_or_insert_with(Schema::new);
                return resolved;
            } else {
                let mut objects = resolved.objects.take().unwrap_or_default();
                objects.extend(self.source_objects(field).await);
                resolved.objects = Some(objects);
                next_chain.push(collection.to_owned());
            }
        }

        if let Some(objects) = resolved.objects.take() {
            resolved.objects = Some(self.resolve_schema(&objects, owner, &next_chain).await);
        }
        resolved
    }
}
