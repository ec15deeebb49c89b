//! Dotted-path walks through schemas that cross collection boundaries.

use std::borrow::Cow;

use crate::StrataError;
use crate::path::segments;
use crate::schema::{FieldDefinition, FieldKind, Schema, SchemaResolver};

use super::{FilterField, FilterKind, MatchMode};

/// Follow `path` through `schema` to the field it names.
///
/// A segment following a field with a `sourceCollection` selects a record
/// of that collection; the record's converted field is the next step, so a
/// path can continue into the record's own nested shape. Other nested fields
/// step into their static `objects`.
///
/// # Errors
///
/// Returns [`StrataError::UnresolvedReference`] when a segment names nothing.
pub async fn walk_path<'s>(
    resolver: &SchemaResolver<'_>,
    schema: &'s Schema,
    path: &str,
) -> Result<Cow<'s, FieldDefinition>, StrataError> {
    let mut parts = segments(path);
    let Some(first) = parts.next() else {
        return Err(StrataError::unresolved(path, "the path is empty"));
    };
    let mut current = schema
        .get(first)
        .map(Cow::Borrowed)
        .ok_or_else(|| StrataError::unresolved(path, format!("no field named '{first}'")))?;

    for segment in parts {
        let next = step(resolver, &current, segment).await;
        current = Cow::Owned(next.ok_or_else(|| {
            StrataError::unresolved(
                path,
                format!("'{segment}' is not part of a {} field", current.kind),
            )
        })?);
    }
    Ok(current)
}

async fn step(
    resolver: &SchemaResolver<'_>,
    field: &FieldDefinition,
    segment: &str,
) -> Option<FieldDefinition> {
    if field.source_collection.is_some()
        && let Some(child) = resolver.source_objects(field).await.swap_remove(segment)
    {
        return Some(child);
    }
    field.objects.as_ref()?.get(segment).cloned()
}

/// Filter control for the field at the end of `path`.
///
/// # Errors
///
/// Returns [`StrataError::UnresolvedReference`] when the path cannot be
/// followed or ends on a kind that has no filter control.
pub async fn filter_field(
    resolver: &SchemaResolver<'_>,
    schema: &Schema,
    path: &str,
) -> Result<FilterField, StrataError> {
    let field = walk_path(resolver, schema, path).await?;
    let fallback = segments(path).last().unwrap_or(path);
    let label = field.label_or(fallback).to_owned();

    let kind = match field.kind {
        FieldKind::Number | FieldKind::Integer => FilterKind::Range {
            min: field.min,
            max: field.max,
        },
        FieldKind::Select | FieldKind::MultiSelect => {
            let options = if field.source_collection.is_some() {
                resolver.source_options(&field).await
            } else {
                field.options.clone().unwrap_or_default()
            };
            FilterKind::MultiChoice { options }
        }
        FieldKind::StringList => FilterKind::StringList {
            mode: MatchMode::default(),
        },
        FieldKind::Boolean => FilterKind::Boolean,
        FieldKind::String | FieldKind::Text | FieldKind::Color => FilterKind::Text,
        FieldKind::File | FieldKind::Object | FieldKind::ObjectList => {
            return Err(StrataError::unresolved(
                path,
                format!("{} fields cannot be filtered on", field.kind),
            ));
        }
    };
    Ok(FilterField::new(label, kind))
}
