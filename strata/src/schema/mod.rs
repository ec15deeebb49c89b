//! Declarative schemas and their runtime resolution.
//!
//! A [`Schema`] is an ordered map of field names to [`FieldDefinition`]s.
//! Some fields are only partially described statically: they point at another
//! collection through `sourceCollection` and only take their final shape once
//! that collection has been loaded. [`SchemaResolver`] performs that step.

mod field;
mod generator;
mod kind;
mod predicate;
mod registry;
mod resolver;

pub use field::{FieldDefinition, FieldKind, Schema};
pub use generator::Generator;
pub use kind::{DeclaredKind, SourceKind};
pub use predicate::{matches_all, matches_any, record_passes};
pub use registry::SchemaRegistry;
pub use resolver::{MAX_RESOLUTION_DEPTH, SchemaResolver};
