//! Filter schemas derived from a pool record.
//!
//! Some editors let a record declare which fields of another schema it can
//! filter on. The record points at a pool entry; the pool entry names the
//! target schema and lists dotted field paths. [`FilterSchemaGenerator`]
//! turns that list into one filter control per path and keeps the record's
//! stored filter values in step when the pool reference changes.

mod cleanup;
mod config;
mod field;
mod generator;
mod walk;

pub use cleanup::remove_stale_keys;
pub use config::FilterSchemaConfig;
pub use field::{FilterField, FilterKind, FilterSchema, MatchMode};
pub use generator::{FilterRefresh, FilterSchemaGenerator};
pub use walk::{filter_field, walk_path};
