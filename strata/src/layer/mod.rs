//! Layered record merging.
//!
//! A collection is assembled from ordered layers, lowest precedence first:
//! plugin layers, then the core game, then the active mod. Records are
//! grouped by `id` and deep-merged so a mod only needs to spell out the
//! fields it changes.
//!
//! # Example
//!
//! ```rust
//! use strata::layer::LayerComposer;
//! use serde_json::json;
//!
//! let mut composer = LayerComposer::new();
//! composer.push_core(vec![json!({"id": "sword", "dmg": 5})], None);
//! composer.push_mod(vec![json!({"id": "sword", "name": "Iron Sword"})], None);
//!
//! let merged = composer.merge();
//! assert_eq!(merged, vec![json!({"id": "sword", "dmg": 5, "name": "Iron Sword"})]);
//! ```

mod composer;
mod merge;
mod provenance;

pub use composer::LayerComposer;
pub use merge::{merge_layers, merge_value, record_id};
pub use provenance::{CollectionLayer, LayerProvenance};
