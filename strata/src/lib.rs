//! Layered content resolution for moddable game data.
//!
//! Game content is stored as collections of JSON records, one file per
//! collection per mod. This crate assembles the effective view of a
//! collection from its layers (plugins, the core game, the active mod),
//! reflects schemas whose shape depends on other collections, materialises
//! schema defaults into base records, and derives filter controls from pool
//! records.
//!
//! [`session::AuthoringSession`] wires the pieces together for an editor:
//!
//! ```
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use strata::EditContext;
//! use strata::session::AuthoringSession;
//! use strata::storage::MemoryStorage;
//!
//! # futures::executor::block_on(async {
//! let storage = MemoryStorage::new()
//!     .with_document("/data/dungeon/core/items", json!([{"id": "sword", "dmg": 5}]))
//!     .with_document("/data/dungeon/hardmode/items", json!([{"id": "sword", "dmg": 9}]));
//! let session = AuthoringSession::new(
//!     Arc::new(storage),
//!     EditContext::new("/data", "dungeon", "hardmode"),
//! );
//! let items = session.merged("items").await;
//! assert_eq!(items[0], json!({"id": "sword", "dmg": 9}));
//! # });
//! ```

use std::sync::Arc;

mod context;
mod error;
mod result_ext;

pub mod defaults;
pub mod filter;
pub mod layer;
pub mod path;
pub mod schema;
pub mod session;
pub mod settings;
pub mod source;
pub mod storage;
pub mod supersede;

pub use context::{CORE_MOD, EditContext, normalize_collection_name};
pub use error::StrataError;
pub use result_ext::{StrataIoExt, StrataResultExt};

/// Result type shared across the crate.
///
/// Errors are reference-counted so a failure can be logged, cached and
/// returned to several callers without cloning the error itself.
pub type StrataResult<T> = Result<T, Arc<StrataError>>;
