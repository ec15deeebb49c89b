//! Error types produced while loading and resolving layered content.

mod constructors;
mod conversions;
mod types;

pub use types::StrataError;
