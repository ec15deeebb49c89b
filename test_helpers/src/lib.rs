//! Test helpers shared across crates.
//!
//! [`content`] builds game content trees in memory or on disk; [`jail`]
//! wraps `figment::Jail` for settings tests.

pub mod content;
pub mod jail;

pub use content::{ContentTree, record};
pub use jail::{figment_error, with_jail};
