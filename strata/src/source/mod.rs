//! Reading a collection's layers from storage and caching the merged result.
//!
//! [`CollectionSource`] knows the active context and where each layer lives;
//! [`CollectionCache`] is the explicit read-through cache owned by whoever
//! drives resolution; [`CollectionLoader`] pairs the two for the resolvers.

mod cache;
mod loader;
mod plugins;
mod reader;

pub use cache::{CacheStamp, CollectionCache};
pub use loader::CollectionLoader;
pub use plugins::PluginLayers;
pub use reader::{CollectionSource, records_from_document};

#[cfg(test)]
mod tests;
