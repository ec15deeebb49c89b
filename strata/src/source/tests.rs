//! Unit tests for layer reading and collection caching.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::{CollectionCache, CollectionLoader, CollectionSource, PluginLayers};
use crate::EditContext;
use crate::layer::LayerProvenance;
use crate::storage::MemoryStorage;

const ROOT: &str = "/content";

fn context(mod_name: &str) -> EditContext {
    EditContext::new(ROOT, "dungeon", mod_name)
}

#[fixture]
fn storage() -> Arc<MemoryStorage> {
    let storage = MemoryStorage::new()
        .with_document(
            "/content/dungeon/core/items",
            json!([{"id": "sword", "dmg": 5}, {"id": "shield", "def": 2}]),
        )
        .with_document(
            "/content/dungeon/hardmode/items",
            json!([{"id": "sword", "name": "Iron Sword"}]),
        );
    Arc::new(storage)
}

fn source(storage: &Arc<MemoryStorage>, mod_name: &str, plugins: PluginLayers) -> CollectionSource {
    CollectionSource::new(storage.clone(), context(mod_name), Arc::new(plugins))
}

#[rstest]
#[tokio::test]
async fn mod_context_reads_plugin_core_and_mod(storage: Arc<MemoryStorage>) {
    let plugins = PluginLayers::new().with("loot", "items", vec![json!({"id": "gem"})]);
    let src = source(&storage, "hardmode", plugins);

    let layers = src.read_layers("items").await;
    let provenances: Vec<LayerProvenance> = layers.iter().map(|l| l.provenance()).collect();
    assert_eq!(
        provenances,
        vec![
            LayerProvenance::Plugin,
            LayerProvenance::Core,
            LayerProvenance::Mod
        ]
    );

    let merged = src.load_merged("items").await;
    assert_eq!(
        merged,
        vec![
            json!({"id": "gem"}),
            json!({"id": "sword", "dmg": 5, "name": "Iron Sword"}),
            json!({"id": "shield", "def": 2}),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn core_context_reads_a_single_content_layer(storage: Arc<MemoryStorage>) {
    let src = source(&storage, "core", PluginLayers::new());
    let layers = src.read_layers("items").await;
    assert_eq!(layers.len(), 1);
    assert_eq!(layers.first().map(|l| l.provenance()), Some(LayerProvenance::Core));
}

#[rstest]
#[tokio::test]
async fn unreadable_core_layer_degrades_to_empty(storage: Arc<MemoryStorage>) {
    storage.mark_unreadable("/content/dungeon/core/items");
    let src = source(&storage, "hardmode", PluginLayers::new());
    assert_eq!(
        src.load_merged("items").await,
        vec![json!({"id": "sword", "name": "Iron Sword"})]
    );
}

#[rstest]
#[tokio::test]
async fn malformed_mod_layer_degrades_to_empty(storage: Arc<MemoryStorage>) {
    storage.insert("/content/dungeon/hardmode/items", json!({"not": "an array"}));
    let src = source(&storage, "hardmode", PluginLayers::new());
    let ids: Vec<Value> = src
        .load_merged("items")
        .await
        .into_iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!("sword"), json!("shield")]);
}

#[rstest]
#[tokio::test]
async fn missing_collection_is_empty(storage: Arc<MemoryStorage>) {
    let src = source(&storage, "hardmode", PluginLayers::new());
    assert!(src.load_merged("rooms").await.is_empty());
}

#[rstest]
#[tokio::test]
async fn loader_serves_repeat_loads_from_cache(storage: Arc<MemoryStorage>) {
    let src = source(&storage, "hardmode", PluginLayers::new());
    let cache = CollectionCache::new();
    let loader = CollectionLoader::new(&src, &cache);

    let first = loader.load("items").await;
    let reads_after_first = storage.reads();
    let second = loader.load("items").await;

    assert_eq!(first, second);
    assert_eq!(storage.reads(), reads_after_first);
    assert_eq!(cache.len(), 1);
}

#[rstest]
#[tokio::test]
async fn loader_finds_records_by_id(storage: Arc<MemoryStorage>) {
    let src = source(&storage, "hardmode", PluginLayers::new());
    let cache = CollectionCache::new();
    let loader = CollectionLoader::new(&src, &cache);

    assert_eq!(
        loader.find("items", "shield").await,
        Some(json!({"id": "shield", "def": 2}))
    );
    assert_eq!(loader.find("items", "axe").await, None);
}

#[rstest]
fn stale_generation_cannot_populate_cache() {
    let cache = CollectionCache::new();
    let stamp = cache.stamp("items");
    cache.invalidate();
    assert_eq!(cache.generation(), 1);

    let stored = cache.insert_if_current(stamp, "items", Arc::from(vec![json!({"id": "x"})]));
    assert!(!stored);
    assert!(cache.is_empty());

    let current = cache.stamp("items");
    assert!(cache.insert_if_current(current, "items", Arc::from(Vec::<Value>::new())));
    assert_eq!(cache.len(), 1);
}

#[rstest]
fn load_started_before_a_save_cannot_repopulate_that_collection() {
    let cache = CollectionCache::new();
    let items = cache.stamp("items");
    let rooms = cache.stamp("rooms");
    cache.invalidate_collection("items");

    assert!(!cache.insert_if_current(items, "items", Arc::from(vec![json!({"id": "old"})])));
    assert!(cache.insert_if_current(rooms, "rooms", Arc::from(Vec::<Value>::new())));
    assert_eq!(cache.get("items"), None);

    let fresh = cache.stamp("items");
    assert!(cache.insert_if_current(fresh, "items", Arc::from(vec![json!({"id": "new"})])));
}

#[rstest]
fn cache_keys_are_exact_collection_names() {
    let cache = CollectionCache::new();
    let plain = cache.stamp("items");
    assert!(cache.insert_if_current(plain, "items", Arc::from(vec![json!({"id": "a"})])));
    assert_eq!(cache.get("items.json"), None);

    cache.invalidate_collection("items.json");
    assert!(cache.get("items").is_some());
}

#[rstest]
#[tokio::test]
async fn writing_a_mod_layer_then_invalidating_refreshes(storage: Arc<MemoryStorage>) {
    let src = source(&storage, "hardmode", PluginLayers::new());
    let cache = CollectionCache::new();
    let loader = CollectionLoader::new(&src, &cache);
    let _warm = loader.load("items").await;

    src.write_mod_layer("items", &[json!({"id": "sword", "dmg": 9})])
        .await
        .expect("write mod layer");
    cache.invalidate_collection("items");

    assert_eq!(
        loader.find("items", "sword").await,
        Some(json!({"id": "sword", "dmg": 9}))
    );
}
