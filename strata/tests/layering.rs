//! Layer precedence and caching through an authoring session.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::{Value, json};
use strata::session::AuthoringSession;
use strata::source::PluginLayers;
use strata::storage::MemoryStorage;
use test_helpers::{ContentTree, record};

#[fixture]
fn tree() -> ContentTree {
    ContentTree::new("/data", "dungeon")
        .core("items", [record("sword", json!({"dmg": 5}))])
        .layer("hardmode", "items", [record("sword", json!({"name": "Iron Sword"}))])
        .core(
            "rooms",
            [
                record("hall", json!({"order": 2, "exits": ["north"]})),
                record("cellar", json!({"order": 1})),
            ],
        )
        .layer(
            "hardmode",
            "rooms",
            [record("hall", json!({"exits": ["east"]})), record("vault", json!({}))],
        )
}

fn session(tree: &ContentTree, storage: &Arc<MemoryStorage>, mod_name: &str) -> AuthoringSession {
    AuthoringSession::new(storage.clone(), tree.context(mod_name))
}

#[rstest]
#[tokio::test]
async fn mod_fields_overlay_core_fields(tree: ContentTree) {
    let storage = Arc::new(tree.clone().into_memory());
    let session = session(&tree, &storage, "hardmode").with_plugins(
        PluginLayers::new().with("base-pack", "items", Vec::<Value>::new()),
    );
    let items = session.merged("items").await;
    assert_eq!(
        items.to_vec(),
        vec![json!({"id": "sword", "dmg": 5, "name": "Iron Sword"})]
    );
}

#[rstest]
#[tokio::test]
async fn order_sorts_and_arrays_concatenate(tree: ContentTree) {
    let storage = Arc::new(tree.clone().into_memory());
    let rooms = session(&tree, &storage, "hardmode").merged("rooms").await;
    assert_eq!(
        rooms.to_vec(),
        vec![
            json!({"id": "vault"}),
            json!({"id": "cellar", "order": 1}),
            json!({"id": "hall", "order": 2, "exits": ["north", "east"]}),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn plugin_records_sit_below_core(tree: ContentTree) {
    let storage = Arc::new(tree.clone().into_memory());
    let plugins = PluginLayers::new().with(
        "loot",
        "items.json",
        vec![
            json!({"id": "sword", "dmg": 1, "rarity": "common"}),
            json!({"id": "gem"}),
        ],
    );
    let items = session(&tree, &storage, "core")
        .with_plugins(plugins)
        .merged("items")
        .await;
    assert_eq!(
        items.to_vec(),
        vec![
            json!({"id": "sword", "dmg": 5, "rarity": "common"}),
            json!({"id": "gem"}),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn switching_context_drops_cached_collections(tree: ContentTree) {
    let storage = Arc::new(tree.clone().into_memory());
    let session = session(&tree, &storage, "hardmode");

    let modded = session.merged("items").await;
    let reads = storage.reads();
    let again = session.merged("items").await;
    assert_eq!(modded, again);
    assert_eq!(storage.reads(), reads);

    session.switch_context(tree.context("core"));
    let core = session.merged("items").await;
    assert_eq!(core.to_vec(), vec![json!({"id": "sword", "dmg": 5})]);
    assert!(storage.reads() > reads);
}

#[rstest]
#[tokio::test]
async fn disabled_cache_reads_every_time(tree: ContentTree) {
    let storage = Arc::new(tree.clone().into_memory());
    let session = session(&tree, &storage, "core").with_caching(false);
    let _first = session.merged("items").await;
    let reads = storage.reads();
    let _second = session.merged("items").await;
    assert!(storage.reads() > reads);
}

#[rstest]
#[tokio::test]
async fn saving_the_mod_layer_refreshes_the_merge(tree: ContentTree) -> anyhow::Result<()> {
    let storage = Arc::new(tree.clone().into_memory());
    let session = session(&tree, &storage, "hardmode");
    let _warm = session.merged("items").await;

    session
        .save("items", &[record("sword", json!({"dmg": 7}))])
        .await
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;

    assert_eq!(
        session.merged("items").await.to_vec(),
        vec![json!({"id": "sword", "dmg": 7})]
    );
    Ok(())
}
