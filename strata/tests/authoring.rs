//! Schema resolution, default injection and filters through a session.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface fixture mistakes"
)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use camino::Utf8Path;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use strata::StrataResult;
use strata::filter::{FilterKind, FilterSchemaConfig, FilterSchemaGenerator, MatchMode};
use strata::schema::{FieldKind, Schema, SchemaRegistry};
use strata::session::{AuthoringSession, Resolution};
use strata::storage::{MemoryStorage, Storage};
use test_helpers::{ContentTree, record};

fn schema(document: Value) -> Schema {
    serde_json::from_value(document).expect("schema literal parses")
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .with(
            "items",
            schema(json!({
                "name": {"type": "string", "default": "Unnamed"},
                "color": {"type": "color", "default": "#ffffff"},
                "level": {"type": "integer", "min": 1, "max": 60},
                "tags": {"type": "string[]"},
                "element": {"type": "select", "sourceCollection": "elements"},
                "skills": {"type": "object", "sourceCollection": "skills"}
            })),
        )
        .with(
            "encounters",
            schema(json!({
                "pool": {"type": "select", "sourceCollection": "pools"},
                "rules": {"type": "object[]", "objects": {"values": {"type": "object"}}}
            })),
        )
}

#[fixture]
fn tree() -> ContentTree {
    ContentTree::new("/data", "dungeon")
        .core("elements", [record("fire", json!({})), record("ice", json!({}))])
        .layer("hardmode", "elements", [record("void", json!({}))])
        .core(
            "skills",
            [
                record("swords", json!({"type": "number", "max": 100})),
                record("portrait", json!({"type": "image"})),
            ],
        )
        .core(
            "pools",
            [
                record("a", json!({"sourceSchema": "items", "fields": ["level", "tags"]})),
                record("c", json!({"sourceSchema": "items", "fields": ["level", "skills.swords"]})),
            ],
        )
}

fn open(tree: &ContentTree, mod_name: &str) -> AuthoringSession {
    AuthoringSession::new(Arc::new(tree.clone().into_memory()), tree.context(mod_name))
        .with_registry(registry())
}

#[rstest]
#[tokio::test]
async fn resolved_schema_reflects_the_active_mod(tree: ContentTree) {
    let session = open(&tree, "hardmode");
    let resolved = session
        .resolve_schema("items.json", None)
        .await
        .adopted()
        .expect("schema adopted");

    assert_eq!(
        resolved["element"].options,
        Some(vec![json!("fire"), json!("ice"), json!("void")])
    );
    let skills = resolved["skills"].objects.as_ref().expect("skills generated");
    assert_eq!(skills["swords"].kind, FieldKind::Number);
    assert_eq!(skills["portrait"].kind, FieldKind::File);
    assert_eq!(skills["portrait"].subtype.as_deref(), Some("image"));
    assert_eq!(session.current_schema(), Some(resolved));
}

#[rstest]
#[tokio::test]
async fn unknown_schema_is_reported(tree: ContentTree) {
    let session = open(&tree, "core");
    assert_eq!(
        session.resolve_schema("spells", None).await,
        Resolution::UnknownSchema
    );
}

#[rstest]
#[case::core_edit("core", false, true)]
#[case::new_in_mod("hardmode", true, true)]
#[case::mod_override("hardmode", false, false)]
#[tokio::test]
async fn defaults_follow_the_authoring_mode(
    tree: ContentTree,
    #[case] mod_name: &str,
    #[case] is_new: bool,
    #[case] expect_color: bool,
) {
    let session = open(&tree, mod_name);
    let resolved = session
        .resolve_schema("items", None)
        .await
        .adopted()
        .expect("schema adopted");

    let mut entity = json!({"id": "sword", "name": "custom"});
    session.injector(is_new).inject(&mut entity, &resolved);

    assert_eq!(entity["name"], json!("custom"));
    assert_eq!(entity.get("color").is_some(), expect_color);
}

#[rstest]
#[tokio::test]
async fn filters_follow_the_pool_reference(tree: ContentTree) {
    let session = open(&tree, "core");
    let config = FilterSchemaConfig::new("pool", "pools").with_filter_values("rules.values");
    let mut generator = FilterSchemaGenerator::new(config);
    let mut encounter = json!({
        "id": "ambush",
        "pool": "a",
        "rules": [{"values": {"level": [1, 10], "tags": ["undead"]}}]
    });

    let first = session.refresh_filters(&mut generator, &mut encounter).await;
    assert_eq!(
        first.schema["level"].kind,
        FilterKind::Range {
            min: Some(1.0),
            max: Some(60.0)
        }
    );
    assert_eq!(
        first.schema["tags"].kind,
        FilterKind::StringList { mode: MatchMode::Or }
    );
    assert_eq!(first.removed, 0);

    encounter["pool"] = json!("c");
    let second = session.refresh_filters(&mut generator, &mut encounter).await;
    assert_eq!(
        second.schema["skills.swords"].kind,
        FilterKind::Range {
            min: None,
            max: Some(100.0)
        }
    );
    assert_eq!(second.removed, 1);
    assert_eq!(encounter["rules"][0]["values"], json!({"level": [1, 10]}));
}

/// Storage that answers reads for `slow_*` collections late.
struct SlowStorage {
    inner: MemoryStorage,
}

#[async_trait]
impl Storage for SlowStorage {
    async fn read_collection(&self, path: &Utf8Path) -> StrataResult<Option<Value>> {
        if path.file_name().is_some_and(|name| name.starts_with("slow_")) {
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
        self.inner.read_collection(path).await
    }

    async fn write_collection(&self, path: &Utf8Path, records: &[Value]) -> StrataResult<()> {
        self.inner.write_collection(path, records).await
    }

    async fn list_subfolders(&self, path: &Utf8Path) -> StrataResult<Vec<String>> {
        self.inner.list_subfolders(path).await
    }
}

#[rstest]
#[tokio::test]
async fn late_resolution_does_not_replace_a_newer_one() {
    let tree = ContentTree::new("/data", "dungeon")
        .core("slow_elements", [record("fire", json!({}))])
        .core("elements", [record("ice", json!({}))]);
    let registry = SchemaRegistry::new()
        .with(
            "old",
            schema(json!({"e": {"type": "select", "sourceCollection": "slow_elements"}})),
        )
        .with(
            "new",
            schema(json!({"e": {"type": "select", "sourceCollection": "elements"}})),
        );
    let storage = SlowStorage {
        inner: tree.clone().into_memory(),
    };
    let session =
        AuthoringSession::new(Arc::new(storage), tree.context("core")).with_registry(registry);

    let (stale, fresh) = tokio::join!(
        session.resolve_schema("old", None),
        session.resolve_schema("new", None)
    );

    assert_eq!(stale, Resolution::Superseded);
    let fresh = fresh.adopted().expect("newest resolution adopted");
    assert_eq!(fresh["e"].options, Some(vec![json!("ice")]));
    assert_eq!(session.current_schema(), Some(fresh));
}

#[rstest]
#[tokio::test]
async fn generators_use_the_owner_passed_in(tree: ContentTree) {
    let mut registry = registry();
    registry.register(
        "loadouts",
        schema(json!({
            "main": {"type": "select", "generator": {"strategy": "siblingOptions", "field": "slots"}}
        })),
    );
    let session = AuthoringSession::new(Arc::new(tree.clone().into_memory()), tree.context("core"))
        .with_registry(registry);
    let owner = json!({"slots": [{"id": "left"}, {"id": "right"}]});

    let resolved = session
        .resolve_schema("loadouts", Some(&owner))
        .await
        .adopted()
        .expect("schema adopted");
    assert_eq!(
        resolved["main"].options,
        Some(vec![json!("left"), json!("right")])
    );
}
