//! Sessions over on-disk content opened from settings.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface fixture mistakes"
)]

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use serde_json::json;
use strata::session::AuthoringSession;
use strata::settings::{EngineSettings, SETTINGS_FILE};
use strata::storage::{FsStorage, Storage};
use tempfile::TempDir;
use test_helpers::{ContentTree, figment_error, record, with_jail};

struct OnDisk {
    _dir: TempDir,
    root: Utf8PathBuf,
}

#[fixture]
fn on_disk() -> OnDisk {
    let dir = tempfile::tempdir().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    ContentTree::new(root.clone(), "dungeon")
        .core("items", [record("sword", json!({"dmg": 5}))])
        .layer("hardmode", "items", [record("sword", json!({"name": "Iron Sword"}))])
        .raw("broken", "items", json!({"oops": true}))
        .write_to(&root)
        .expect("write content tree");
    OnDisk { _dir: dir, root }
}

fn settings_for(on_disk: &OnDisk, mod_name: &str) -> Result<EngineSettings> {
    let root = on_disk.root.clone();
    let mod_name = mod_name.to_owned();
    with_jail(move |j| {
        j.clear_env();
        j.create_file(SETTINGS_FILE, &format!("root = {:?}\ngame = \"dungeon\"", root.as_str()))?;
        j.set_env("STRATA_MOD_NAME", &mod_name);
        EngineSettings::load().map_err(figment_error)
    })
}

#[rstest]
#[tokio::test]
async fn settings_open_a_filesystem_session(on_disk: OnDisk) -> Result<()> {
    let settings = settings_for(&on_disk, "hardmode")?;
    let session = AuthoringSession::from_settings(&settings).map_err(|e| anyhow!("{e}"))?;

    let items = session.merged("items").await;
    assert_eq!(
        items.to_vec(),
        vec![json!({"id": "sword", "dmg": 5, "name": "Iron Sword"})]
    );
    assert_eq!(
        session.games().await.map_err(|e| anyhow!("{e}"))?,
        vec!["dungeon".to_owned()]
    );
    assert_eq!(
        session.mods().await.map_err(|e| anyhow!("{e}"))?,
        vec!["broken".to_owned(), "core".to_owned(), "hardmode".to_owned()]
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn malformed_mod_file_leaves_core_visible(on_disk: OnDisk) -> Result<()> {
    let settings = settings_for(&on_disk, "broken")?;
    let session = AuthoringSession::from_settings(&settings).map_err(|e| anyhow!("{e}"))?;
    assert_eq!(
        session.merged("items").await.to_vec(),
        vec![json!({"id": "sword", "dmg": 5})]
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn saves_land_in_the_active_mod_folder(on_disk: OnDisk) -> Result<()> {
    let settings = settings_for(&on_disk, "fresh")?;
    let session = AuthoringSession::from_settings(&settings).map_err(|e| anyhow!("{e}"))?;

    session
        .save("items", &[record("shield", json!({"def": 2}))])
        .await
        .map_err(|e| anyhow!("{e}"))?;

    let written = std::fs::read_to_string(on_disk.root.join("dungeon/fresh/items"))
        .context("read saved layer")?;
    let parsed: serde_json::Value = serde_json::from_str(&written)?;
    assert_eq!(parsed, json!([{"id": "shield", "def": 2}]));

    let ids: Vec<_> = session
        .merged("items")
        .await
        .iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!("sword"), json!("shield")]);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn storage_refuses_paths_outside_its_root(on_disk: OnDisk) -> Result<()> {
    let storage = FsStorage::open(on_disk.root.join("dungeon")).map_err(|e| anyhow!("{e}"))?;
    let escaped = on_disk.root.join("elsewhere/core/items");
    let err = storage
        .read_collection(&escaped)
        .await
        .expect_err("path outside the root must be rejected");
    assert!(matches!(&*err, strata::StrataError::OutsideRoot { .. }));
    Ok(())
}
