//! Game and mod context plus the on-disk collection path convention.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Name of the mod folder that holds the base game's content.
pub const CORE_MOD: &str = "core";

/// The game and mod currently being edited.
///
/// Collection files live at `<root>/<game>/<mod>/<collectionName>`. When the
/// active mod is the core mod the engine reads a single content layer;
/// otherwise the core layer sits underneath the mod layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditContext {
    root: Utf8PathBuf,
    game: String,
    mod_name: String,
    core_mod: String,
}

impl EditContext {
    /// Build a context for `game`/`mod_name` under `root`, using the default
    /// core mod name.
    #[must_use]
    pub fn new(
        root: impl Into<Utf8PathBuf>,
        game: impl Into<String>,
        mod_name: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            game: game.into(),
            mod_name: mod_name.into(),
            core_mod: CORE_MOD.to_owned(),
        }
    }

    /// Override the folder name treated as the base game.
    #[must_use]
    pub fn with_core_mod(mut self, core_mod: impl Into<String>) -> Self {
        self.core_mod = core_mod.into();
        self
    }

    /// Storage root holding every game.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Active game.
    #[must_use]
    pub fn game(&self) -> &str {
        &self.game
    }

    /// Active mod.
    #[must_use]
    pub fn mod_name(&self) -> &str {
        &self.mod_name
    }

    /// Folder name of the base game layer.
    #[must_use]
    pub fn core_mod(&self) -> &str {
        &self.core_mod
    }

    /// Returns `true` when the active mod is the base game itself.
    #[must_use]
    pub fn is_core(&self) -> bool {
        self.mod_name == self.core_mod
    }

    /// Path of `collection` inside the active mod.
    ///
    /// ```
    /// use strata::EditContext;
    ///
    /// let ctx = EditContext::new("/data", "dungeon", "hardmode");
    /// assert_eq!(ctx.collection_path("items"), "/data/dungeon/hardmode/items");
    /// ```
    #[must_use]
    pub fn collection_path(&self, collection: &str) -> Utf8PathBuf {
        self.path_in(&self.mod_name, collection)
    }

    /// Path of `collection` inside the core mod.
    #[must_use]
    pub fn core_collection_path(&self, collection: &str) -> Utf8PathBuf {
        self.path_in(&self.core_mod, collection)
    }

    /// Folder holding the mods of the active game.
    #[must_use]
    pub fn game_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.game)
    }

    fn path_in(&self, mod_name: &str, collection: &str) -> Utf8PathBuf {
        self.root.join(&self.game).join(mod_name).join(collection)
    }
}

/// Normalise a collection or schema name for lookups.
///
/// Trims surrounding whitespace, a leading `/`, and a trailing `.json`, so
/// `"/items.json"`, `"items.json"` and `"items"` all name the same schema.
#[must_use]
pub fn normalize_collection_name(name: &str) -> &str {
    let trimmed = name.trim().trim_start_matches('/');
    trimmed.strip_suffix(".json").unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{EditContext, normalize_collection_name};

    #[rstest]
    fn paths_follow_root_game_mod_collection() {
        let ctx = EditContext::new("/srv/content", "dungeon", "hardmode");
        assert_eq!(
            ctx.collection_path("items.json"),
            "/srv/content/dungeon/hardmode/items.json"
        );
        assert_eq!(
            ctx.core_collection_path("items.json"),
            "/srv/content/dungeon/core/items.json"
        );
        assert_eq!(ctx.game_dir(), "/srv/content/dungeon");
    }

    #[rstest]
    #[case("core", true)]
    #[case("hardmode", false)]
    fn core_detection(#[case] mod_name: &str, #[case] expected: bool) {
        let ctx = EditContext::new("/r", "g", mod_name);
        assert_eq!(ctx.is_core(), expected);
    }

    #[rstest]
    fn custom_core_mod_name() {
        let ctx = EditContext::new("/r", "g", "base").with_core_mod("base");
        assert!(ctx.is_core());
        assert_eq!(ctx.core_collection_path("items"), "/r/g/base/items");
    }

    #[rstest]
    #[case("items", "items")]
    #[case("items.json", "items")]
    #[case(" /items.json ", "items")]
    #[case("pools/loot", "pools/loot")]
    fn normalises_names(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_collection_name(raw), expected);
    }
}
