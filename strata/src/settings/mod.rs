//! Engine settings gathered from files and the environment.
//!
//! Settings are layered with `figment`, lowest precedence first:
//!
//! 1. built-in defaults,
//! 2. `strata.toml` in the user configuration directory,
//! 3. `strata.toml` in the working directory,
//! 4. `STRATA_*` environment variables.
//!
//! A missing file contributes nothing.

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

use crate::context::CORE_MOD;
use crate::{EditContext, StrataResult, StrataResultExt};

/// File name looked up in each configuration directory.
pub const SETTINGS_FILE: &str = "strata.toml";

/// Prefix of the environment variables that override file settings.
pub const ENV_PREFIX: &str = "STRATA_";

fn default_mod() -> String {
    CORE_MOD.to_owned()
}

const fn default_cache() -> bool {
    true
}

/// Where content lives and which game/mod to open.
///
/// ```toml
/// root = "/srv/content"
/// game = "dungeon"
/// mod_name = "hardmode"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Storage root holding every game.
    pub root: Utf8PathBuf,
    /// Game to open.
    pub game: String,
    /// Mod to edit; defaults to the core mod.
    #[serde(default = "default_mod")]
    pub mod_name: String,
    /// Folder name of the base game layer.
    #[serde(default = "default_mod")]
    pub core_mod: String,
    /// Keep merged collections between operations.
    #[serde(default = "default_cache")]
    pub cache: bool,
}

impl EngineSettings {
    /// Gather settings from the discovered files and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::Settings`] when a file cannot be parsed
    /// or a required setting is missing.
    pub fn load() -> StrataResult<Self> {
        candidate_paths()
            .into_iter()
            .fold(Figment::new(), |figment, path| {
                figment.merge(Toml::file(path.as_std_path()))
            })
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .into_strata()
    }

    /// Gather settings from `path` and the environment only.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::Settings`] when the file cannot be
    /// parsed or a required setting is missing.
    pub fn load_from(path: &Utf8Path) -> StrataResult<Self> {
        Figment::from(Toml::file(path.as_std_path()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .into_strata()
    }

    /// Editing context described by these settings.
    #[must_use]
    pub fn context(&self) -> EditContext {
        EditContext::new(self.root.clone(), self.game.clone(), self.mod_name.clone())
            .with_core_mod(self.core_mod.clone())
    }
}

/// Settings files consulted by [`EngineSettings::load`], lowest precedence
/// first.
#[must_use]
pub fn candidate_paths() -> Vec<Utf8PathBuf> {
    let user = dirs::config_dir()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .map(|dir| dir.join("strata").join(SETTINGS_FILE));
    user.into_iter()
        .chain(std::iter::once(Utf8PathBuf::from(SETTINGS_FILE)))
        .collect()
}
