//! Filesystem-backed storage confined to a single root directory.

use std::io::ErrorKind;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::Value;

use crate::result_ext::StrataIoExt;
use crate::{StrataError, StrataResult, StrataResultExt};

use super::Storage;

/// Storage rooted at a directory on disk.
///
/// All access goes through a capability handle for the root, so a collection
/// path can never reach outside it. Reads happen synchronously on the calling
/// task; collection files are small JSON documents.
#[derive(Debug)]
pub struct FsStorage {
    root: Utf8PathBuf,
    dir: Dir,
}

impl FsStorage {
    /// Open an existing root directory.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Io`] when the directory cannot be opened.
    pub fn open(root: impl Into<Utf8PathBuf>) -> StrataResult<Self> {
        let root_path = root.into();
        let dir = Dir::open_ambient_dir(&root_path, ambient_authority()).at_path(&root_path)?;
        Ok(Self {
            root: root_path,
            dir,
        })
    }

    /// Create the root directory if needed, then open it.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Io`] when the directory cannot be created or
    /// opened.
    pub fn create(root: impl Into<Utf8PathBuf>) -> StrataResult<Self> {
        let root_path = root.into();
        std::fs::create_dir_all(&root_path).at_path(&root_path)?;
        Self::open(root_path)
    }

    /// Root directory this storage is confined to.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn relative<'p>(&self, path: &'p Utf8Path) -> StrataResult<&'p Utf8Path> {
        let rel = path.strip_prefix(&self.root).map_err(|_| {
            Arc::new(StrataError::OutsideRoot {
                path: path.to_path_buf(),
            })
        })?;
        if rel.as_str().is_empty() {
            Ok(Utf8Path::new("."))
        } else {
            Ok(rel)
        }
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn read_collection(&self, path: &Utf8Path) -> StrataResult<Option<Value>> {
        let rel = self.relative(path)?;
        let text = match self.dir.read_to_string(rel) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StrataError::unavailable(path, err)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| StrataError::malformed(path, err.to_string()))
    }

    async fn write_collection(&self, path: &Utf8Path, records: &[Value]) -> StrataResult<()> {
        let rel = self.relative(path)?;
        if let Some(parent) = rel.parent().filter(|p| !p.as_str().is_empty()) {
            self.dir.create_dir_all(parent).at_path(path)?;
        }
        let encoded = serde_json::to_vec_pretty(records).into_strata()?;
        self.dir.write(rel, encoded).at_path(path)
    }

    async fn list_subfolders(&self, path: &Utf8Path) -> StrataResult<Vec<String>> {
        let rel = self.relative(path)?;
        let entries = match self.dir.read_dir(rel) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StrataError::io(path, err)),
        };
        let mut names = Vec::new();
        for entry in entries {
            let dir_entry = entry.at_path(path)?;
            if dir_entry.file_type().at_path(path)?.is_dir() {
                names.push(dir_entry.file_name().at_path(path)?);
            }
        }
        names.sort();
        Ok(names)
    }
}
