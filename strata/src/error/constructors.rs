//! Constructors shared by the storage and loading layers.

use std::sync::Arc;

use camino::Utf8Path;

use super::StrataError;

impl StrataError {
    /// Construct a [`StrataError::SourceUnavailable`] for `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use strata::StrataError;
    ///
    /// let err = StrataError::unavailable(
    ///     Utf8Path::new("data/game/core/items"),
    ///     std::io::Error::other("disk on fire"),
    /// );
    /// assert!(matches!(&*err, StrataError::SourceUnavailable { .. }));
    /// ```
    #[must_use]
    pub fn unavailable(
        path: &Utf8Path,
        err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Arc<Self> {
        Arc::new(Self::SourceUnavailable {
            path: path.to_path_buf(),
            source: err.into(),
        })
    }

    /// Construct a [`StrataError::MalformedSource`] for `path`.
    #[must_use]
    pub fn malformed(path: &Utf8Path, message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::MalformedSource {
            path: path.to_path_buf(),
            message: message.into(),
        })
    }

    /// Construct a [`StrataError::UnresolvedReference`].
    #[must_use]
    pub fn unresolved(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Construct a [`StrataError::Io`] wrapped in an [`Arc`].
    #[must_use]
    pub fn io(path: &Utf8Path, source: std::io::Error) -> Arc<Self> {
        Arc::new(Self::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns `true` when the error means the layer should be treated as
    /// empty rather than reported to the caller.
    #[must_use]
    pub const fn degrades_to_empty(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::MalformedSource { .. } | Self::Json(_)
        )
    }
}
