//! Primary error enum for layered content resolution.

use camino::Utf8PathBuf;
use figment::Error as FigmentError;
use thiserror::Error;

/// Errors that can occur while loading layers or resolving schemas.
///
/// None of these are fatal during normal editing: the loaders degrade a
/// failing layer to an empty one and the filter generator turns an
/// [`StrataError::UnresolvedReference`] into a placeholder field. The enum
/// exists so collaborators and diagnostics can tell the failure modes apart.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// A layer file could not be read.
    #[error("collection source '{path}' is unavailable: {source}")]
    SourceUnavailable {
        /// Path of the layer that failed to load.
        path: Utf8PathBuf,
        /// Underlying error reported by the storage collaborator.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A layer parsed but did not have the expected shape.
    #[error("collection source '{path}' is malformed: {message}")]
    MalformedSource {
        /// Path of the offending layer.
        path: Utf8PathBuf,
        /// Human-readable description of the shape mismatch.
        message: String,
    },

    /// A field path could not be followed through its schema.
    #[error("cannot resolve '{path}': {reason}")]
    UnresolvedReference {
        /// Dotted path that failed to resolve.
        path: String,
        /// Human-readable explanation shown to the editing user.
        reason: String,
    },

    /// A storage path escaped the storage root.
    #[error("path '{path}' lies outside the storage root")]
    OutsideRoot {
        /// Offending path.
        path: Utf8PathBuf,
    },

    /// Filesystem failure outside of collection reads.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Engine settings could not be gathered or extracted.
    #[error("failed to load engine settings: {0}")]
    Settings(#[from] Box<FigmentError>),
}
