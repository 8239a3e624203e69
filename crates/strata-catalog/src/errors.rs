//! Error types for the traversal engine.

use strata_core::{ConventionError, FilterError};

/// A storage backend could not satisfy a listing request.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("path not found: {path}")]
    NotFound { path: String },

    #[error("i/o failure on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by layouts, visitors, and the walk.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A node's name does not parse under any currently-surviving layout.
    #[error("node '{path}' does not match any layout")]
    LayoutMismatch { path: String },

    #[error("metadata field '{field}' is not available for '{path}'")]
    MissingMetadata { field: String, path: String },

    #[error("the path '{path}' does not exist in the storage backend")]
    MissingRoot { path: String },

    #[error("none of the configured layouts could generate a path")]
    NoLayoutGenerates,

    #[error(transparent)]
    Convention(#[from] ConventionError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
