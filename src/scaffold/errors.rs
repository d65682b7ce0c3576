//! Scaffold error types

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaError;
use crate::store::StoreError;

/// Result type for scaffold operations
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Metadata could not be read from the store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A column could not be turned into a definition
    #[error("Column '{column}' of table '{table}': {source}")]
    Column {
        table: String,
        column: String,
        #[source]
        source: SchemaError,
    },

    /// Generated file could not be written
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON rendering failed
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Source text could not be formatted
    #[error("Failed to render source: {0}")]
    Format(#[from] fmt::Error),
}

impl ScaffoldError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ScaffoldError::Io {
            path: path.into(),
            source,
        }
    }
}
