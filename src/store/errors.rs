//! Store error types

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a store driver. They reach the caller unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Table does not exist
    #[error("Table not found: {0}")]
    UnknownTable(String),

    /// Column does not exist in the table
    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// A store-side constraint refused the write
    #[error("Constraint violated on '{table}.{column}': {reason}")]
    Constraint {
        table: String,
        column: String,
        reason: String,
    },

    /// Snapshot file could not be read
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] io::Error),

    /// Snapshot file is not valid JSON
    #[error("Snapshot format error: {0}")]
    Format(#[from] serde_json::Error),
}
