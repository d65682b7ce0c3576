//! Record access errors

use thiserror::Error;

use crate::schema::SchemaError;
use crate::store::StoreError;

/// Result type for record access operations
pub type AccessResult<T> = Result<T, AccessError>;

/// Errors surfaced by a table accessor.
///
/// Lenient rejections and hook aborts are not errors; they come back as
/// `Ok(None)` or `Ok(false)`.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Strict-mode validation failure or schema defect
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Store failure, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccessError {
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            AccessError::Schema(err) => Some(err),
            AccessError::Store(_) => None,
        }
    }
}
