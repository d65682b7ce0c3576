//! Schema descriptors and record preparation
//!
//! A schema declares, per column, a catalog datatype, an optional length or
//! enumeration, flags and a default. Records are validated against it before
//! they reach the store.
//!
//! # Rules
//!
//! - Unknown columns are rejected
//! - Auto-increment primary keys are never sent to the store
//! - Empty strings become null unless the column is NOT NULL
//! - Declared lengths are inclusive; datatype maximums are exclusive
//! - Defaults are validated like any other value

mod errors;
mod loader;
mod preparer;
mod types;
mod value;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity, ValidationDetails};
pub use loader::SchemaLoader;
pub use preparer::{PrepareError, Preparer, ValidationMode};
pub use types::{ColumnDef, Length, Schema};
pub use value::{record, PreparedRecord, Record, Value};
