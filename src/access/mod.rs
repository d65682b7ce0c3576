//! Record access layer
//!
//! Wraps a store with per-table naming conventions, pre-write hooks and
//! schema validation:
//!
//! - Physical columns are `<prefix><column>`, prefix defaulting to `<table>_`
//! - Writes succeed only when exactly one row is affected
//! - Store errors are never swallowed

mod errors;
mod hooks;
mod table;

pub use errors::{AccessError, AccessResult};
pub use hooks::{Condition, CreateHook, DeleteHook, Hooks, UpdateHook};
pub use table::{derive_table_name, Table, TableConfig};
