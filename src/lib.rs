//! rowguard - schema validation in front of CRUD
//!
//! Records are checked against per-table schemas built on a fixed type
//! catalog, prefixed and default-filled, then handed to a store. Schemas can
//! be written by hand or scaffolded from a live store's column metadata.

pub mod access;
pub mod catalog;
pub mod cli;
pub mod datetime;
pub mod observability;
pub mod scaffold;
pub mod schema;
pub mod store;
