//! Type catalog for MySQL column datatypes
//!
//! Every datatype resolves to:
//! - an abstract type (string, numeric, date)
//! - a capability set (variable length, scaled, enumerated)
//! - an optional storage width used to derive default maximums
//!
//! The catalog is a compile-time constant table. It needs no initialization
//! and is safe to share between threads.

mod flags;
mod types;

pub use flags::{ColumnFlags, Flag};
pub use types::{
    max_for_width, AbstractType, ByteWidth, Capabilities, Capability, DataType, TypeEntry,
};
