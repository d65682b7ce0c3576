//! Store driver contract
//!
//! The store executes already-prepared writes and plain reads. It owns
//! connections and transactions; nothing here retries or wraps its errors.
//!
//! Predicates are conjunctions of equality tests on physical (prefixed)
//! column names.

mod errors;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use memory::{MemoryStore, MemoryTable};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::schema::{PreparedRecord, Record, Value};

/// Equality predicate: every column must equal its value
pub type Predicate = IndexMap<String, Value>;

/// Identifier assigned by the store to an inserted row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Column metadata as reported by `SHOW COLUMNS`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    #[serde(rename = "Field")]
    pub name: String,
    #[serde(rename = "Type")]
    pub type_string: String,
    #[serde(rename = "Null", with = "yes_no", default)]
    pub nullable: bool,
    #[serde(rename = "Key", default)]
    pub key_role: String,
    #[serde(rename = "Extra", default)]
    pub extra: String,
    #[serde(rename = "Default", default)]
    pub default: Option<String>,
}

impl ColumnMeta {
    /// Nullable column with no key role, extra or default
    pub fn new(name: impl Into<String>, type_string: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_string: type_string.into(),
            nullable: true,
            key_role: String::new(),
            extra: String::new(),
            default: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn key(mut self, role: impl Into<String>) -> Self {
        self.key_role = role.into();
        self
    }

    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }

    pub fn default_literal(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self
    }

    pub fn is_auto_increment(&self) -> bool {
        self.extra.to_ascii_lowercase().contains("auto_increment")
    }
}

/// `"YES"`/`"NO"` on the wire, also accepting JSON booleans
mod yes_no {
    use super::*;

    pub fn serialize<S: Serializer>(nullable: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(if *nullable { "YES" } else { "NO" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }

        match Raw::deserialize(d)? {
            Raw::Bool(b) => Ok(b),
            Raw::Text(s) => match s.to_ascii_uppercase().as_str() {
                "YES" => Ok(true),
                "NO" => Ok(false),
                other => Err(serde::de::Error::custom(format!(
                    "expected YES or NO, got '{}'",
                    other
                ))),
            },
        }
    }
}

/// Relational store consumed by the record access layer and the scaffolder
pub trait Store {
    /// Inserts one row, returning the affected-row count
    fn insert(&mut self, table: &str, record: &PreparedRecord) -> StoreResult<u64>;

    /// Identifier generated by the most recent insert, if any
    fn last_insert_id(&self) -> Option<RecordId>;

    /// Updates matching rows, returning the affected-row count
    fn update(
        &mut self,
        table: &str,
        predicate: &Predicate,
        record: &PreparedRecord,
    ) -> StoreResult<u64>;

    /// Deletes matching rows, returning the affected-row count
    fn delete(&mut self, table: &str, predicate: &Predicate) -> StoreResult<u64>;

    /// First matching row
    fn select_one(&self, table: &str, predicate: &Predicate) -> StoreResult<Option<Record>>;

    /// Every row of the table
    fn select_all(&self, table: &str) -> StoreResult<Vec<Record>>;

    /// Number of matching rows
    fn count(&self, table: &str, predicate: &Predicate) -> StoreResult<u64>;

    /// Names of all tables
    fn list_tables(&self) -> StoreResult<Vec<String>>;

    /// Column metadata of a table, in table order
    fn describe_columns(&self, table: &str) -> StoreResult<Vec<ColumnMeta>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_meta_from_show_columns() {
        let meta: ColumnMeta = serde_json::from_str(
            r#"{"Field":"user_id","Type":"int(11) unsigned","Null":"NO","Key":"PRI","Extra":"auto_increment","Default":null}"#,
        )
        .unwrap();
        assert_eq!(meta.name, "user_id");
        assert!(!meta.nullable);
        assert_eq!(meta.key_role, "PRI");
        assert!(meta.is_auto_increment());
        assert_eq!(meta.default, None);
    }

    #[test]
    fn test_column_meta_accepts_bool_nullability() {
        let meta: ColumnMeta =
            serde_json::from_str(r#"{"Field":"a","Type":"text","Null":true}"#).unwrap();
        assert!(meta.nullable);
        assert!(meta.key_role.is_empty());
    }

    #[test]
    fn test_column_meta_rejects_bad_nullability() {
        let result: Result<ColumnMeta, _> =
            serde_json::from_str(r#"{"Field":"a","Type":"text","Null":"MAYBE"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_column_meta_serializes_yes_no() {
        let json = serde_json::to_value(ColumnMeta::new("a", "text").not_null()).unwrap();
        assert_eq!(json["Null"], "NO");
    }
}
