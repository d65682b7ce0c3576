//! Record preparation: validation, coercion, prefixing and defaults
//!
//! For each `(column, value)` pair of the input, in input order:
//! 1. The column must be defined (an empty schema fails first)
//! 2. Auto-increment primary keys are dropped; other primary keys must be non-null
//! 3. Null passes through unless the column is NOT NULL
//! 4. Strings: type, empty-to-null coercion (not on NOT NULL or key columns),
//!    enumeration, length
//! 5. Numbers: type, sign, declared bound or datatype maximum
//! 6. Dates: must parse as a date or time; YEAR also takes a four-digit integer
//! 7. Accepted values are keyed by `prefix + column`
//!
//! With defaults enabled, every schema column missing from the result is
//! filled from its declared default. The defaults pass through the same
//! checks and fail the whole preparation if any of them is invalid.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{AbstractType, Capability, DataType, Flag, TypeEntry};
use crate::datetime;
use crate::observability::{Event, Logger};

use super::errors::{SchemaError, SchemaResult};
use super::types::{ColumnDef, Length, Schema};
use super::value::{PreparedRecord, Record, Value};

/// How validation failures are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Every failure is returned with its column and reason
    #[default]
    Strict,
    /// Every failure collapses into a bare rejection
    Lenient,
}

/// Outcome of a failed preparation
#[derive(Debug, Error)]
pub enum PrepareError {
    /// Strict mode: the failure in full
    #[error("{0}")]
    Invalid(#[from] SchemaError),
    /// Lenient mode: the record is rejected, reason withheld
    #[error("record rejected by schema")]
    Rejected,
}

impl PrepareError {
    /// Underlying schema error, available in strict mode only
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            PrepareError::Invalid(err) => Some(err),
            PrepareError::Rejected => None,
        }
    }
}

/// Validates records against a schema and prepares them for the store.
///
/// The preparer does not mutate its input and keeps no state between calls.
#[derive(Debug, Clone)]
pub struct Preparer {
    prefix: String,
    mode: ValidationMode,
}

impl Preparer {
    /// Creates a preparer prefixing column names with `prefix`
    pub fn new(prefix: impl Into<String>, mode: ValidationMode) -> Self {
        Self {
            prefix: prefix.into(),
            mode,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Physical column name for a schema column
    pub fn prefixed(&self, column: &str) -> String {
        format!("{}{}", self.prefix, column)
    }

    /// Validates `record` against `schema` and returns the prefixed record.
    ///
    /// # Errors
    ///
    /// In strict mode, `PrepareError::Invalid` with the first failure found.
    /// In lenient mode, `PrepareError::Rejected`; the failure is logged as
    /// `PREPARE_REJECTED` with its column and code, then discarded.
    pub fn prepare(
        &self,
        schema: &Schema,
        record: &Record,
        apply_defaults: bool,
    ) -> Result<PreparedRecord, PrepareError> {
        self.check_record(schema, record, apply_defaults)
            .map_err(|err| match self.mode {
                ValidationMode::Strict => PrepareError::Invalid(err),
                ValidationMode::Lenient => {
                    Logger::event(
                        Event::PrepareRejected,
                        &[
                            ("code", err.code().code()),
                            ("column", err.column().unwrap_or("")),
                            ("table", schema.table.as_str()),
                        ],
                    );
                    PrepareError::Rejected
                }
            })
    }

    fn check_record(
        &self,
        schema: &Schema,
        record: &Record,
        apply_defaults: bool,
    ) -> SchemaResult<PreparedRecord> {
        if schema.is_empty() {
            return Err(SchemaError::missing_schema(&schema.table));
        }

        let mut result = PreparedRecord::with_capacity(record.len());

        for (name, value) in record {
            let column = schema
                .get(name)
                .ok_or_else(|| SchemaError::undefined_column(name))?;

            if let Some(accepted) = check_value(name, column, value)? {
                result.insert(self.prefixed(name), accepted);
            }
        }

        if !apply_defaults {
            return Ok(result);
        }

        let defaults: Record = schema
            .iter()
            .filter(|(name, _)| !result.contains_key(&self.prefixed(name)))
            .map(|(name, def)| (name.clone(), def.default.clone().unwrap_or(Value::Null)))
            .collect();

        let mut merged = self.check_record(schema, &defaults, false)?;
        merged.extend(result);
        Ok(merged)
    }
}

/// Checks one value. `Ok(None)` means the column is left out of the result.
fn check_value(name: &str, column: &ColumnDef, value: &Value) -> SchemaResult<Option<Value>> {
    let entry = column.entry();

    if column.has_flag(Flag::PrimaryKey) {
        if column.has_flag(Flag::AutoIncrement) {
            if entry.abstract_type != AbstractType::Numeric {
                return Err(SchemaError::invalid_auto_increment_type(name));
            }
            // Generated by the store
            return Ok(None);
        }
        if value.is_null() {
            return Err(SchemaError::null_primary_key(name));
        }
    }

    if value.is_null() {
        if column.has_flag(Flag::NotNull) {
            return Err(SchemaError::null_not_allowed(name));
        }
        return Ok(Some(Value::Null));
    }

    match entry.abstract_type {
        AbstractType::String => check_string(name, column, &entry, value),
        AbstractType::Numeric => {
            check_numeric(name, column, &entry, value)?;
            Ok(Some(value.clone()))
        }
        AbstractType::Date => match (value, value.as_str()) {
            (_, Some(text)) if datetime::is_date_like(text) => Ok(Some(value.clone())),
            (_, Some(text)) => Err(SchemaError::invalid_date(name, text)),
            (Value::Int(year), None)
                if column.datatype == DataType::Year
                    && datetime::is_date_like(&year.to_string()) =>
            {
                Ok(Some(value.clone()))
            }
            (_, None) => Err(SchemaError::invalid_date(name, value.type_name())),
        },
    }
}

fn check_string(
    name: &str,
    column: &ColumnDef,
    entry: &TypeEntry,
    value: &Value,
) -> SchemaResult<Option<Value>> {
    let text = value.as_str().ok_or_else(|| {
        SchemaError::type_mismatch(name, AbstractType::String.as_str(), value.type_name())
    })?;

    // NOT NULL and key columns keep the empty string; length and
    // enumeration are not checked
    if text.is_empty() {
        if column.has_flag(Flag::NotNull) || column.is_primary_key() {
            return Ok(Some(value.clone()));
        }
        return Ok(Some(Value::Null));
    }

    if entry.has(Capability::Enumerated) {
        let allowed = match column.length.as_ref().and_then(Length::enum_values) {
            Some(values) if !values.is_empty() => values,
            _ => return Err(SchemaError::schema_enum_missing(name)),
        };
        if !allowed.iter().any(|v| v == text) {
            return Err(SchemaError::invalid_enum_value(name, text));
        }
        return Ok(Some(value.clone()));
    }

    // Declared length wins over the datatype maximum, fixed or variable
    let len = text.len();
    match declared_bound(column).filter(|limit| *limit > 0.0) {
        Some(limit) => {
            if len as f64 > limit {
                return Err(SchemaError::length_exceeded_schema(name, limit, len));
            }
        }
        None => {
            let max = entry.default_max();
            if len as u128 >= max {
                return Err(SchemaError::length_exceeded_type(name, max, len));
            }
        }
    }

    Ok(Some(value.clone()))
}

fn check_numeric(
    name: &str,
    column: &ColumnDef,
    entry: &TypeEntry,
    value: &Value,
) -> SchemaResult<()> {
    let number = value.as_f64().ok_or_else(|| {
        SchemaError::type_mismatch(name, AbstractType::Numeric.as_str(), value.type_name())
    })?;

    if column.has_flag(Flag::Unsigned) && number < 0.0 {
        return Err(SchemaError::negative_unsigned(name, number));
    }

    match declared_bound(column) {
        Some(limit) if entry.has(Capability::VariableLength) => {
            if entry.has(Capability::Scaled) {
                // Precision and scale are only checked for shape; values are
                // never rounded or truncated to the declared scale.
                if !matches!(column.length, Some(Length::Precision { .. })) {
                    return Err(SchemaError::invalid_precision_spec(name));
                }
            } else if number > limit {
                return Err(SchemaError::length_exceeded_schema(name, limit, number));
            }
        }
        _ => {
            let max = entry.default_max();
            if number >= max as f64 {
                return Err(SchemaError::length_exceeded_type(name, max, number));
            }
        }
    }

    Ok(())
}

fn declared_bound(column: &ColumnDef) -> Option<f64> {
    column.length.as_ref().and_then(Length::numeric_bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;
    use crate::schema::value::record;
    use crate::schema::SchemaErrorCode;

    fn people() -> Schema {
        Schema::new("p")
            .column("name", ColumnDef::new(DataType::VarChar).length(10).flags(&[Flag::NotNull]))
            .column(
                "age",
                ColumnDef::new(DataType::Int)
                    .flags(&[Flag::Unsigned])
                    .default_value(0),
            )
    }

    fn strict() -> Preparer {
        Preparer::new("p_", ValidationMode::Strict)
    }

    fn code_of(result: Result<PreparedRecord, PrepareError>) -> SchemaErrorCode {
        result.unwrap_err().schema_error().unwrap().code()
    }

    #[test]
    fn test_scenario_all_columns_supplied() {
        let out = strict()
            .prepare(&people(), &record([("name", Value::from("Alice")), ("age", Value::from(30))]), true)
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out["p_name"], Value::from("Alice"));
        assert_eq!(out["p_age"], Value::Int(30));
    }

    #[test]
    fn test_empty_schema_fails() {
        let result = strict().prepare(&Schema::new("p"), &Record::new(), false);
        assert_eq!(code_of(result), SchemaErrorCode::MissingSchema);
    }

    #[test]
    fn test_undefined_column() {
        let result = strict().prepare(&people(), &record([("email", "a@b.c")]), false);
        let err = result.unwrap_err();
        let err = err.schema_error().unwrap();
        assert_eq!(err.code(), SchemaErrorCode::UndefinedColumn);
        assert_eq!(err.column(), Some("email"));
    }

    #[test]
    fn test_auto_increment_key_dropped() {
        let schema = Schema::new("p").column(
            "id",
            ColumnDef::new(DataType::Int).flags(&[Flag::PrimaryKey, Flag::AutoIncrement]),
        );
        let out = strict().prepare(&schema, &record([("id", 5)]), true).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_auto_increment_requires_numeric() {
        let schema = Schema::new("p").column(
            "id",
            ColumnDef::new(DataType::VarChar).flags(&[Flag::PrimaryKey, Flag::AutoIncrement]),
        );
        let result = strict().prepare(&schema, &record([("id", "x")]), false);
        assert_eq!(code_of(result), SchemaErrorCode::InvalidAutoIncrementType);
    }

    #[test]
    fn test_null_primary_key() {
        let schema = Schema::new("p").column("code", ColumnDef::new(DataType::Char).flags(&[Flag::PrimaryKey]));
        let result = strict().prepare(&schema, &record([("code", Value::Null)]), false);
        assert_eq!(code_of(result), SchemaErrorCode::NullPrimaryKey);
    }

    #[test]
    fn test_empty_string_primary_key_kept() {
        let schema = Schema::new("p").column(
            "code",
            ColumnDef::new(DataType::Char).length(6).flags(&[Flag::PrimaryKey]),
        );
        let out = strict().prepare(&schema, &record([("code", "")]), false).unwrap();
        assert_eq!(out["p_code"], Value::from(""));
    }

    #[test]
    fn test_null_not_allowed() {
        let result = strict().prepare(&people(), &record([("name", Value::Null)]), false);
        assert_eq!(code_of(result), SchemaErrorCode::NullNotAllowed);
    }

    #[test]
    fn test_null_passes_for_nullable() {
        let out = strict().prepare(&people(), &record([("age", Value::Null)]), false).unwrap();
        assert_eq!(out["p_age"], Value::Null);
    }

    #[test]
    fn test_empty_string_coerced_when_nullable() {
        let schema = Schema::new("p").column("nick", ColumnDef::new(DataType::VarChar).length(10));
        let out = strict().prepare(&schema, &record([("nick", "")]), false).unwrap();
        assert_eq!(out["p_nick"], Value::Null);
    }

    #[test]
    fn test_empty_string_kept_when_not_null() {
        let out = strict().prepare(&people(), &record([("name", "")]), false).unwrap();
        assert_eq!(out["p_name"], Value::from(""));
    }

    #[test]
    fn test_string_type_mismatch() {
        let result = strict().prepare(&people(), &record([("name", 5)]), false);
        assert_eq!(code_of(result), SchemaErrorCode::TypeMismatch);
    }

    #[test]
    fn test_schema_length_inclusive() {
        let ok = strict().prepare(&people(), &record([("name", "abcdefghij")]), false);
        assert!(ok.is_ok());
        let result = strict().prepare(&people(), &record([("name", "abcdefghijk")]), false);
        assert_eq!(code_of(result), SchemaErrorCode::LengthExceeded);
    }

    #[test]
    fn test_catalog_length_exclusive() {
        let schema = Schema::new("p").column("bio", ColumnDef::new(DataType::VarChar));
        let ok = strict().prepare(&schema, &record([("bio", "x".repeat(255))]), false);
        assert!(ok.is_ok());
        let result = strict().prepare(&schema, &record([("bio", "x".repeat(256))]), false);
        assert_eq!(code_of(result), SchemaErrorCode::LengthExceeded);
    }

    #[test]
    fn test_fixed_length_uses_declared_length() {
        let schema = Schema::new("p").column("note", ColumnDef::new(DataType::TinyText).length(3));
        assert!(strict().prepare(&schema, &record([("note", "abc")]), false).is_ok());
        let result = strict().prepare(&schema, &record([("note", "abcd")]), false);
        assert_eq!(code_of(result), SchemaErrorCode::LengthExceeded);
    }

    #[test]
    fn test_enum_membership_is_exact() {
        let schema = Schema::new("p").column("state", ColumnDef::new(DataType::Enum).values(&["on", "off"]));
        assert!(strict().prepare(&schema, &record([("state", "on")]), false).is_ok());
        let result = strict().prepare(&schema, &record([("state", "ON")]), false);
        assert_eq!(code_of(result), SchemaErrorCode::InvalidEnumValue);
    }

    #[test]
    fn test_enum_without_values() {
        let schema = Schema::new("p").column("state", ColumnDef::new(DataType::Enum).length(3));
        let result = strict().prepare(&schema, &record([("state", "on")]), false);
        assert_eq!(code_of(result), SchemaErrorCode::SchemaEnumMissing);
    }

    #[test]
    fn test_numeric_type_mismatch() {
        let result = strict().prepare(&people(), &record([("age", "30")]), false);
        assert_eq!(code_of(result), SchemaErrorCode::TypeMismatch);
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        let result = strict().prepare(&people(), &record([("age", -1)]), false);
        assert_eq!(code_of(result), SchemaErrorCode::NegativeUnsigned);
        assert!(strict().prepare(&people(), &record([("age", 0)]), false).is_ok());
    }

    #[test]
    fn test_numeric_declared_bound() {
        let schema = Schema::new("p").column("n", ColumnDef::new(DataType::Int).length(100));
        assert!(strict().prepare(&schema, &record([("n", 100)]), false).is_ok());
        let result = strict().prepare(&schema, &record([("n", 101)]), false);
        assert_eq!(code_of(result), SchemaErrorCode::LengthExceeded);
    }

    #[test]
    fn test_numeric_catalog_bound() {
        let schema = Schema::new("p").column("n", ColumnDef::new(DataType::TinyInt));
        assert!(strict().prepare(&schema, &record([("n", 255)]), false).is_ok());
        let result = strict().prepare(&schema, &record([("n", 256)]), false);
        assert_eq!(code_of(result), SchemaErrorCode::LengthExceeded);
    }

    #[test]
    fn test_scaled_requires_precision() {
        let schema = Schema::new("p").column("price", ColumnDef::new(DataType::Decimal).length(10));
        let result = strict().prepare(&schema, &record([("price", 9.99)]), false);
        assert_eq!(code_of(result), SchemaErrorCode::InvalidPrecisionSpec);

        let schema = Schema::new("p").column("price", ColumnDef::new(DataType::Decimal).precision(4, 2));
        let out = strict().prepare(&schema, &record([("price", 123456.789)]), false).unwrap();
        assert_eq!(out["p_price"], Value::Float(123456.789));
    }

    #[test]
    fn test_dates() {
        let schema = Schema::new("p").column("at", ColumnDef::new(DataType::DateTime));
        assert!(strict().prepare(&schema, &record([("at", "2024-02-29 10:00:00")]), false).is_ok());
        assert!(strict().prepare(&schema, &record([("at", Value::date("2024-02-29"))]), false).is_ok());

        let result = strict().prepare(&schema, &record([("at", "someday")]), false);
        assert_eq!(code_of(result), SchemaErrorCode::InvalidDate);
        let result = strict().prepare(&schema, &record([("at", 20240229)]), false);
        assert_eq!(code_of(result), SchemaErrorCode::InvalidDate);
    }

    #[test]
    fn test_year_accepts_integer() {
        let schema = Schema::new("p").column("year", ColumnDef::new(DataType::Year));
        let out = strict().prepare(&schema, &record([("year", 2024)]), false).unwrap();
        assert_eq!(out["p_year"], Value::Int(2024));
        assert!(strict().prepare(&schema, &record([("year", "2024")]), false).is_ok());

        for bad in [24, -202, 20240] {
            let result = strict().prepare(&schema, &record([("year", bad)]), false);
            assert_eq!(code_of(result), SchemaErrorCode::InvalidDate);
        }
    }

    #[test]
    fn test_defaults_filled() {
        let out = strict().prepare(&people(), &record([("name", "Bob")]), true).unwrap();
        assert_eq!(out["p_age"], Value::Int(0));
        assert_eq!(out["p_name"], Value::from("Bob"));
        let keys: Vec<_> = out.keys().cloned().collect();
        assert_eq!(keys, vec!["p_age", "p_name"]);
    }

    #[test]
    fn test_invalid_default_fails_everything() {
        // name is NOT NULL without default
        let result = strict().prepare(&people(), &record([("age", 3)]), true);
        let err = result.unwrap_err();
        let err = err.schema_error().unwrap();
        assert_eq!(err.code(), SchemaErrorCode::NullNotAllowed);
        assert_eq!(err.column(), Some("name"));
    }

    #[test]
    fn test_defaults_not_applied_on_update() {
        let out = strict().prepare(&people(), &record([("name", "Bob")]), false).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_lenient_collapses() {
        let lenient = Preparer::new("p_", ValidationMode::Lenient);
        let result = lenient.prepare(&people(), &record([("age", -5)]), false);
        assert!(matches!(result, Err(PrepareError::Rejected)));

        let out = lenient.prepare(&people(), &record([("age", 5)]), false).unwrap();
        assert_eq!(out["p_age"], Value::Int(5));
    }

    #[test]
    fn test_input_not_mutated() {
        let input = record([("name", "")]);
        let copy = input.clone();
        let schema = Schema::new("p").column("name", ColumnDef::new(DataType::VarChar));
        let _ = strict().prepare(&schema, &input, true);
        assert_eq!(input, copy);
    }
}
