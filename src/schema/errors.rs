//! Schema error types
//!
//! Every validation failure carries a stable error code and, where it
//! applies, the offending column.
//!
//! Error codes:
//! - ROWGUARD_MISSING_SCHEMA (DEFECT)
//! - ROWGUARD_UNDEFINED_COLUMN (REJECT)
//! - ROWGUARD_NULL_PRIMARY_KEY (REJECT)
//! - ROWGUARD_NULL_NOT_ALLOWED (REJECT)
//! - ROWGUARD_TYPE_MISMATCH (REJECT)
//! - ROWGUARD_INVALID_ENUM_VALUE (REJECT)
//! - ROWGUARD_SCHEMA_ENUM_MISSING (DEFECT)
//! - ROWGUARD_LENGTH_EXCEEDED (REJECT)
//! - ROWGUARD_NEGATIVE_UNSIGNED (REJECT)
//! - ROWGUARD_INVALID_PRECISION_SPEC (DEFECT)
//! - ROWGUARD_INVALID_DATE (REJECT)
//! - ROWGUARD_INVALID_AUTO_INCREMENT_TYPE (DEFECT)
//! - ROWGUARD_UNKNOWN_TYPE (DEFECT)
//! - ROWGUARD_MALFORMED_SCHEMA (DEFECT)
//! - ROWGUARD_DUPLICATE_SCHEMA (DEFECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The record was rejected; the schema is fine
    Reject,
    /// The schema definition itself is unusable
    Defect,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Defect => write!(f, "DEFECT"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaErrorCode {
    /// Schema has no columns
    MissingSchema,
    /// Record names a column the schema does not define
    UndefinedColumn,
    /// Null value for a primary key without auto-increment
    NullPrimaryKey,
    /// Null value for a NOT NULL column
    NullNotAllowed,
    /// Value does not match the column's abstract type
    TypeMismatch,
    /// Value is not one of the enumerated values
    InvalidEnumValue,
    /// Enumerated column declares no values
    SchemaEnumMissing,
    /// Value is longer or larger than allowed
    LengthExceeded,
    /// Negative value for an unsigned column
    NegativeUnsigned,
    /// Scaled column declares a plain length instead of precision and scale
    InvalidPrecisionSpec,
    /// Value is not a date or time
    InvalidDate,
    /// Auto-increment column is not numeric
    InvalidAutoIncrementType,
    /// Datatype identifier not in the catalog
    UnknownType,
    /// Schema file cannot be read or parsed
    MalformedSchema,
    /// Schema for the table is already registered
    DuplicateSchema,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::MissingSchema => "ROWGUARD_MISSING_SCHEMA",
            SchemaErrorCode::UndefinedColumn => "ROWGUARD_UNDEFINED_COLUMN",
            SchemaErrorCode::NullPrimaryKey => "ROWGUARD_NULL_PRIMARY_KEY",
            SchemaErrorCode::NullNotAllowed => "ROWGUARD_NULL_NOT_ALLOWED",
            SchemaErrorCode::TypeMismatch => "ROWGUARD_TYPE_MISMATCH",
            SchemaErrorCode::InvalidEnumValue => "ROWGUARD_INVALID_ENUM_VALUE",
            SchemaErrorCode::SchemaEnumMissing => "ROWGUARD_SCHEMA_ENUM_MISSING",
            SchemaErrorCode::LengthExceeded => "ROWGUARD_LENGTH_EXCEEDED",
            SchemaErrorCode::NegativeUnsigned => "ROWGUARD_NEGATIVE_UNSIGNED",
            SchemaErrorCode::InvalidPrecisionSpec => "ROWGUARD_INVALID_PRECISION_SPEC",
            SchemaErrorCode::InvalidDate => "ROWGUARD_INVALID_DATE",
            SchemaErrorCode::InvalidAutoIncrementType => "ROWGUARD_INVALID_AUTO_INCREMENT_TYPE",
            SchemaErrorCode::UnknownType => "ROWGUARD_UNKNOWN_TYPE",
            SchemaErrorCode::MalformedSchema => "ROWGUARD_MALFORMED_SCHEMA",
            SchemaErrorCode::DuplicateSchema => "ROWGUARD_DUPLICATE_SCHEMA",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::MissingSchema
            | SchemaErrorCode::SchemaEnumMissing
            | SchemaErrorCode::InvalidPrecisionSpec
            | SchemaErrorCode::InvalidAutoIncrementType
            | SchemaErrorCode::UnknownType
            | SchemaErrorCode::MalformedSchema
            | SchemaErrorCode::DuplicateSchema => Severity::Defect,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What was expected of a value and what was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, got {}", self.expected, self.actual)
    }
}

/// Schema error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    column: Option<String>,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, message: String, column: Option<String>) -> Self {
        Self {
            code,
            message,
            column,
            details: None,
        }
    }

    fn with_details(mut self, details: ValidationDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Schema has no columns
    pub fn missing_schema(table: &str) -> Self {
        Self::new(
            SchemaErrorCode::MissingSchema,
            format!("Schema for table '{}' is not defined", table),
            None,
        )
    }

    /// Record names an unknown column
    pub fn undefined_column(column: &str) -> Self {
        Self::new(
            SchemaErrorCode::UndefinedColumn,
            format!("Column '{}' is not defined in schema", column),
            Some(column.into()),
        )
    }

    /// Null primary key value
    pub fn null_primary_key(column: &str) -> Self {
        Self::new(
            SchemaErrorCode::NullPrimaryKey,
            format!("Primary key value cannot be null for column '{}'", column),
            Some(column.into()),
        )
    }

    /// Null value for NOT NULL column
    pub fn null_not_allowed(column: &str) -> Self {
        Self::new(
            SchemaErrorCode::NullNotAllowed,
            format!("Value cannot be null for column '{}'", column),
            Some(column.into()),
        )
    }

    /// Value of the wrong abstract type
    pub fn type_mismatch(column: &str, expected: &str, actual: &str) -> Self {
        Self::new(
            SchemaErrorCode::TypeMismatch,
            format!("Value for column '{}' must be a {}", column, expected),
            Some(column.into()),
        )
        .with_details(ValidationDetails::new(expected, actual))
    }

    /// Value outside the enumeration
    pub fn invalid_enum_value(column: &str, value: &str) -> Self {
        Self::new(
            SchemaErrorCode::InvalidEnumValue,
            format!("Enum value '{}' given for column '{}' is not in schema", value, column),
            Some(column.into()),
        )
        .with_details(ValidationDetails::new("one of the enumerated values", value))
    }

    /// Enumerated column without values
    pub fn schema_enum_missing(column: &str) -> Self {
        Self::new(
            SchemaErrorCode::SchemaEnumMissing,
            format!("Schema definition for '{}' does not enumerate possible values", column),
            Some(column.into()),
        )
    }

    /// Value exceeds the length declared in the schema
    pub fn length_exceeded_schema(column: &str, limit: f64, actual: impl fmt::Display) -> Self {
        Self::new(
            SchemaErrorCode::LengthExceeded,
            format!("Value for column '{}' exceeds maximum length specified in schema", column),
            Some(column.into()),
        )
        .with_details(ValidationDetails::new(format!("at most {}", limit), actual.to_string()))
    }

    /// Value exceeds the maximum of the datatype
    pub fn length_exceeded_type(column: &str, max: u128, actual: impl fmt::Display) -> Self {
        Self::new(
            SchemaErrorCode::LengthExceeded,
            format!("Value for column '{}' exceeds maximum length for its datatype", column),
            Some(column.into()),
        )
        .with_details(ValidationDetails::new(format!("less than {}", max), actual.to_string()))
    }

    /// Negative value for unsigned column
    pub fn negative_unsigned(column: &str, value: f64) -> Self {
        Self::new(
            SchemaErrorCode::NegativeUnsigned,
            format!("Value cannot be negative for unsigned column '{}'", column),
            Some(column.into()),
        )
        .with_details(ValidationDetails::new("a non-negative number", value.to_string()))
    }

    /// Scaled column without precision and scale
    pub fn invalid_precision_spec(column: &str) -> Self {
        Self::new(
            SchemaErrorCode::InvalidPrecisionSpec,
            format!(
                "Schema does not declare precision and scale for the column '{}'",
                column
            ),
            Some(column.into()),
        )
    }

    /// Value not a date or time
    pub fn invalid_date(column: &str, actual: &str) -> Self {
        Self::new(
            SchemaErrorCode::InvalidDate,
            format!("Value for column '{}' is not a correct date/time", column),
            Some(column.into()),
        )
        .with_details(ValidationDetails::new("a date/time string", actual))
    }

    /// Non-numeric auto-increment column
    pub fn invalid_auto_increment_type(column: &str) -> Self {
        Self::new(
            SchemaErrorCode::InvalidAutoIncrementType,
            format!(
                "Column '{}' cannot be auto-increment if its data type is not numeric",
                column
            ),
            Some(column.into()),
        )
    }

    /// Datatype identifier not in catalog
    pub fn unknown_type(name: &str) -> Self {
        Self::new(
            SchemaErrorCode::UnknownType,
            format!("Datatype '{}' is not registered in the type catalog", name),
            None,
        )
    }

    /// Unreadable or invalid schema file
    pub fn malformed_schema(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::MalformedSchema,
            format!("Malformed schema '{}': {}", source.into(), reason.into()),
            None,
        )
    }

    /// Table registered twice
    pub fn duplicate_schema(table: &str) -> Self {
        Self::new(
            SchemaErrorCode::DuplicateSchema,
            format!("Schema for table '{}' is already registered", table),
            None,
        )
    }

    /// Attaches the column an error refers to, keeping an existing one
    pub fn for_column(mut self, column: &str) -> Self {
        if self.column.is_none() {
            self.column = Some(column.into());
        }
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending column if applicable
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }

    /// Returns whether the schema itself is at fault
    pub fn is_defect(&self) -> bool {
        self.severity() == Severity::Defect
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::MissingSchema.code(), "ROWGUARD_MISSING_SCHEMA");
        assert_eq!(SchemaErrorCode::UndefinedColumn.code(), "ROWGUARD_UNDEFINED_COLUMN");
        assert_eq!(SchemaErrorCode::LengthExceeded.code(), "ROWGUARD_LENGTH_EXCEEDED");
        assert_eq!(SchemaErrorCode::UnknownType.code(), "ROWGUARD_UNKNOWN_TYPE");
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(SchemaErrorCode::NullNotAllowed.severity(), Severity::Reject);
        assert_eq!(SchemaErrorCode::TypeMismatch.severity(), Severity::Reject);
        assert_eq!(SchemaErrorCode::SchemaEnumMissing.severity(), Severity::Defect);
        assert_eq!(SchemaErrorCode::InvalidAutoIncrementType.severity(), Severity::Defect);
    }

    #[test]
    fn test_error_carries_column() {
        let err = SchemaError::null_not_allowed("email");
        assert_eq!(err.column(), Some("email"));
        assert_eq!(err.code(), SchemaErrorCode::NullNotAllowed);
        assert!(!err.is_defect());
    }

    #[test]
    fn test_display_includes_details() {
        let err = SchemaError::type_mismatch("age", "number", "string");
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("ROWGUARD_TYPE_MISMATCH"));
        assert!(display.contains("age"));
        assert!(display.contains("expected number, got string"));
    }

    #[test]
    fn test_for_column_keeps_existing() {
        let err = SchemaError::unknown_type("JSONB").for_column("payload");
        assert_eq!(err.column(), Some("payload"));

        let err = SchemaError::null_not_allowed("a").for_column("b");
        assert_eq!(err.column(), Some("a"));
    }
}
