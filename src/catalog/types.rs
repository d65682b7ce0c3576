//! Datatype definitions and their catalog entries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::schema::{SchemaError, SchemaResult};

/// Coarse value category of a datatype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbstractType {
    /// Character and binary strings, enumerations
    String,
    /// Integers, fixed and floating point numbers
    Numeric,
    /// Dates, times and years
    Date,
}

impl AbstractType {
    /// Returns the name used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            AbstractType::String => "string",
            AbstractType::Numeric => "number",
            AbstractType::Date => "date",
        }
    }
}

impl fmt::Display for AbstractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A datatype property beyond its abstract type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Column length may be declared per column
    VariableLength,
    /// Column declares precision and scale
    Scaled,
    /// Column holds one of a declared list of values
    Enumerated,
}

/// Set of capabilities carried by a datatype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    variable_length: bool,
    scaled: bool,
    enumerated: bool,
}

impl Capabilities {
    /// Empty capability set
    pub const NONE: Self = Self {
        variable_length: false,
        scaled: false,
        enumerated: false,
    };

    /// Builds a capability set from a list of capabilities
    pub const fn of(caps: &[Capability]) -> Self {
        let mut set = Self::NONE;
        let mut i = 0;
        while i < caps.len() {
            match caps[i] {
                Capability::VariableLength => set.variable_length = true,
                Capability::Scaled => set.scaled = true,
                Capability::Enumerated => set.enumerated = true,
            }
            i += 1;
        }
        set
    }

    /// Returns true if the capability is part of this set
    pub const fn contains(&self, cap: Capability) -> bool {
        match cap {
            Capability::VariableLength => self.variable_length,
            Capability::Scaled => self.scaled,
            Capability::Enumerated => self.enumerated,
        }
    }

    /// Iterates over the capabilities in the set
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        [
            Capability::VariableLength,
            Capability::Scaled,
            Capability::Enumerated,
        ]
        .into_iter()
        .filter(move |cap| self.contains(*cap))
    }
}

/// Storage width class of a datatype, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ByteWidth {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Eight = 8,
}

impl ByteWidth {
    /// Number of bytes in this width class
    pub const fn bytes(self) -> u32 {
        self as u32
    }
}

/// Exclusive upper bound representable in the given width: `2^(8 * width)`.
///
/// Datatypes without a width fall back to a single byte.
pub const fn max_for_width(width: Option<ByteWidth>) -> u128 {
    let bytes = match width {
        Some(w) => w.bytes(),
        None => 1,
    };
    1u128 << (8 * bytes)
}

/// Catalog entry describing a datatype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeEntry {
    pub abstract_type: AbstractType,
    pub capabilities: Capabilities,
    pub byte_width: Option<ByteWidth>,
}

impl TypeEntry {
    const fn new(
        abstract_type: AbstractType,
        capabilities: Capabilities,
        byte_width: Option<ByteWidth>,
    ) -> Self {
        Self {
            abstract_type,
            capabilities,
            byte_width,
        }
    }

    /// Returns true if the entry carries the capability
    pub const fn has(&self, cap: Capability) -> bool {
        self.capabilities.contains(cap)
    }

    /// Default exclusive maximum derived from the byte width
    pub const fn default_max(&self) -> u128 {
        max_for_width(self.byte_width)
    }
}

/// MySQL column datatypes known to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    Char,
    VarChar,
    Binary,
    VarBinary,
    TinyBlob,
    TinyText,
    Blob,
    Text,
    MediumBlob,
    MediumText,
    LongBlob,
    LongText,
    Enum,
    Set,
    Bool,
    Boolean,
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal,
    Numeric,
    Bit,
    Date,
    Time,
    DateTime,
    Timestamp,
    Year,
}

impl DataType {
    /// Every datatype in catalog order
    pub const ALL: [DataType; 32] = [
        DataType::Char,
        DataType::VarChar,
        DataType::Binary,
        DataType::VarBinary,
        DataType::TinyBlob,
        DataType::TinyText,
        DataType::Blob,
        DataType::Text,
        DataType::MediumBlob,
        DataType::MediumText,
        DataType::LongBlob,
        DataType::LongText,
        DataType::Enum,
        DataType::Set,
        DataType::Bool,
        DataType::Boolean,
        DataType::TinyInt,
        DataType::SmallInt,
        DataType::MediumInt,
        DataType::Int,
        DataType::Integer,
        DataType::BigInt,
        DataType::Float,
        DataType::Double,
        DataType::Decimal,
        DataType::Numeric,
        DataType::Bit,
        DataType::Date,
        DataType::Time,
        DataType::DateTime,
        DataType::Timestamp,
        DataType::Year,
    ];

    /// SQL identifier of the datatype
    pub const fn name(&self) -> &'static str {
        match self {
            DataType::Char => "CHAR",
            DataType::VarChar => "VARCHAR",
            DataType::Binary => "BINARY",
            DataType::VarBinary => "VARBINARY",
            DataType::TinyBlob => "TINYBLOB",
            DataType::TinyText => "TINYTEXT",
            DataType::Blob => "BLOB",
            DataType::Text => "TEXT",
            DataType::MediumBlob => "MEDIUMBLOB",
            DataType::MediumText => "MEDIUMTEXT",
            DataType::LongBlob => "LONGBLOB",
            DataType::LongText => "LONGTEXT",
            DataType::Enum => "ENUM",
            DataType::Set => "SET",
            DataType::Bool => "BOOL",
            DataType::Boolean => "BOOLEAN",
            DataType::TinyInt => "TINYINT",
            DataType::SmallInt => "SMALLINT",
            DataType::MediumInt => "MEDIUMINT",
            DataType::Int => "INT",
            DataType::Integer => "INTEGER",
            DataType::BigInt => "BIGINT",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Decimal => "DECIMAL",
            DataType::Numeric => "NUMERIC",
            DataType::Bit => "BIT",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::DateTime => "DATETIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Year => "YEAR",
        }
    }

    /// Catalog entry for the datatype
    pub const fn entry(&self) -> TypeEntry {
        use AbstractType as A;
        use ByteWidth as W;
        use Capability as C;

        const VARLEN: Capabilities = Capabilities::of(&[C::VariableLength]);
        const ENUMERATED: Capabilities = Capabilities::of(&[C::Enumerated]);
        const SCALED: Capabilities = Capabilities::of(&[C::VariableLength, C::Scaled]);
        const NONE: Capabilities = Capabilities::NONE;

        match self {
            DataType::Char | DataType::VarChar | DataType::Binary | DataType::VarBinary => {
                TypeEntry::new(A::String, VARLEN, Some(W::One))
            }
            DataType::TinyBlob | DataType::TinyText => TypeEntry::new(A::String, NONE, Some(W::One)),
            DataType::Blob | DataType::Text => TypeEntry::new(A::String, NONE, Some(W::Two)),
            DataType::MediumBlob | DataType::MediumText => {
                TypeEntry::new(A::String, NONE, Some(W::Three))
            }
            DataType::LongBlob | DataType::LongText => {
                TypeEntry::new(A::String, NONE, Some(W::Four))
            }
            DataType::Enum | DataType::Set => TypeEntry::new(A::String, ENUMERATED, None),
            DataType::Bool | DataType::Boolean | DataType::TinyInt => {
                TypeEntry::new(A::Numeric, NONE, Some(W::One))
            }
            DataType::SmallInt => TypeEntry::new(A::Numeric, NONE, Some(W::Two)),
            DataType::MediumInt => TypeEntry::new(A::Numeric, NONE, Some(W::Three)),
            DataType::Int | DataType::Integer => TypeEntry::new(A::Numeric, VARLEN, Some(W::Four)),
            DataType::BigInt => TypeEntry::new(A::Numeric, NONE, Some(W::Eight)),
            DataType::Float => TypeEntry::new(A::Numeric, NONE, Some(W::Four)),
            DataType::Double => TypeEntry::new(A::Numeric, NONE, Some(W::Eight)),
            DataType::Decimal | DataType::Numeric => {
                TypeEntry::new(A::Numeric, SCALED, Some(W::Eight))
            }
            DataType::Bit => TypeEntry::new(A::Numeric, VARLEN, None),
            DataType::Date
            | DataType::Time
            | DataType::DateTime
            | DataType::Timestamp
            | DataType::Year => TypeEntry::new(A::Date, NONE, None),
        }
    }

    /// Shorthand for the abstract type of the datatype
    pub const fn abstract_type(&self) -> AbstractType {
        self.entry().abstract_type
    }

    /// Resolves a datatype identifier, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `ROWGUARD_UNKNOWN_TYPE` if the identifier is not registered.
    pub fn resolve(name: &str) -> SchemaResult<Self> {
        name.parse()
    }
}

impl FromStr for DataType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DataType::ALL
            .iter()
            .copied()
            .find(|dt| dt.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SchemaError::unknown_type(wanted))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
