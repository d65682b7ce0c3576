//! Column-level flags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    #[serde(rename = "PK")]
    PrimaryKey,
    #[serde(rename = "NN")]
    NotNull,
    #[serde(rename = "UN")]
    Unsigned,
    #[serde(rename = "AI")]
    AutoIncrement,
}

impl Flag {
    /// Canonical ordering used when rendering flag combinations
    pub const ORDER: [Flag; 4] = [
        Flag::PrimaryKey,
        Flag::AutoIncrement,
        Flag::NotNull,
        Flag::Unsigned,
    ];

    /// Short code of the flag
    pub fn code(&self) -> &'static str {
        match self {
            Flag::PrimaryKey => "PK",
            Flag::NotNull => "NN",
            Flag::Unsigned => "UN",
            Flag::AutoIncrement => "AI",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Combination of column flags.
///
/// Serialized as a list of flag codes, e.g. `["PK", "AI"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Flag>", into = "Vec<Flag>")]
pub struct ColumnFlags {
    primary_key: bool,
    not_null: bool,
    unsigned: bool,
    auto_increment: bool,
}

impl ColumnFlags {
    /// No flags set
    pub const NONE: Self = Self {
        primary_key: false,
        not_null: false,
        unsigned: false,
        auto_increment: false,
    };

    /// Builds a flag set from a list of flags
    pub fn new(flags: &[Flag]) -> Self {
        flags.iter().copied().collect()
    }

    /// Returns a copy with the flag added
    pub fn with(mut self, flag: Flag) -> Self {
        self.insert(flag);
        self
    }

    /// Adds a flag
    pub fn insert(&mut self, flag: Flag) {
        match flag {
            Flag::PrimaryKey => self.primary_key = true,
            Flag::NotNull => self.not_null = true,
            Flag::Unsigned => self.unsigned = true,
            Flag::AutoIncrement => self.auto_increment = true,
        }
    }

    /// Returns true if the flag is set
    pub fn contains(&self, flag: Flag) -> bool {
        match flag {
            Flag::PrimaryKey => self.primary_key,
            Flag::NotNull => self.not_null,
            Flag::Unsigned => self.unsigned,
            Flag::AutoIncrement => self.auto_increment,
        }
    }

    /// Returns true if no flag is set
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Iterates over set flags in canonical order
    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        Flag::ORDER.into_iter().filter(move |flag| self.contains(*flag))
    }
}

impl FromIterator<Flag> for ColumnFlags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut flags = ColumnFlags::NONE;
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

impl From<Vec<Flag>> for ColumnFlags {
    fn from(flags: Vec<Flag>) -> Self {
        flags.into_iter().collect()
    }
}

impl From<ColumnFlags> for Vec<Flag> {
    fn from(flags: ColumnFlags) -> Self {
        flags.iter().collect()
    }
}

impl fmt::Display for ColumnFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NULL");
        }
        let codes: Vec<_> = self.iter().map(|flag| flag.code()).collect();
        f.write_str(&codes.join("+"))
    }
}
