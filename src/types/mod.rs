//! Common types used throughout the storage engine.

mod page_id;
mod record_id;

pub use page_id::PageId;
pub use record_id::RecordId;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Default page size in bytes (4KB)
pub const PAGE_SIZE: usize = 4096;

/// Width of an INT field in bytes
pub const INT_WIDTH: usize = 4;

/// Width of a DOUBLE field in bytes
pub const DOUBLE_WIDTH: usize = 8;

/// Width of a fixed-length CHAR field in bytes
pub const CHAR_WIDTH: usize = 64;

/// Field types
///
/// Every type has a fixed on-disk width, so a schema fully determines the
/// byte layout of its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 32-bit signed integer, little-endian
    Int,
    /// 64-bit IEEE 754 float, little-endian
    Double,
    /// UTF-8 text, NUL padded to `CHAR_WIDTH` bytes
    Char,
}

impl FieldType {
    /// Number of bytes a value of this type occupies in a record
    pub const fn width(self) -> usize {
        match self {
            Self::Int => INT_WIDTH,
            Self::Double => DOUBLE_WIDTH,
            Self::Char => CHAR_WIDTH,
        }
    }

    /// Lowercase name, as accepted by `FromStr`
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::Char => "char",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "int" => Ok(Self::Int),
            "double" => Ok(Self::Double),
            "char" => Ok(Self::Char),
            other => Err(format!("unknown field type: {}", other)),
        }
    }
}
