//! Error types for the storage engine.

use thiserror::Error;
use crate::types::{PageId, RecordId};

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur in the storage engine
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error from the underlying file system
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Page id is past the end of the file
    #[error("Page {page_id} out of range (file has {page_count} pages)")]
    PageOutOfRange { page_id: PageId, page_count: usize },

    /// Slot index is past the last slot of a page
    #[error("Slot {slot} out of range ({slots_per_page} slots per page)")]
    SlotOutOfRange { slot: usize, slots_per_page: usize },

    /// Location does not address a live record
    #[error("Location {0} does not address a record")]
    InvalidLocation(RecordId),

    /// Field index is past the last field of a schema
    #[error("Field index {index} out of range (schema has {field_count} fields)")]
    FieldIndexOutOfRange { index: usize, field_count: usize },

    /// Schema mismatch or malformed schema
    #[error("Schema error: {0}")]
    Schema(String),

    /// Text value does not fit in a fixed-width CHAR field
    #[error("Text for field `{field}` too long: {len} bytes (max: {max})")]
    TextTooLong { field: String, len: usize, max: usize },

    /// Field name lookup failed
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// The addressed slot holds no record
    #[error("No record at {0}")]
    SlotEmpty(RecordId),

    /// Operation is invalid in the current cursor state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// On-disk data does not match the expected format
    #[error("Corruption detected: {0}")]
    Corruption(String),
}

impl StorageError {
    /// Create a schema error with a message
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a corruption error with a message
    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::Corruption(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}
