//! # Heap Storage Engine
//!
//! A minimal on-disk heap file of fixed-width records.
//!
//! ## Architecture
//!
//! - **Record Layer** (`record`): typed field values, tuples, and the
//!   `TupleDesc` schema that assigns each field a fixed byte offset
//! - **Page Layer** (`page`): fixed-size pages of record slots with an
//!   occupancy bitmap
//! - **Storage Layer** (`storage`): the page-addressed `DbFile` plus cursors
//!   that scan live records in `(page, slot)` order
//!
//! Every operation goes straight to disk with positioned I/O. There is no
//! buffer pool, no file header, and no write-ahead log.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use heap_storage::{DbFile, Field, FieldType, Tuple, TupleDesc};
//!
//! let desc = TupleDesc::from_fields([
//!     (FieldType::Int, "id"),
//!     (FieldType::Char, "name"),
//! ])?;
//! let mut file = DbFile::create_or_open("people.db", desc)?;
//!
//! let rid = file.insert_tuple(&Tuple::new(vec![Field::Int(1), Field::from("ada")]))?;
//! assert_eq!(file.get_tuple(rid)?.field(1), Some(&Field::from("ada")));
//!
//! for result in file.scan() {
//!     let (rid, tuple) = result?;
//!     println!("{} -> {}", rid, tuple);
//! }
//!
//! file.delete_tuple(rid)?;
//! ```

pub mod error;
pub mod page;
pub mod record;
pub mod storage;
pub mod types;

pub use error::{Result, StorageError};
pub use types::{FieldType, PageId, RecordId, CHAR_WIDTH, PAGE_SIZE};

// Re-export main public API
pub use page::{HeapPage, PageLayout};
pub use record::{Field, Tuple, TupleDesc};
pub use storage::{AccessLog, Cursor, DbFile, FileStats, Scan};

use std::path::PathBuf;

/// Heap file configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the heap file
    pub path: PathBuf,
    /// Page size in bytes (default: 4096)
    pub page_size: usize,
    /// Whether to sync each page write immediately (default: false)
    pub sync_on_write: bool,
}

impl Config {
    /// Create a new configuration with default settings
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            page_size: PAGE_SIZE,
            sync_on_write: false,
        }
    }

    /// Set page size
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Enable sync on write for durability
    pub fn sync_on_write(mut self, enabled: bool) -> Self {
        self.sync_on_write = enabled;
        self
    }
}
