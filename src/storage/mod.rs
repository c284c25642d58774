//! Storage layer: the heap file and its scan cursors.
//!
//! This module maps page ids to byte ranges of a backing file, inserts and
//! deletes records page by page, and enumerates live records across page
//! boundaries.

mod access_log;
mod cursor;
mod db_file;

pub use access_log::AccessLog;
pub use cursor::{Cursor, Scan};
pub use db_file::{DbFile, FileStats};
