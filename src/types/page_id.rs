//! Page identifier type.

use serde::Serialize;
use std::fmt;

/// Identifier of a page in a heap file.
///
/// Page ids are dense and 0-indexed: a file with `n` pages holds ids
/// `0..n`. Page `i` occupies bytes `[i * page_size, (i + 1) * page_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct PageId(pub u32);

impl PageId {
    /// Create a new page ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw page ID value
    pub const fn value(self) -> u32 {
        self.0
    }

    /// The page id as an index into the file's page sequence
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Calculate the byte offset of this page in the file
    pub const fn file_offset(self, page_size: usize) -> u64 {
        self.0 as u64 * page_size as u64
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PageId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<PageId> for u32 {
    fn from(id: PageId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PAGE_SIZE;

    #[test]
    fn test_page_id_basics() {
        let id = PageId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.index(), 42);
        assert!(PageId::new(1) < PageId::new(2));
    }

    #[test]
    fn test_page_id_file_offset() {
        let id = PageId::new(3);
        assert_eq!(id.file_offset(PAGE_SIZE), 3 * PAGE_SIZE as u64);
        assert_eq!(PageId::new(0).file_offset(PAGE_SIZE), 0);
    }

    #[test]
    fn test_page_id_display() {
        assert_eq!(format!("{}", PageId::new(42)), "42");
    }
}
