//! Record location type.

use crate::types::PageId;
use serde::Serialize;
use std::fmt;

/// Location of a record: the page holding it and the slot within that page.
///
/// Ordering is lexicographic on `(page_id, slot)`, which is the order a scan
/// visits records in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RecordId {
    pub page_id: PageId,
    pub slot: usize,
}

impl RecordId {
    pub const fn new(page_id: PageId, slot: usize) -> Self {
        Self { page_id, slot }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.page_id, self.slot)
    }
}
