//! Page access log.
//!
//! Every positioned page read and write performed by a [`DbFile`] is
//! appended here, one entry per call, in call order. Tests use it to assert
//! on I/O patterns, e.g. that a scan touches each page exactly once.
//!
//! [`DbFile`]: crate::storage::DbFile

use crate::types::PageId;

/// Append-only record of page ids read and written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessLog {
    reads: Vec<PageId>,
    writes: Vec<PageId>,
}

impl AccessLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_read(&mut self, page_id: PageId) {
        self.reads.push(page_id);
    }

    pub(crate) fn record_write(&mut self, page_id: PageId) {
        self.writes.push(page_id);
    }

    /// Page ids read, in order
    pub fn reads(&self) -> &[PageId] {
        &self.reads
    }

    /// Page ids written, in order
    pub fn writes(&self) -> &[PageId] {
        &self.writes
    }
}
