//! Page layer: fixed-size blocks of fixed-width record slots.
//!
//! Every page of a heap file has the same layout, determined by the record
//! width of the file's schema and the page size:
//! - An occupancy bitmap, one bit per slot
//! - `slots_per_page` record slots, each exactly one record wide
//! - Unused tail bytes, if any, which are never read

mod bitmap;
mod heap;

pub use bitmap::Bitmap;
pub use heap::HeapPage;

use crate::error::{Result, StorageError};
use crate::record::TupleDesc;
use std::sync::Arc;

/// Geometry shared by every page of a file
///
/// For a record width `w` and page size `p`:
/// ```text
/// slots_per_page = floor(8 * p / (8 * w + 1))
/// bitmap_len     = ceil(slots_per_page / 8)
/// slot i         = [bitmap_len + i * w, bitmap_len + (i + 1) * w)
/// ```
#[derive(Debug, Clone)]
pub struct PageLayout {
    desc: Arc<TupleDesc>,
    page_size: usize,
    slots_per_page: usize,
    bitmap_len: usize,
}

impl PageLayout {
    /// Compute the layout for `desc` on pages of `page_size` bytes
    ///
    /// Fails if the schema has zero width or a single record does not fit.
    pub fn new(desc: Arc<TupleDesc>, page_size: usize) -> Result<Self> {
        let width = desc.length();
        if width == 0 {
            return Err(StorageError::schema("record width is zero"));
        }

        let slots_per_page = 8 * page_size / (8 * width + 1);
        if slots_per_page == 0 {
            return Err(StorageError::schema(format!(
                "record of {} bytes does not fit in a {} byte page",
                width, page_size
            )));
        }

        Ok(Self {
            desc,
            page_size,
            slots_per_page,
            bitmap_len: slots_per_page.div_ceil(8),
        })
    }

    pub fn desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn slots_per_page(&self) -> usize {
        self.slots_per_page
    }

    /// Size of the occupancy bitmap in bytes
    pub fn bitmap_len(&self) -> usize {
        self.bitmap_len
    }

    /// Width of one slot in bytes
    pub fn record_width(&self) -> usize {
        self.desc.length()
    }

    /// Byte range of `slot` within the page
    pub fn slot_range(&self, slot: usize) -> std::ops::Range<usize> {
        let start = self.bitmap_len + slot * self.record_width();
        start..start + self.record_width()
    }

    /// Fail unless `slot` addresses a slot of this layout
    pub fn check_slot(&self, slot: usize) -> Result<()> {
        if slot >= self.slots_per_page {
            return Err(StorageError::SlotOutOfRange {
                slot,
                slots_per_page: self.slots_per_page,
            });
        }
        Ok(())
    }
}
