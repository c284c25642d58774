//! Heap page implementation.
//!
//! A heap page packs fixed-width records into slots:
//! ```text
//! ┌──────────────────┬────────┬────────┬─────┬──────────┬──────┐
//! │ Occupancy bitmap │ slot 0 │ slot 1 │ ... │ slot N-1 │ tail │
//! └──────────────────┴────────┴────────┴─────┴──────────┴──────┘
//! ```
//!
//! The bitmap is the only source of truth for occupancy. Bytes of a slot
//! whose bit is clear are never decoded.

use crate::error::{Result, StorageError};
use crate::page::{Bitmap, PageLayout};
use crate::record::Tuple;

/// An in-memory image of one page of a heap file
#[derive(Clone)]
pub struct HeapPage {
    layout: PageLayout,
    data: Box<[u8]>,
}

impl HeapPage {
    /// Create a new zero-filled page (all slots free)
    pub fn new(layout: PageLayout) -> Self {
        let data = vec![0u8; layout.page_size()].into_boxed_slice();
        Self { layout, data }
    }

    /// Wrap raw page bytes
    ///
    /// Only the bitmap is interpreted; slot contents are decoded lazily.
    /// `bytes` must be exactly one page long.
    pub fn from_bytes(layout: PageLayout, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != layout.page_size() {
            return Err(StorageError::corruption(format!(
                "page image is {} bytes, expected {}",
                bytes.len(),
                layout.page_size()
            )));
        }
        let data = bytes.to_vec().into_boxed_slice();
        Ok(Self { layout, data })
    }

    /// The page's exact on-disk image
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn slots_per_page(&self) -> usize {
        self.layout.slots_per_page()
    }

    fn bitmap(&self) -> Bitmap<'_> {
        Bitmap::new(
            &self.data[..self.layout.bitmap_len()],
            self.layout.slots_per_page(),
        )
    }

    /// Check whether `slot` holds a record
    pub fn is_occupied(&self, slot: usize) -> Result<bool> {
        self.layout.check_slot(slot)?;
        Ok(self.bitmap().get(slot))
    }

    /// Decode the record in `slot`, or `None` if the slot is free
    pub fn get_slot(&self, slot: usize) -> Result<Option<Tuple>> {
        if !self.is_occupied(slot)? {
            return Ok(None);
        }
        let bytes = &self.data[self.layout.slot_range(slot)];
        self.layout.desc().deserialize(bytes).map(Some)
    }

    /// Store `tuple` in `slot` and mark it occupied
    ///
    /// The page is unchanged if the tuple does not match the schema.
    pub fn set_slot(&mut self, slot: usize, tuple: &Tuple) -> Result<()> {
        self.layout.check_slot(slot)?;
        let range = self.layout.slot_range(slot);
        self.layout
            .desc()
            .serialize_into(tuple, &mut self.data[range])?;
        Bitmap::set(&mut self.data[..self.layout.bitmap_len()], slot);
        Ok(())
    }

    /// Mark `slot` free; its bytes are left in place
    pub fn clear_slot(&mut self, slot: usize) -> Result<()> {
        self.layout.check_slot(slot)?;
        Bitmap::clear(&mut self.data[..self.layout.bitmap_len()], slot);
        Ok(())
    }

    /// Lowest free slot, or `None` if the page is full
    pub fn first_free_slot(&self) -> Option<usize> {
        self.bitmap().first_clear_from(0)
    }

    /// Lowest occupied slot at or after `from`
    pub fn next_occupied(&self, from: usize) -> Option<usize> {
        self.bitmap().first_set_from(from)
    }

    /// Number of occupied slots
    pub fn live_count(&self) -> usize {
        self.bitmap().count_set()
    }

    /// Indexes of occupied slots in increasing order
    pub fn occupied_slots(&self) -> Vec<usize> {
        self.bitmap().iter_set().collect()
    }
}

impl std::fmt::Debug for HeapPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeapPage")
            .field("page_size", &self.layout.page_size())
            .field("slots_per_page", &self.layout.slots_per_page())
            .field("occupied", &self.occupied_slots())
            .finish()
    }
}
