//! Occupancy bitmap.
//!
//! Slot `i` maps to bit `i % 8` (least significant first) of byte `i / 8`.
//! A set bit means the slot holds a record.

/// A view over the bitmap bytes at the start of a page
pub struct Bitmap<'a> {
    bytes: &'a [u8],
    len: usize,
}

impl<'a> Bitmap<'a> {
    /// Wrap `bytes` as a bitmap of `len` bits
    pub fn new(bytes: &'a [u8], len: usize) -> Self {
        debug_assert!(bytes.len() * 8 >= len);
        Self { bytes, len }
    }

    pub fn get(&self, i: usize) -> bool {
        i < self.len && self.bytes[i / 8] & (1 << (i % 8)) != 0
    }

    /// Lowest clear bit at or after `from`
    pub fn first_clear_from(&self, from: usize) -> Option<usize> {
        (from..self.len).find(|&i| !self.get(i))
    }

    /// Lowest set bit at or after `from`
    pub fn first_set_from(&self, from: usize) -> Option<usize> {
        let mut i = from;
        while i < self.len {
            let byte = self.bytes[i / 8] >> (i % 8);
            if byte == 0 {
                // Nothing left in this byte.
                i = (i / 8 + 1) * 8;
                continue;
            }
            let found = i + byte.trailing_zeros() as usize;
            return (found < self.len).then_some(found);
        }
        None
    }

    /// Number of set bits
    pub fn count_set(&self) -> usize {
        (0..self.len).filter(|&i| self.get(i)).count()
    }

    /// Iterate over the indexes of set bits in increasing order
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.get(i))
    }

    /// Set bit `i` in `bytes`
    pub fn set(bytes: &mut [u8], i: usize) {
        bytes[i / 8] |= 1 << (i % 8);
    }

    /// Clear bit `i` in `bytes`
    pub fn clear(bytes: &mut [u8], i: usize) {
        bytes[i / 8] &= !(1 << (i % 8));
    }
}
