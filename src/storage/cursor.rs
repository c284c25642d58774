//! Scan cursors over a heap file.
//!
//! Two ways to walk the live records of a [`DbFile`]:
//! - [`Cursor`]: an explicit position driven by `DbFile::begin`/`next`/`end`
//! - [`Scan`]: a Rust iterator that reads each page once and yields every
//!   live record with its location
//!
//! Both visit records in increasing `(page_id, slot)` order and skip free
//! slots.

use crate::error::{Result, StorageError};
use crate::page::HeapPage;
use crate::record::Tuple;
use crate::storage::DbFile;
use crate::types::{PageId, RecordId};

/// Position of a scan
///
/// `Active` always points at an occupied slot as of the last time the cursor
/// moved. `Done` is the past-the-end sentinel returned by `DbFile::end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Active(RecordId),
    Done,
}

impl Cursor {
    /// Location of the current record
    pub fn record_id(&self) -> Result<RecordId> {
        match self {
            Self::Active(rid) => Ok(*rid),
            Self::Done => Err(StorageError::invalid_state("cursor is past the end")),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Iterator over all live records of a file
pub struct Scan<'a> {
    file: &'a DbFile,
    /// Page currently being walked
    current: Option<(PageId, HeapPage)>,
    /// Next slot to inspect in `current`
    slot: usize,
    /// Index of the next page to load
    next_page: usize,
    done: bool,
}

impl<'a> Scan<'a> {
    pub(crate) fn new(file: &'a DbFile) -> Self {
        Self {
            file,
            current: None,
            slot: 0,
            next_page: 0,
            done: false,
        }
    }
}

impl Iterator for Scan<'_> {
    type Item = Result<(RecordId, Tuple)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if let Some((page_id, page)) = &self.current {
                if let Some(slot) = page.next_occupied(self.slot) {
                    self.slot = slot + 1;
                    let rid = RecordId::new(*page_id, slot);
                    let item = match page.get_slot(slot) {
                        Ok(Some(tuple)) => Ok((rid, tuple)),
                        Ok(None) => Err(StorageError::SlotEmpty(rid)),
                        Err(e) => Err(e),
                    };
                    if item.is_err() {
                        self.done = true;
                    }
                    return Some(item);
                }
            }

            if self.next_page >= self.file.num_pages() {
                self.done = true;
                self.current = None;
                return None;
            }

            let page_id = PageId::new(self.next_page as u32);
            self.next_page += 1;
            match self.file.read_page(page_id) {
                Ok(page) => {
                    self.current = Some((page_id, page));
                    self.slot = 0;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Field, TupleDesc};
    use crate::types::FieldType;
    use tempfile::tempdir;

    fn open(path: &std::path::Path) -> Result<DbFile> {
        let desc = TupleDesc::from_fields([(FieldType::Int, "id"), (FieldType::Char, "tag")])?;
        DbFile::create_or_open(path, desc)
    }

    fn row(id: i32) -> Tuple {
        Tuple::new(vec![Field::Int(id), Field::Char(format!("t{}", id))])
    }

    #[test]
    fn test_cursor_done_state() -> Result<()> {
        let dir = tempdir().unwrap();
        let file = open(&dir.path().join("empty.db"))?;

        let mut cursor = file.begin()?;
        assert_eq!(cursor, file.end());
        assert!(cursor.is_done());
        assert!(matches!(cursor.record_id(), Err(StorageError::InvalidState(_))));
        assert!(matches!(file.tuple_at(&cursor), Err(StorageError::InvalidState(_))));
        assert!(matches!(file.next(&mut cursor), Err(StorageError::InvalidState(_))));
        Ok(())
    }

    #[test]
    fn test_cursor_walks_in_order() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut file = open(&dir.path().join("walk.db"))?;
        let per_page = file.slots_per_page();

        for i in 0..(per_page + 3) as i32 {
            file.insert_tuple(&row(i))?;
        }
        file.delete_tuple(RecordId::new(PageId::new(0), 1))?;
        file.delete_tuple(RecordId::new(PageId::new(1), 0))?;

        let mut seen = Vec::new();
        let mut cursor = file.begin()?;
        while cursor != file.end() {
            seen.push((cursor.record_id()?, file.tuple_at(&cursor)?));
            file.next(&mut cursor)?;
        }

        assert_eq!(seen.len(), per_page + 1);
        assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(seen.iter().all(|(rid, _)| *rid != RecordId::new(PageId::new(0), 1)));
        assert!(seen.iter().all(|(rid, _)| *rid != RecordId::new(PageId::new(1), 0)));
        assert_eq!(seen[1].1, row(2));
        Ok(())
    }

    #[test]
    fn test_next_rejects_out_of_range_cursor() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut file = open(&dir.path().join("bounds.db"))?;
        file.insert_tuple(&row(1))?;
        assert_eq!(file.num_pages(), 1);

        let mut past_file = Cursor::Active(RecordId::new(PageId::new(9), 0));
        assert!(matches!(
            file.next(&mut past_file),
            Err(StorageError::PageOutOfRange { .. })
        ));
        assert_eq!(past_file, Cursor::Active(RecordId::new(PageId::new(9), 0)));

        let slots = file.slots_per_page();
        let mut past_page = Cursor::Active(RecordId::new(PageId::new(0), slots));
        assert!(matches!(
            file.next(&mut past_page),
            Err(StorageError::SlotOutOfRange { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_scan_matches_cursor() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut file = open(&dir.path().join("scan.db"))?;

        for i in 0..(2 * file.slots_per_page() + 5) as i32 {
            file.insert_tuple(&row(i))?;
        }
        for slot in (0..file.slots_per_page()).step_by(3) {
            file.delete_tuple(RecordId::new(PageId::new(1), slot))?;
        }

        let scanned: Vec<(RecordId, Tuple)> = file.scan().collect::<Result<_>>()?;

        let mut walked = Vec::new();
        let mut cursor = file.begin()?;
        while !cursor.is_done() {
            walked.push((cursor.record_id()?, file.tuple_at(&cursor)?));
            file.next(&mut cursor)?;
        }

        assert_eq!(scanned, walked);
        Ok(())
    }

    #[test]
    fn test_scan_reads_each_page_once() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut file = open(&dir.path().join("reads.db"))?;

        for i in 0..(2 * file.slots_per_page() + 1) as i32 {
            file.insert_tuple(&row(i))?;
        }
        assert_eq!(file.num_pages(), 3);

        let before = file.reads().len();
        let count = file.scan().count();
        assert_eq!(count, 2 * file.slots_per_page() + 1);

        let reads = file.reads();
        assert_eq!(
            &reads[before..],
            &[PageId::new(0), PageId::new(1), PageId::new(2)]
        );
        Ok(())
    }

    #[test]
    fn test_scan_skips_empty_pages() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut file = open(&dir.path().join("holes.db"))?;
        let per_page = file.slots_per_page();

        let mut last = None;
        for i in 0..(2 * per_page + 1) as i32 {
            last = Some(file.insert_tuple(&row(i))?);
        }
        for slot in 0..per_page {
            file.delete_tuple(RecordId::new(PageId::new(0), slot))?;
            file.delete_tuple(RecordId::new(PageId::new(1), slot))?;
        }

        let rids: Vec<RecordId> = file
            .scan()
            .map(|r| r.map(|(rid, _)| rid))
            .collect::<Result<_>>()?;
        assert_eq!(rids, vec![last.unwrap()]);
        assert_eq!(file.begin()?, Cursor::Active(RecordId::new(PageId::new(2), 0)));
        Ok(())
    }
}
