//! Heap file implementation.
//!
//! A `DbFile` maps dense page ids onto a flat file: page `i` lives at byte
//! offset `i * page_size`, and the file length is always a whole number of
//! pages. There is no file header; the schema is supplied by the caller on
//! every open.
//!
//! The file is opened for each operation and closed when it returns, and all
//! I/O is positioned (`pread`/`pwrite` style), so no seek cursor is shared
//! between calls or between handles on the same path.

use crate::error::{Result, StorageError};
use crate::page::{HeapPage, PageLayout};
use crate::record::{Tuple, TupleDesc};
use crate::storage::{AccessLog, Cursor, Scan};
use crate::types::{PageId, RecordId};
use crate::Config;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// A heap file of fixed-width records
pub struct DbFile {
    /// Path of the backing file
    path: PathBuf,
    /// Page geometry for this file's schema
    layout: PageLayout,
    /// Number of pages in the file (always at least 1)
    num_pages: usize,
    /// Whether to sync after each page write
    sync_on_write: bool,
    /// Pages touched by reads and writes
    log: Mutex<AccessLog>,
}

/// Summary of a heap file's geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub page_count: usize,
    pub page_size: usize,
    pub slots_per_page: usize,
    pub record_width: usize,
}

impl DbFile {
    /// Open or create a heap file
    ///
    /// A missing or empty file is initialized with one zeroed page. An
    /// existing file must be a whole number of pages long.
    pub fn open(config: Config, desc: TupleDesc) -> Result<Self> {
        let layout = PageLayout::new(Arc::new(desc), config.page_size)?;
        let page_size = config.page_size as u64;

        let file = open_file(&config.path, true)?;
        let len = file.metadata()?.len();

        if len % page_size != 0 {
            return Err(StorageError::corruption(format!(
                "{}: file size {} is not a multiple of page size {}",
                config.path.display(),
                len,
                page_size
            )));
        }

        let num_pages = if len == 0 {
            let zeros = vec![0u8; config.page_size];
            write_all_at(&file, &zeros, 0)?;
            file.sync_all()?;
            debug!(path = %config.path.display(), page_size, "created heap file");
            1
        } else {
            page_count(len, page_size)?
        };

        debug!(
            path = %config.path.display(),
            num_pages,
            page_size,
            slots_per_page = layout.slots_per_page(),
            "opened heap file"
        );

        Ok(Self {
            path: config.path,
            layout,
            num_pages,
            sync_on_write: config.sync_on_write,
            log: Mutex::new(AccessLog::new()),
        })
    }

    /// Open or create a heap file with default settings
    pub fn create_or_open<P: Into<PathBuf>>(path: P, desc: TupleDesc) -> Result<Self> {
        Self::open(Config::new(path), desc)
    }

    /// Path of the backing file
    pub fn name(&self) -> &Path {
        &self.path
    }

    pub fn tuple_desc(&self) -> &TupleDesc {
        self.layout.desc()
    }

    pub fn num_pages(&self) -> usize {
        self.num_pages
    }

    pub fn page_size(&self) -> usize {
        self.layout.page_size()
    }

    pub fn slots_per_page(&self) -> usize {
        self.layout.slots_per_page()
    }

    pub fn stats(&self) -> FileStats {
        FileStats {
            page_count: self.num_pages,
            page_size: self.layout.page_size(),
            slots_per_page: self.layout.slots_per_page(),
            record_width: self.layout.record_width(),
        }
    }

    /// Page ids read so far, in order
    pub fn reads(&self) -> Vec<PageId> {
        self.log.lock().reads().to_vec()
    }

    /// Page ids written so far, in order
    pub fn writes(&self) -> Vec<PageId> {
        self.log.lock().writes().to_vec()
    }

    /// Snapshot of the full access log
    pub fn access_log(&self) -> AccessLog {
        self.log.lock().clone()
    }

    fn check_page(&self, page_id: PageId) -> Result<()> {
        if page_id.index() >= self.num_pages {
            return Err(StorageError::PageOutOfRange {
                page_id,
                page_count: self.num_pages,
            });
        }
        Ok(())
    }

    /// Read one page
    pub fn read_page(&self, page_id: PageId) -> Result<HeapPage> {
        self.check_page(page_id)?;

        let offset = page_id.file_offset(self.page_size());
        let mut buf = vec![0u8; self.page_size()];

        let file = open_file(&self.path, false)?;
        read_exact_at(&file, &mut buf, offset)?;
        drop(file);

        trace!(page = page_id.value(), offset, "read page");
        self.log.lock().record_read(page_id);

        HeapPage::from_bytes(self.layout.clone(), &buf)
    }

    /// Write one page's full image over page `page_id`
    pub fn write_page(&self, page: &HeapPage, page_id: PageId) -> Result<()> {
        self.check_page(page_id)?;
        self.write_at(page, page_id)
    }

    fn write_at(&self, page: &HeapPage, page_id: PageId) -> Result<()> {
        let data = page.as_bytes();
        if data.len() != self.page_size() {
            return Err(StorageError::schema(format!(
                "page data must be {} bytes, got {}",
                self.page_size(),
                data.len()
            )));
        }

        let offset = page_id.file_offset(self.page_size());

        let file = open_file(&self.path, false)?;
        write_all_at(&file, data, offset)?;
        if self.sync_on_write {
            file.sync_data()?;
        }
        drop(file);

        trace!(page = page_id.value(), offset, "wrote page");
        self.log.lock().record_write(page_id);

        Ok(())
    }

    /// Insert a tuple into the lowest free slot of the first page with room
    ///
    /// If every page is full the file grows by one page and the tuple lands
    /// in its slot 0. The modified page is written back before returning.
    pub fn insert_tuple(&mut self, tuple: &Tuple) -> Result<RecordId> {
        self.tuple_desc().validate(tuple)?;

        // num_pages never exceeds u32::MAX + 1, see page_count and append_page.
        for index in 0..self.num_pages {
            let page_id = PageId::new(index as u32);
            let mut page = self.read_page(page_id)?;
            if let Some(slot) = page.first_free_slot() {
                page.set_slot(slot, tuple)?;
                self.write_page(&page, page_id)?;
                debug!(page = page_id.value(), slot, "inserted tuple");
                return Ok(RecordId::new(page_id, slot));
            }
        }

        let mut page = HeapPage::new(self.layout.clone());
        page.set_slot(0, tuple)?;
        let page_id = self.append_page(&page)?;
        debug!(page = page_id.value(), slot = 0, "inserted tuple");

        Ok(RecordId::new(page_id, 0))
    }

    /// Write `page` past the current end of file and count it
    fn append_page(&mut self, page: &HeapPage) -> Result<PageId> {
        let index = u32::try_from(self.num_pages)
            .map_err(|_| StorageError::invalid_state("file has reached its page limit"))?;
        let page_id = PageId::new(index);

        self.write_at(page, page_id)?;
        self.num_pages += 1;
        debug!(page = page_id.value(), num_pages = self.num_pages, "grew heap file");

        Ok(page_id)
    }

    /// Free the slot at `rid` and write its page back
    ///
    /// Pages are never removed or compacted.
    pub fn delete_tuple(&mut self, rid: RecordId) -> Result<()> {
        let mut page = self.read_page(rid.page_id)?;
        if !page.is_occupied(rid.slot)? {
            return Err(StorageError::InvalidLocation(rid));
        }

        page.clear_slot(rid.slot)?;
        self.write_page(&page, rid.page_id)?;
        debug!(page = rid.page_id.value(), slot = rid.slot, "deleted tuple");

        Ok(())
    }

    /// Read the tuple at `rid`
    pub fn get_tuple(&self, rid: RecordId) -> Result<Tuple> {
        self.read_page(rid.page_id)?
            .get_slot(rid.slot)?
            .ok_or(StorageError::SlotEmpty(rid))
    }

    /// Read the tuple under `cursor`
    pub fn tuple_at(&self, cursor: &Cursor) -> Result<Tuple> {
        self.get_tuple(cursor.record_id()?)
    }

    /// Cursor at the first live record, or `end()` if there is none
    pub fn begin(&self) -> Result<Cursor> {
        self.seek(PageId::new(0), 0)
    }

    /// The past-the-end cursor
    pub fn end(&self) -> Cursor {
        Cursor::Done
    }

    /// Advance `cursor` to the next live record
    pub fn next(&self, cursor: &mut Cursor) -> Result<()> {
        let rid = cursor
            .record_id()
            .map_err(|_| StorageError::invalid_state("next called on an exhausted cursor"))?;
        self.check_page(rid.page_id)?;
        self.layout.check_slot(rid.slot)?;
        *cursor = self.seek(rid.page_id, rid.slot + 1)?;
        Ok(())
    }

    /// Find the first occupied slot at or after `(page_id, slot)`
    fn seek(&self, page_id: PageId, slot: usize) -> Result<Cursor> {
        let mut index = page_id.index();
        let mut from = slot;

        while index < self.num_pages {
            let page_id = PageId::new(index as u32);
            let page = self.read_page(page_id)?;
            if let Some(slot) = page.next_occupied(from) {
                return Ok(Cursor::Active(RecordId::new(page_id, slot)));
            }
            index += 1;
            from = 0;
        }

        Ok(Cursor::Done)
    }

    /// Iterate over every live record, reading each page once
    pub fn scan(&self) -> Scan<'_> {
        Scan::new(self)
    }
}

/// Number of whole pages in a file of `len` bytes
///
/// Page ids are `u32`, so a file can hold at most `u32::MAX + 1` pages.
fn page_count(len: u64, page_size: u64) -> Result<usize> {
    let pages = len / page_size;
    if pages > u64::from(u32::MAX) + 1 {
        return Err(StorageError::corruption(format!(
            "file holds {} pages, more than page ids can address",
            pages
        )));
    }
    usize::try_from(pages)
        .map_err(|_| StorageError::corruption(format!("file holds {} pages", pages)))
}

/// Open the backing file for one operation
fn open_file(path: &Path, create: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(create).truncate(false);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}

#[cfg(unix)]
fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.read_exact_at(buf, offset)
}

#[cfg(unix)]
fn write_all_at(file: &File, buf: &[u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.write_all_at(buf, offset)
}

#[cfg(windows)]
fn read_exact_at(file: &File, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_read(buf, offset)? {
            0 => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "failed to fill whole page",
                ))
            }
            n => {
                buf = &mut std::mem::take(&mut buf)[n..];
                offset += n as u64;
            }
        }
    }
    Ok(())
}

#[cfg(windows)]
fn write_all_at(file: &File, mut buf: &[u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_write(buf, offset)? {
            0 => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write whole page",
                ))
            }
            n => {
                buf = &buf[n..];
                offset += n as u64;
            }
        }
    }
    Ok(())
}
