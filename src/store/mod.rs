//! Store Module
//!
//! The store handle: one open file plus the in-memory header and metadata
//! array, and the operations built on them.
//!
//! ## Responsibilities
//! - Create a new store file (header + empty metadata array)
//! - Open an existing one and load every slot into memory
//! - Insert / delete / read / list images
//! - Lazily materialize thumbnail and small resolutions on read
//!
//! ## Write discipline
//! Every mutating call rewrites the records it changed (header and/or one
//! slot) before returning; there is no buffered state to flush on close.
//! Content bytes are only ever appended.

mod delete;
mod insert;
mod list;
mod materialize;
mod read;

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::codec::{ImageCodec, RasterCodec};
use crate::config::Config;
use crate::error::{ImgStoreError, Result};
use crate::layout::{
    slot_offset, MetadataSlot, StoreHeader, HEADER_SIZE, MAX_IMG_ID, SLOT_SIZE,
};

pub use list::ListMode;

/// How to open an existing store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Listing and reading already materialized resolutions only
    ReadOnly,
    /// Every operation
    ReadWrite,
}

/// Handle on one store file
///
/// ## Ownership
/// - The metadata array is allocated on create/open and released on close
/// - The file handle is owned exclusively; there is no cross-process locking
/// - Mutating operations take `&mut self`, so one handle has one writer
pub struct ImgStore {
    /// Path the store was created/opened from
    path: PathBuf,

    /// Open file, `None` after close
    file: Option<File>,

    /// In-memory copy of the header record
    header: StoreHeader,

    /// In-memory copy of all `max_files` slot records
    metadata: Vec<MetadataSlot>,

    /// Decoder/resizer for dimensions and derived resolutions
    codec: Arc<dyn ImageCodec>,
}

impl ImgStore {
    /// Create a new store, truncating any existing file at `path`
    ///
    /// Writes the header followed by `max_files` empty slots and returns a
    /// read-write handle on the new file.
    pub fn create(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        check_path(path)?;
        config.validate()?;

        let header = StoreHeader::new(config);
        let metadata = empty_metadata(config.max_files)?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(&header.to_bytes())?;
        for slot in &metadata {
            writer.write_all(&slot.to_bytes())?;
        }
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| ImgStoreError::Io(e.into_error()))?;

        tracing::info!(
            path = %path.display(),
            max_files = config.max_files,
            "created store ({} item(s) written)",
            config.max_files as u64 + 1
        );

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            header,
            metadata,
            codec: Arc::new(RasterCodec),
        })
    }

    /// Open an existing store and load its header and metadata array
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();
        check_path(path)?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(mode == OpenMode::ReadWrite)
            .open(path)?;

        let mut raw_header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut raw_header)?;
        let header = StoreHeader::from_bytes(&raw_header)?;

        let table_len = header.max_files() as u64 * SLOT_SIZE;
        let available = file.metadata()?.len().saturating_sub(HEADER_SIZE);
        if table_len > available {
            return Err(ImgStoreError::invalid_data(format!(
                "metadata array needs {} bytes, file has {}",
                table_len, available
            )));
        }

        let table_len = table_len as usize;
        let mut raw_table = Vec::new();
        raw_table.try_reserve_exact(table_len)?;
        raw_table.resize(table_len, 0);
        file.read_exact(&mut raw_table)?;

        let mut metadata = Vec::new();
        metadata.try_reserve_exact(header.max_files() as usize)?;
        for record in raw_table.chunks_exact(SLOT_SIZE as usize) {
            metadata.push(MetadataSlot::from_bytes(record)?);
        }

        let valid = metadata.iter().filter(|s| s.is_valid()).count();
        if valid != header.num_files as usize {
            tracing::warn!(
                path = %path.display(),
                num_files = header.num_files,
                valid,
                "header file count disagrees with metadata"
            );
        }

        tracing::debug!(
            path = %path.display(),
            num_files = header.num_files,
            max_files = header.max_files(),
            "opened store"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            header,
            metadata,
            codec: Arc::new(RasterCodec),
        })
    }

    /// Replace the codec used for dimensions and resizing
    pub fn with_codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Release the metadata array and close the file
    ///
    /// Calling it again is a no-op.
    pub fn close(&mut self) {
        self.metadata = Vec::new();
        if self.file.take().is_some() {
            tracing::debug!(path = %self.path.display(), "closed store");
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn header(&self) -> &StoreHeader {
        &self.header
    }

    /// All slots, valid or not, in index order
    pub fn slots(&self) -> &[MetadataSlot] {
        &self.metadata
    }

    pub fn slot(&self, index: usize) -> Option<&MetadataSlot> {
        self.metadata.get(index)
    }

    /// Index of the first valid slot carrying `img_id`
    pub fn find(&self, img_id: &str) -> Option<usize> {
        self.metadata
            .iter()
            .position(|slot| slot.is_valid() && slot.img_id == img_id)
    }

    /// Current file length in bytes
    pub fn file_len(&self) -> Result<u64> {
        let file = self.file.as_ref().ok_or(ImgStoreError::FileNotFound)?;
        Ok(file.metadata()?.len())
    }

    // =========================================================================
    // Record I/O
    // =========================================================================

    fn file_mut(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or(ImgStoreError::FileNotFound)
    }

    /// Rewrite the header record at offset 0
    fn write_header(&mut self) -> Result<()> {
        let bytes = self.header.to_bytes();
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&bytes)?;
        Ok(())
    }

    /// Rewrite slot `index` at its fixed position
    fn write_slot(&mut self, index: usize) -> Result<()> {
        let bytes = self.metadata[index].to_bytes();
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(slot_offset(index)))?;
        file.write_all(&bytes)?;
        Ok(())
    }

    /// Append `data` at end of file and return where it starts
    fn append(&mut self, data: &[u8]) -> Result<u64> {
        let file = self.file_mut()?;
        let offset = file.seek(SeekFrom::End(0))?;
        file.write_all(data)?;
        Ok(offset)
    }

    /// Read exactly `size` bytes starting at `offset`
    fn read_range(&mut self, offset: u64, size: u32) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(size as usize)?;
        buf.resize(size as usize, 0);

        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buf)?;
        Ok(buf)
    }
}

/// Identifiers must be non-empty, fit the fixed field and contain no NUL
pub(crate) fn validate_img_id(img_id: &str) -> Result<()> {
    if img_id.is_empty() || img_id.len() > MAX_IMG_ID || img_id.contains('\0') {
        return Err(ImgStoreError::InvalidImageId);
    }
    Ok(())
}

fn check_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ImgStoreError::InvalidArgument("empty store path".to_string()));
    }
    Ok(())
}

fn empty_metadata(max_files: u32) -> Result<Vec<MetadataSlot>> {
    let mut metadata = Vec::new();
    metadata.try_reserve_exact(max_files as usize)?;
    metadata.resize(max_files as usize, MetadataSlot::default());
    Ok(metadata)
}
