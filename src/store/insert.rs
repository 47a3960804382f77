//! Insert
//!
//! Steps:
//! 1. Reject bad ids and full stores before touching anything
//! 2. Hash the buffer and claim the first empty slot
//! 3. Dedup by name and content
//! 4. Append the bytes unless an existing entry already holds them
//! 5. Decode the original dimensions
//! 6. Bump the header and rewrite header + slot

use crate::dedup::{content_hash, dedup_slot};
use crate::error::{ImgStoreError, Result};
use crate::layout::{MetadataSlot, Resolution};

use super::{validate_img_id, ImgStore};

impl ImgStore {
    /// Insert `buffer` under `img_id` and return the slot index used
    ///
    /// Fails with `DuplicateId` if the id is taken and `StoreFull` when every
    /// slot is in use. On those failures, on codec or append failures and on
    /// a failed record rewrite, the handle is left as it was before the call.
    pub fn insert(&mut self, buffer: &[u8], img_id: &str) -> Result<usize> {
        validate_img_id(img_id)?;
        if !self.is_open() {
            return Err(ImgStoreError::FileNotFound);
        }
        if self.header.is_full() {
            return Err(ImgStoreError::StoreFull);
        }

        let original_size = u32::try_from(buffer.len()).map_err(|_| {
            ImgStoreError::InvalidArgument(format!("image too large: {} bytes", buffer.len()))
        })?;

        let index = self
            .metadata
            .iter()
            .position(|slot| !slot.is_valid())
            .ok_or(ImgStoreError::StoreFull)?;

        self.metadata[index] = MetadataSlot::claim(img_id, content_hash(buffer), original_size);

        if let Err(e) = self.fill_slot(index, buffer) {
            self.metadata[index] = MetadataSlot::default();
            return Err(e);
        }

        let previous_header = self.header.clone();
        self.header.version = self.header.version.wrapping_add(1);
        self.header.num_files += 1;

        if let Err(e) = self.write_header().and_then(|_| self.write_slot(index)) {
            self.header = previous_header;
            self.metadata[index] = MetadataSlot::default();
            // The header record may already have gone out
            let _ = self.write_header();
            return Err(e);
        }

        tracing::debug!(
            img_id,
            index,
            offset = self.metadata[index].offset_of(Resolution::Original),
            size = original_size,
            "inserted image"
        );

        Ok(index)
    }

    /// Dedup, store bytes if needed, and record the original dimensions
    fn fill_slot(&mut self, index: usize, buffer: &[u8]) -> Result<()> {
        let reference = dedup_slot(&mut self.metadata, index)?;

        match reference {
            Some(r) => tracing::debug!(index, reference = r, "sharing content with existing entry"),
            None => {
                let offset = self.append(buffer)?;
                self.metadata[index].offset[Resolution::Original.index()] = offset;
            }
        }

        let (width, height) = self.codec.dimensions(buffer)?;
        self.metadata[index].res_orig = (width, height);
        Ok(())
    }
}
