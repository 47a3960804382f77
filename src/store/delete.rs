//! Delete
//!
//! Tombstone deletion: the slot is marked empty, its bytes stay in the
//! content region until the next compaction.

use crate::error::{ImgStoreError, Result};
use crate::layout::SlotState;

use super::{validate_img_id, ImgStore};

impl ImgStore {
    /// Invalidate the entry stored under `img_id`
    pub fn delete(&mut self, img_id: &str) -> Result<()> {
        validate_img_id(img_id)?;
        if !self.is_open() {
            return Err(ImgStoreError::FileNotFound);
        }

        let index = self.find(img_id).ok_or(ImgStoreError::FileNotFound)?;

        let previous_header = self.header.clone();
        self.metadata[index].state = SlotState::Empty;
        self.header.num_files = self.header.num_files.saturating_sub(1);
        self.header.version = self.header.version.wrapping_add(1);

        if let Err(e) = self.write_slot(index).and_then(|_| self.write_header()) {
            self.header = previous_header;
            self.metadata[index].state = SlotState::Valid;
            // The slot record may already have gone out
            let _ = self.write_slot(index);
            return Err(e);
        }

        tracing::debug!(img_id, index, "deleted image");
        Ok(())
    }
}
