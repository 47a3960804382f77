//! Read

use crate::error::{ImgStoreError, Result};
use crate::layout::Resolution;

use super::{validate_img_id, ImgStore};

impl ImgStore {
    /// Return the bytes of `img_id` at resolution `res`
    ///
    /// A thumbnail or small image that does not exist yet is computed and
    /// persisted first, so reads may append to the file.
    pub fn read(&mut self, img_id: &str, res: Resolution) -> Result<Vec<u8>> {
        validate_img_id(img_id)?;
        if !self.is_open() {
            return Err(ImgStoreError::FileNotFound);
        }

        let index = self.find(img_id).ok_or(ImgStoreError::FileNotFound)?;
        self.materialize(res, index)?;

        let slot = &self.metadata[index];
        let (offset, size) = (slot.offset_of(res), slot.size_of(res));
        self.read_range(offset, size)
    }
}
