//! Lazy Resolution Materializer
//!
//! Thumbnail and small images are only computed the first time someone asks
//! for them. The result is appended to the content region and exactly one
//! slot record is rewritten; the header does not change.

use crate::codec::shrink_factor;
use crate::error::{ImgStoreError, Result};
use crate::layout::Resolution;

use super::ImgStore;

impl ImgStore {
    /// Make sure slot `index` has bytes for resolution `res`
    ///
    /// No-op for the original and for resolutions that already exist. A
    /// failure between the append and the slot rewrite leaves unreferenced
    /// bytes behind, which the next compaction drops.
    pub fn materialize(&mut self, res: Resolution, index: usize) -> Result<()> {
        if res == Resolution::Original {
            return Ok(());
        }

        let slot = match self.metadata.get(index) {
            Some(slot) if slot.is_valid() => slot,
            _ => {
                return Err(ImgStoreError::InvalidArgument(format!(
                    "slot {} does not hold an image",
                    index
                )))
            }
        };
        if slot.has(res) {
            return Ok(());
        }

        let (orig_offset, orig_size) = (
            slot.offset_of(Resolution::Original),
            slot.size_of(Resolution::Original),
        );
        let (target_w, target_h) = self
            .header
            .target(res)
            .ok_or(ImgStoreError::InvalidResolutions)?;

        let original = self.read_range(orig_offset, orig_size)?;
        let (width, height) = self.codec.dimensions(&original)?;
        if width == 0 || height == 0 {
            return Err(ImgStoreError::ImageLibrary(
                "decoded image has no pixels".to_string(),
            ));
        }

        let factor = shrink_factor(width, height, target_w, target_h);
        let resized = self.codec.resize(&original, factor)?;
        let resized_size = u32::try_from(resized.len()).map_err(|_| {
            ImgStoreError::ImageLibrary(format!("resized image too large: {} bytes", resized.len()))
        })?;

        let offset = self.append(&resized)?;

        let previous = self.metadata[index].clone();
        let slot = &mut self.metadata[index];
        slot.size[res.index()] = resized_size;
        slot.offset[res.index()] = offset;

        if let Err(e) = self.write_slot(index) {
            self.metadata[index] = previous;
            return Err(e);
        }

        tracing::debug!(
            index,
            resolution = %res,
            factor,
            offset,
            size = resized_size,
            "materialized resolution"
        );
        Ok(())
    }
}
