//! Dedup Module
//!
//! Name and content deduplication for a slot that is being inserted.
//!
//! ## Rules
//! - Another valid slot with the same id → `DuplicateId`
//! - Otherwise the first (lowest index) valid slot with the same content hash
//!   becomes the reference, and the new slot shares all of its byte ranges
//! - No content match → `offset[Original]` is reset to 0 so the caller knows
//!   it has to append the bytes itself
//!
//! Pure in-memory logic: only the target slot is touched, nothing is written.

use sha2::{Digest, Sha256};

use crate::error::{ImgStoreError, Result};
use crate::layout::{ContentHash, MetadataSlot, Resolution};

/// SHA-256 of a whole buffer
pub fn content_hash(data: &[u8]) -> ContentHash {
    Sha256::digest(data).into()
}

/// Byte-for-byte digest equality
pub fn same_content(a: &ContentHash, b: &ContentHash) -> bool {
    a == b
}

/// Deduplicate `slots[index]` against every other valid slot
///
/// Returns the index of the reference slot when content is shared.
pub fn dedup_slot(slots: &mut [MetadataSlot], index: usize) -> Result<Option<usize>> {
    let target = slots.get(index).ok_or_else(|| {
        ImgStoreError::InvalidArgument(format!("slot index {} out of range", index))
    })?;

    let mut reference = None;
    for (i, other) in slots.iter().enumerate() {
        if i == index || !other.is_valid() {
            continue;
        }
        if other.img_id == target.img_id {
            return Err(ImgStoreError::DuplicateId);
        }
        if reference.is_none() && same_content(&other.hash, &target.hash) {
            reference = Some(i);
        }
    }

    match reference {
        Some(r) => {
            let (size, offset) = (slots[r].size, slots[r].offset);
            let target = &mut slots[index];
            target.size = size;
            target.offset = offset;
        }
        None => slots[index].offset[Resolution::Original.index()] = 0,
    }

    Ok(reference)
}
