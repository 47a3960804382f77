//! Metadata Slot
//!
//! One 216-byte record per image, `max_files` of them after the header.

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{ImgStoreError, Result};

use super::{
    decode_cstr, encode_cstr, ContentHash, Resolution, HASH_SIZE, MAX_IMG_ID, NB_RES, SLOT_SIZE,
};

/// On-disk values of the validity flag
const EMPTY: u16 = 0;
const NON_EMPTY: u16 = 1;

/// Whether a slot currently holds an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    #[default]
    Empty,
    Valid,
}

/// One entry of the metadata array
///
/// For a VALID slot `offset[Original]` is never 0. A zero offset for a
/// derived resolution means it has not been materialized yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataSlot {
    /// Image identifier, unique among valid slots
    pub img_id: String,
    /// SHA-256 of the original bytes
    pub hash: ContentHash,
    /// Original (width, height)
    pub res_orig: (u32, u32),
    /// Byte sizes, indexed by `Resolution::index()`
    pub size: [u32; NB_RES],
    /// Byte offsets in the file, indexed by `Resolution::index()`
    pub offset: [u64; NB_RES],
    pub state: SlotState,
}

impl MetadataSlot {
    /// A freshly claimed slot: valid, identified, nothing stored yet
    pub fn claim(img_id: &str, hash: ContentHash, original_size: u32) -> Self {
        let mut size = [0; NB_RES];
        size[Resolution::Original.index()] = original_size;
        Self {
            img_id: img_id.to_string(),
            hash,
            res_orig: (0, 0),
            size,
            offset: [0; NB_RES],
            state: SlotState::Valid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.state == SlotState::Valid
    }

    pub fn size_of(&self, res: Resolution) -> u32 {
        self.size[res.index()]
    }

    pub fn offset_of(&self, res: Resolution) -> u64 {
        self.offset[res.index()]
    }

    /// True when bytes for `res` exist in the content region
    pub fn has(&self, res: Resolution) -> bool {
        self.offset_of(res) != 0
    }

    /// Serialize slot to its fixed 216-byte form
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(SLOT_SIZE as usize);

        buf.put_slice(&encode_cstr::<{ MAX_IMG_ID + 1 }>(&self.img_id));
        buf.put_slice(&self.hash);
        buf.put_u32_le(self.res_orig.0);
        buf.put_u32_le(self.res_orig.1);
        for size in self.size {
            buf.put_u32_le(size);
        }
        buf.put_u32_le(0); // align offsets on 8 bytes
        for offset in self.offset {
            buf.put_u64_le(offset);
        }
        buf.put_u16_le(match self.state {
            SlotState::Empty => EMPTY,
            SlotState::Valid => NON_EMPTY,
        });
        buf.put_u16_le(0); // reserved
        buf.put_u32_le(0); // tail padding

        debug_assert_eq!(buf.len(), SLOT_SIZE as usize);
        buf.freeze()
    }

    /// Parse slot from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < SLOT_SIZE as usize {
            return Err(ImgStoreError::invalid_data(format!(
                "metadata slot too small: {} bytes",
                data.len()
            )));
        }

        let id_end = MAX_IMG_ID + 1;
        let img_id = std::str::from_utf8(decode_cstr(&data[..id_end]))
            .map_err(|_| ImgStoreError::invalid_data("image id is not valid UTF-8"))?
            .to_string();

        let mut hash = [0u8; HASH_SIZE];
        hash.copy_from_slice(&data[id_end..id_end + HASH_SIZE]);

        let mut buf = &data[id_end + HASH_SIZE..SLOT_SIZE as usize];
        let res_orig = (buf.get_u32_le(), buf.get_u32_le());

        let mut size = [0u32; NB_RES];
        for s in size.iter_mut() {
            *s = buf.get_u32_le();
        }
        buf.advance(4);

        let mut offset = [0u64; NB_RES];
        for o in offset.iter_mut() {
            *o = buf.get_u64_le();
        }

        let state = match buf.get_u16_le() {
            EMPTY => SlotState::Empty,
            NON_EMPTY => SlotState::Valid,
            other => {
                return Err(ImgStoreError::invalid_data(format!(
                    "invalid slot validity flag: {}",
                    other
                )))
            }
        };

        Ok(Self {
            img_id,
            hash,
            res_orig,
            size,
            offset,
            state,
        })
    }
}

impl fmt::Display for MetadataSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid = match self.state {
            SlotState::Empty => EMPTY,
            SlotState::Valid => NON_EMPTY,
        };

        writeln!(f, "IMAGE ID: {}", self.img_id)?;
        writeln!(f, "SHA: {}", hex::encode(self.hash))?;
        writeln!(f, "VALID: {}", valid)?;
        for res in [Resolution::Original, Resolution::Thumbnail, Resolution::Small] {
            writeln!(
                f,
                "OFFSET {}: {}\t\tSIZE {}: {}",
                res.suffix().to_uppercase(),
                self.offset_of(res),
                res.suffix().to_uppercase(),
                self.size_of(res)
            )?;
        }
        writeln!(f, "ORIGINAL: {} x {}", self.res_orig.0, self.res_orig.1)?;
        write!(f, "*****************************************")
    }
}
