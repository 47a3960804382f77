//! Store Header
//!
//! The single 64-byte record at the start of every store file.

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::config::{Config, ResolutionConfig};
use crate::error::{ImgStoreError, Result};

use super::{decode_cstr, encode_cstr, Resolution, HEADER_SIZE, MAX_STORE_NAME, STORE_NAME};

/// In-memory copy of the store header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHeader {
    /// Name tag identifying the file type
    pub name: String,
    /// Bumped on every insert and delete
    pub version: u32,
    /// Number of VALID slots
    pub num_files: u32,
    /// Capacity; private so it cannot change after creation
    max_files: u32,
    /// Target sizes of the derived resolutions
    resolutions: ResolutionConfig,
}

impl StoreHeader {
    /// Fresh header for a new, empty store
    pub fn new(config: &Config) -> Self {
        Self {
            name: STORE_NAME.to_string(),
            version: 0,
            num_files: 0,
            max_files: config.max_files,
            resolutions: config.resolutions,
        }
    }

    pub fn max_files(&self) -> u32 {
        self.max_files
    }

    /// Config that would recreate an empty store with the same shape
    pub fn config(&self) -> Config {
        Config {
            max_files: self.max_files,
            resolutions: self.resolutions,
        }
    }

    /// Target (width, height) of a derived resolution; None for the original
    pub fn target(&self, res: Resolution) -> Option<(u16, u16)> {
        match res {
            Resolution::Thumbnail => Some(self.resolutions.thumb),
            Resolution::Small => Some(self.resolutions.small),
            Resolution::Original => None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.num_files >= self.max_files
    }

    /// Serialize header to its fixed 64-byte form
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE as usize);

        buf.put_slice(&encode_cstr::<{ MAX_STORE_NAME + 1 }>(&self.name));
        buf.put_u32_le(self.version);
        buf.put_u32_le(self.num_files);
        buf.put_u32_le(self.max_files);
        buf.put_u16_le(self.resolutions.thumb.0);
        buf.put_u16_le(self.resolutions.thumb.1);
        buf.put_u16_le(self.resolutions.small.0);
        buf.put_u16_le(self.resolutions.small.1);
        buf.put_u32_le(0); // reserved
        buf.put_u64_le(0); // reserved

        debug_assert_eq!(buf.len(), HEADER_SIZE as usize);
        buf.freeze()
    }

    /// Parse header from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE as usize {
            return Err(ImgStoreError::invalid_data(format!(
                "header too small: {} bytes",
                data.len()
            )));
        }

        let name = String::from_utf8_lossy(decode_cstr(&data[..MAX_STORE_NAME + 1])).into_owned();

        let mut buf = &data[MAX_STORE_NAME + 1..HEADER_SIZE as usize];
        let version = buf.get_u32_le();
        let num_files = buf.get_u32_le();
        let max_files = buf.get_u32_le();
        let thumb = (buf.get_u16_le(), buf.get_u16_le());
        let small = (buf.get_u16_le(), buf.get_u16_le());

        Ok(Self {
            name,
            version,
            num_files,
            max_files,
            resolutions: ResolutionConfig { thumb, small },
        })
    }
}

impl fmt::Display for StoreHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (tw, th) = self.resolutions.thumb;
        let (sw, sh) = self.resolutions.small;

        writeln!(f, "*****************************************")?;
        writeln!(f, "**********IMGSTORE HEADER START**********")?;
        writeln!(f, "TYPE: {}", self.name)?;
        writeln!(f, "VERSION: {}", self.version)?;
        writeln!(f, "IMAGE COUNT: {}\t\tMAX IMAGES: {}", self.num_files, self.max_files)?;
        writeln!(f, "THUMBNAIL: {} x {}\tSMALL: {} x {}", tw, th, sw, sh)?;
        writeln!(f, "***********IMGSTORE HEADER END***********")?;
        write!(f, "*****************************************")
    }
}
