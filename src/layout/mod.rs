//! Layout Module
//!
//! Fixed-size on-disk records. Pure (de)serialization, no I/O.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (64 bytes)                                       │
//! │   Name (32) | Version (4) | NumFiles (4) | MaxFiles (4) │
//! │   ThumbW ThumbH SmallW SmallH (2 each) | Reserved (12)  │
//! ├─────────────────────────────────────────────────────────┤
//! │ Metadata Array (max_files × 216 bytes)                  │
//! │   ImgId (128) | SHA-256 (32) | Width, Height (4 each)   │
//! │   Size[thumb, small, orig] (4 each) | Pad (4)           │
//! │   Offset[thumb, small, orig] (8 each)                   │
//! │   Valid (2) | Reserved (2) | Pad (4)                    │
//! ├─────────────────────────────────────────────────────────┤
//! │ Content Region (append-only)                            │
//! │   opaque encoded images, addressed by (offset, size)    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian.

mod header;
mod slot;

use std::fmt;
use std::str::FromStr;

use crate::error::ImgStoreError;

pub use header::StoreHeader;
pub use slot::{MetadataSlot, SlotState};

// =============================================================================
// Shared Constants
// =============================================================================

/// Name tag written into every new header
pub const STORE_NAME: &str = "ImgStore binary";

/// Max. length of the name tag (excluding NUL terminator)
pub const MAX_STORE_NAME: usize = 31;

/// Max. length of an image identifier (excluding NUL terminator)
pub const MAX_IMG_ID: usize = 127;

/// Length of the content digest (SHA-256)
pub const HASH_SIZE: usize = 32;

/// Number of resolutions stored per entry
pub const NB_RES: usize = 3;

/// Header record size
pub const HEADER_SIZE: u64 = 64;

/// Metadata slot record size
pub const SLOT_SIZE: u64 = 216;

/// Fixed-length content digest
pub type ContentHash = [u8; HASH_SIZE];

/// File position of slot `index`
pub fn slot_offset(index: usize) -> u64 {
    HEADER_SIZE + SLOT_SIZE * index as u64
}

/// First byte of the content region for a store of the given capacity
pub fn content_start(max_files: u32) -> u64 {
    slot_offset(max_files as usize)
}

// =============================================================================
// Resolution
// =============================================================================

/// The three resolutions kept per entry, in on-disk array order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Resolution {
    Thumbnail = 0,
    Small = 1,
    Original = 2,
}

impl Resolution {
    /// The two lazily computed resolutions
    pub const DERIVED: [Resolution; 2] = [Resolution::Thumbnail, Resolution::Small];

    /// Index into the size/offset arrays
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short suffix used for exported file names
    pub fn suffix(self) -> &'static str {
        match self {
            Resolution::Thumbnail => "thumb",
            Resolution::Small => "small",
            Resolution::Original => "orig",
        }
    }
}

impl FromStr for Resolution {
    type Err = ImgStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thumb" | "thumbnail" => Ok(Resolution::Thumbnail),
            "small" => Ok(Resolution::Small),
            "orig" | "original" => Ok(Resolution::Original),
            _ => Err(ImgStoreError::InvalidResolutions),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resolution::Thumbnail => "thumbnail",
            Resolution::Small => "small",
            Resolution::Original => "original",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Fixed-width string helpers (shared by header and slot)
// =============================================================================

/// Copy `s` into a zeroed field of `N` bytes, keeping the last byte as NUL
pub(crate) fn encode_cstr<const N: usize>(s: &str) -> [u8; N] {
    let mut field = [0u8; N];
    let len = s.len().min(N - 1);
    field[..len].copy_from_slice(&s.as_bytes()[..len]);
    field
}

/// Bytes up to the first NUL (or the whole field)
pub(crate) fn decode_cstr(field: &[u8]) -> &[u8] {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    &field[..end]
}
