//! Codec Module
//!
//! The store treats image bytes as opaque blobs. Everything that needs to
//! look inside them goes through [`ImageCodec`]:
//! - reading the pixel dimensions of an original
//! - producing a resized, re-encoded copy for a derived resolution
//!
//! Any failure is reported as `ImgStoreError::ImageLibrary`.

mod raster;

use crate::error::Result;

pub use raster::RasterCodec;

/// Decoder / resizer used by insert and lazy materialization
pub trait ImageCodec: Send + Sync {
    /// Decode `bytes` and return (width, height)
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32)>;

    /// Scale both axes of the decoded image by `factor` and re-encode it
    fn resize(&self, bytes: &[u8], factor: f64) -> Result<Vec<u8>>;
}

/// Uniform scale factor fitting (width, height) into (target_w, target_h)
///
/// Not clamped: a target larger than the original yields a factor > 1.
pub fn shrink_factor(width: u32, height: u32, target_w: u16, target_h: u16) -> f64 {
    let h_shrink = f64::from(target_w) / f64::from(width);
    let v_shrink = f64::from(target_h) / f64::from(height);
    h_shrink.min(v_shrink)
}
