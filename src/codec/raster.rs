//! Raster codec backed by the `image` crate (JPEG and PNG)

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use crate::error::{ImgStoreError, Result};

use super::ImageCodec;

/// Default codec: decodes with `image`, resizes with a triangle filter and
/// re-encodes in the format the input was detected as
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterCodec;

impl RasterCodec {
    fn decode(bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).map_err(image_error)
    }
}

impl ImageCodec for RasterCodec {
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32)> {
        let img = Self::decode(bytes)?;
        Ok((img.width(), img.height()))
    }

    fn resize(&self, bytes: &[u8], factor: f64) -> Result<Vec<u8>> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ImgStoreError::ImageLibrary(format!(
                "invalid resize factor {}",
                factor
            )));
        }

        let format = image::guess_format(bytes).unwrap_or(ImageFormat::Jpeg);
        let img = Self::decode(bytes)?;

        let scale = |dim: u32| ((f64::from(dim) * factor).round() as u32).max(1);
        let mut resized = img.resize_exact(scale(img.width()), scale(img.height()), FilterType::Triangle);

        // JPEG has no alpha channel
        if format == ImageFormat::Jpeg {
            resized = DynamicImage::ImageRgb8(resized.to_rgb8());
        }

        let mut out = Cursor::new(Vec::new());
        resized.write_to(&mut out, format).map_err(image_error)?;
        Ok(out.into_inner())
    }
}

fn image_error(e: image::ImageError) -> ImgStoreError {
    ImgStoreError::ImageLibrary(e.to_string())
}
