//! Shared test helpers
//!
//! `FakeCodec` understands a trivial image format so engine tests do not
//! depend on a real JPEG encoder:
//!
//! ```text
//! "FAKEIMG\0" (8) | width u32 LE | height u32 LE | payload
//! ```

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use imgstore::{Config, ImageCodec, ImgStore, ImgStoreError, OpenMode, Result};
use tempfile::TempDir;

const MAGIC: &[u8; 8] = b"FAKEIMG\0";

/// Deterministic codec over the fake format above
#[derive(Default)]
pub struct FakeCodec {
    /// Number of `resize` calls so far
    pub resizes: AtomicUsize,
    /// When set, every call fails
    pub broken: AtomicBool,
}

impl FakeCodec {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn broken() -> Arc<Self> {
        let codec = Self::default();
        codec.broken.store(true, Ordering::SeqCst);
        Arc::new(codec)
    }

    pub fn resize_count(&self) -> usize {
        self.resizes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(ImgStoreError::ImageLibrary("codec disabled".to_string()));
        }
        Ok(())
    }
}

impl ImageCodec for FakeCodec {
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32)> {
        self.check()?;
        parse_fake(bytes)
    }

    fn resize(&self, bytes: &[u8], factor: f64) -> Result<Vec<u8>> {
        self.check()?;
        self.resizes.fetch_add(1, Ordering::SeqCst);
        let (w, h) = parse_fake(bytes)?;
        let scale = |d: u32| ((f64::from(d) * factor).round() as u32).max(1);
        Ok(fake_image(scale(w), scale(h), b"resized"))
    }
}

fn parse_fake(bytes: &[u8]) -> Result<(u32, u32)> {
    if bytes.len() < 16 || &bytes[..8] != MAGIC {
        return Err(ImgStoreError::ImageLibrary("not a fake image".to_string()));
    }
    let w = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
    let h = u32::from_le_bytes(bytes[12..16].try_into().unwrap());
    Ok((w, h))
}

/// Build a fake image of the given size; `payload` makes contents distinct
pub fn fake_image(width: u32, height: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Dimensions encoded in a fake image
pub fn fake_dimensions(bytes: &[u8]) -> (u32, u32) {
    parse_fake(bytes).unwrap()
}

/// Config used by most tests: thumb 64x64, small 256x256
pub fn test_config(max_files: u32) -> Config {
    Config::builder()
        .max_files(max_files)
        .thumb_res(64, 64)
        .small_res(256, 256)
        .build()
}

/// Fresh store in a temp dir, wired to a fake codec
pub fn setup_store(max_files: u32) -> (TempDir, PathBuf, ImgStore, Arc<FakeCodec>) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.imgst");
    let codec = FakeCodec::new();
    let store = ImgStore::create(&path, &test_config(max_files))
        .unwrap()
        .with_codec(codec.clone());
    (temp_dir, path, store, codec)
}

/// Reopen an existing store read-write with the given codec
pub fn reopen(path: &PathBuf, codec: &Arc<FakeCodec>) -> ImgStore {
    ImgStore::open(path, OpenMode::ReadWrite)
        .unwrap()
        .with_codec(codec.clone())
}

pub fn file_len(path: &PathBuf) -> u64 {
    std::fs::metadata(path).unwrap().len()
}
