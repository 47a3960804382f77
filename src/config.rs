//! Configuration for imgstore
//!
//! Creation-time parameters of a store, with sensible defaults.
//! Once a store file exists its capacity and resolution table are fixed;
//! they are read back from the header on open.

use crate::error::{ImgStoreError, Result};

/// Largest capacity a store may be created with
pub const MAX_MAX_FILES: u32 = 100_000;

/// Upper bound (per axis) of the thumbnail resolution
pub const MAX_THUMB_RES: u16 = 128;

/// Upper bound (per axis) of the small resolution
pub const MAX_SMALL_RES: u16 = 512;

/// Target dimensions of the two derived resolutions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionConfig {
    /// Thumbnail (width, height)
    pub thumb: (u16, u16),

    /// Small (width, height)
    pub small: (u16, u16),
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            thumb: (64, 64),
            small: (256, 256),
        }
    }
}

/// Main configuration for creating a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Capacity
    // -------------------------------------------------------------------------
    /// Number of metadata slots, fixed for the life of the file
    pub max_files: u32,

    // -------------------------------------------------------------------------
    // Derived Resolutions
    // -------------------------------------------------------------------------
    /// Target sizes for thumbnail and small images
    pub resolutions: ResolutionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_files: 10,
            resolutions: ResolutionConfig::default(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check capacity and resolution bounds
    pub fn validate(&self) -> Result<()> {
        if self.max_files == 0 || self.max_files > MAX_MAX_FILES {
            return Err(ImgStoreError::InvalidMaxFiles);
        }

        let in_bounds = |(w, h): (u16, u16), max: u16| w > 0 && h > 0 && w <= max && h <= max;
        if !in_bounds(self.resolutions.thumb, MAX_THUMB_RES)
            || !in_bounds(self.resolutions.small, MAX_SMALL_RES)
        {
            return Err(ImgStoreError::InvalidResolutions);
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the capacity (number of slots)
    pub fn max_files(mut self, max_files: u32) -> Self {
        self.config.max_files = max_files;
        self
    }

    /// Set the thumbnail target resolution
    pub fn thumb_res(mut self, width: u16, height: u16) -> Self {
        self.config.resolutions.thumb = (width, height);
        self
    }

    /// Set the small target resolution
    pub fn small_res(mut self, width: u16, height: u16) -> Self {
        self.config.resolutions.small = (width, height);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
