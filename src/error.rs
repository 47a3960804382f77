//! Error types for imgstore
//!
//! Provides a unified error type for all operations. The variants form a
//! closed set; each one maps to a stable numeric code that the CLI uses as
//! its exit status (0 is reserved for success).

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type alias using ImgStoreError
pub type Result<T> = std::result::Result<T, ImgStoreError>;

/// Unified error type for imgstore operations
#[derive(Debug, Error)]
pub enum ImgStoreError {
    // -------------------------------------------------------------------------
    // I/O and Memory Errors
    // -------------------------------------------------------------------------
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("(re|m|c)alloc failed")]
    OutOfMemory,

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Not enough arguments")]
    NotEnoughArguments,

    #[error("Invalid filename")]
    InvalidFilename,

    #[error("Invalid command")]
    InvalidCommand,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid max_files number")]
    InvalidMaxFiles,

    #[error("Invalid resolution(s)")]
    InvalidResolutions,

    #[error("Invalid image ID")]
    InvalidImageId,

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Full imgStore")]
    StoreFull,

    #[error("File not found")]
    FileNotFound,

    #[error("Not implemented (yet?)")]
    NotImplemented,

    #[error("Existing image ID")]
    DuplicateId,

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Image manipulation library error: {0}")]
    ImageLibrary(String),

    #[error("Debug")]
    Debug,
}

impl ImgStoreError {
    /// Numeric code of this error kind (1..=15, 0 means success)
    pub fn code(&self) -> i32 {
        match self {
            ImgStoreError::Io(_) => 1,
            ImgStoreError::OutOfMemory => 2,
            ImgStoreError::NotEnoughArguments => 3,
            ImgStoreError::InvalidFilename => 4,
            ImgStoreError::InvalidCommand => 5,
            ImgStoreError::InvalidArgument(_) => 6,
            ImgStoreError::InvalidMaxFiles => 7,
            ImgStoreError::InvalidResolutions => 8,
            ImgStoreError::InvalidImageId => 9,
            ImgStoreError::StoreFull => 10,
            ImgStoreError::FileNotFound => 11,
            ImgStoreError::NotImplemented => 12,
            ImgStoreError::DuplicateId => 13,
            ImgStoreError::ImageLibrary(_) => 14,
            ImgStoreError::Debug => 15,
        }
    }

    /// Shorthand for corrupt on-disk records
    pub(crate) fn invalid_data(msg: impl Into<String>) -> Self {
        ImgStoreError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            msg.into(),
        ))
    }
}

impl From<TryReserveError> for ImgStoreError {
    fn from(_: TryReserveError) -> Self {
        ImgStoreError::OutOfMemory
    }
}
