//! # imgstore
//!
//! A single-file image store with:
//! - Fixed header + metadata array, append-only content region
//! - Lazily computed thumbnail and small resolutions
//! - SHA-256 content deduplication across identifiers
//! - Tombstone deletion and compaction (garbage collection)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 CLI / SharedStore (callers)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        ImgStore                              │
//! │          insert / read / delete / list / materialize         │
//! └──────┬──────────────────────┬──────────────────────┬────────┘
//!        │                      │                      │
//!        ▼                      ▼                      ▼
//!  ┌───────────┐         ┌─────────────┐        ┌─────────────┐
//!  │   Dedup   │         │    Codec    │        │   Layout    │
//!  │ (SHA-256) │         │ dims/resize │        │  (records)  │
//!  └───────────┘         └─────────────┘        └──────┬──────┘
//!                                                      │
//!                                                      ▼
//!                                               ┌─────────────┐
//!                                               │    File     │
//!                                               └─────────────┘
//! ```
//!
//! `gc::compact` rebuilds a store by reading from one `ImgStore` and
//! inserting into another.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod layout;
pub mod codec;
pub mod dedup;
pub mod store;
pub mod gc;
pub mod shared;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ImgStoreError, Result};
pub use config::{Config, ResolutionConfig};
pub use codec::{ImageCodec, RasterCodec};
pub use layout::Resolution;
pub use store::{ImgStore, ListMode, OpenMode};
pub use gc::{compact, compact_with_codec, CompactStats};
pub use shared::SharedStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of imgstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
