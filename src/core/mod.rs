//! Core pipeline types and per-item state.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`ImageItem`]: one uploaded image and all state derived from it
//! - [`ItemStatus`]: the per-item lifecycle state machine states
//! - [`CompressionSettings`]: configuration for one compression pass
//! - [`PreviewProvider`]: boundary trait for revocable display handles

mod item;
mod preview;
mod types;

pub use item::{ImageItem, ItemId, ItemStatus, SourceImage, Upload};
pub use preview::{NullPreviewProvider, PreviewHandle, PreviewProvider};
pub use types::{
    clamp_quality, CompressedImage, CompressionSettings, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY,
};
