//! Core of a browser-style image optimization and metadata-tagging tool:
//! an aspect-ratio-preserving transcoding pipeline, a per-image lifecycle
//! state machine and the collection bookkeeping that keeps many concurrent
//! per-image jobs consistent.
//!
//! The presentational layer (upload wiring, preview rendering, download
//! trigger, the AI suggestion endpoint) stays outside this crate behind the
//! [`PreviewProvider`] and [`metadata::MetadataSuggester`] boundary traits.

// Module declarations in dependency order
pub mod collection;
pub mod core;
pub mod metadata;
pub mod processing;
pub mod utils;

// Public exports for external consumers
pub use crate::collection::ImageCollection;
pub use crate::core::{
    CompressedImage, CompressionSettings, ImageItem, ItemId, ItemStatus, NullPreviewProvider,
    PreviewHandle, PreviewProvider, SourceImage, Upload,
};
pub use crate::metadata::{HttpMetadataSuggester, ImageMetadata, MetadataPatch, MetadataSuggester};
pub use crate::processing::{compress, fit_width};
pub use crate::utils::{
    format_bytes, CompressError, MetadataError, OutputFormat, PipelineError, PipelineResult,
};
