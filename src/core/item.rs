//! Per-image item model: identity, source bytes, derived sizes and status.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::preview::PreviewHandle;
use crate::core::types::CompressedImage;
use crate::metadata::ImageMetadata;
use crate::utils::{export_file_name, OutputFormat};

/// Raw input handed over by the upload boundary (drag-drop or file picker).
#[derive(Debug, Clone)]
pub struct Upload {
    /// Original file name as supplied by the host
    pub name: String,
    /// Declared content type, e.g. `image/jpeg`
    pub mime_type: String,
    /// Raw file bytes
    pub bytes: Arc<[u8]>,
}

impl Upload {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into().into(),
        }
    }
}

/// Immutable handle to the original uploaded binary content.
#[derive(Debug, Clone)]
pub struct SourceImage {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl SourceImage {
    pub(crate) fn from_upload(upload: &Upload) -> Self {
        Self {
            name: upload.name.clone(),
            mime_type: upload.mime_type.clone(),
            bytes: Arc::clone(&upload.bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    /// Byte length of the original upload.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Opaque item identifier, unique for the collection's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub(crate) u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// Lifecycle status of one item.
///
/// `Done` and `Error` are terminal until retriggered by a quality commit or
/// a metadata request; all transitions are driven by the collection's
/// lifecycle controller, never by metadata edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Created, initial compression not yet started
    Pending,
    /// A compression job is in flight (initial or quality-triggered)
    Compressing,
    /// A metadata suggestion call is in flight
    Analyzing,
    /// Last compression succeeded
    Done,
    /// Last compression failed
    Error,
}

impl ItemStatus {
    /// Whether a new compression or analysis job may start from this state.
    pub fn accepts_job(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

/// One uploaded image and all state derived from it.
#[derive(Debug, Clone)]
pub struct ImageItem {
    /// Stable identifier assigned at creation
    pub id: ItemId,
    /// Original upload, never mutated
    pub source: SourceImage,
    /// Revocable display handle, released once at removal
    pub preview: PreviewHandle,
    /// Output of the most recent successful compression
    pub result: Option<CompressedImage>,
    /// Lifecycle status
    pub status: ItemStatus,
    /// SEO metadata fields, independently editable
    pub metadata: ImageMetadata,
    /// Desired quality in `[0.1, 1.0]`; the next or current job targets this
    pub quality: f32,
    /// Quality the last started job was tagged with
    pub(crate) last_attempted_quality: Option<f32>,
    /// Human-readable message from the last failed job
    pub last_error: Option<String>,
}

impl ImageItem {
    /// Byte length of the original upload.
    pub fn original_size(&self) -> u64 {
        self.source.size()
    }

    /// Byte length of the compressed output, `0` until the first success.
    pub fn result_size(&self) -> u64 {
        self.result.as_ref().map(CompressedImage::size).unwrap_or(0)
    }

    /// Bytes saved by the last compression; negative when the output grew.
    pub fn saved_bytes(&self) -> i64 {
        match &self.result {
            Some(result) => self.original_size() as i64 - result.size() as i64,
            None => 0,
        }
    }

    /// Savings as a percentage of the original size.
    pub fn compression_ratio(&self) -> f64 {
        if self.result.is_none() || self.original_size() == 0 {
            return 0.0;
        }
        self.saved_bytes() as f64 / self.original_size() as f64 * 100.0
    }

    /// File name to hand to the download trigger, guaranteed to carry a
    /// recognized image extension.
    pub fn download_file_name(&self) -> String {
        let format = self
            .result
            .as_ref()
            .map(|r| r.format)
            .unwrap_or(OutputFormat::Jpeg);
        export_file_name(&self.metadata.file_name, format)
    }
}
