//! Core types for compression settings and results.

use serde::{Deserialize, Serialize};
use crate::utils::OutputFormat;

/// Default quality used for a freshly ingested item.
pub const DEFAULT_QUALITY: f32 = 0.7;
/// Default width bound; sources narrower than this are never upscaled.
pub const DEFAULT_MAX_WIDTH: u32 = 1920;

/// Configuration for one compression pass.
///
/// Quality is a real number in `[0.1, 1.0]` mapped onto the encoder's own
/// scale; `max_width` bounds the output width while preserving aspect ratio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompressionSettings {
    /// Quality/compression trade-off in `[0.1, 1.0]`
    pub quality: f32,
    /// Maximum output width in pixels
    #[serde(rename = "maxWidth")]
    pub max_width: u32,
    /// Re-encode target format
    #[serde(rename = "outputFormat")]
    pub format: OutputFormat,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            max_width: DEFAULT_MAX_WIDTH,
            format: OutputFormat::Jpeg,
        }
    }
}

impl CompressionSettings {
    /// Returns a copy with `quality` clamped into the supported range.
    pub fn with_quality(self, quality: f32) -> Self {
        Self {
            quality: clamp_quality(quality),
            ..self
        }
    }
}

/// Clamps a requested quality into the supported `[0.1, 1.0]` range.
pub fn clamp_quality(quality: f32) -> f32 {
    quality.clamp(0.1, 1.0)
}

/// Binary output of one successful compression pass.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    /// Encoded output bytes
    pub bytes: Vec<u8>,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Format the bytes are encoded in
    pub format: OutputFormat,
}

impl CompressedImage {
    /// Byte length of the encoded output.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_is_clamped_into_range() {
        assert_eq!(clamp_quality(0.0), 0.1);
        assert_eq!(clamp_quality(1.5), 1.0);
        assert_eq!(clamp_quality(0.7), 0.7);
    }

    #[test]
    fn default_settings_match_ingest_defaults() {
        let s = CompressionSettings::default();
        assert_eq!(s.quality, DEFAULT_QUALITY);
        assert_eq!(s.max_width, DEFAULT_MAX_WIDTH);
        assert_eq!(s.format, OutputFormat::Jpeg);
    }
}
