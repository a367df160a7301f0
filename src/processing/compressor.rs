//! The transcoding pipeline: decode → fit-to-width resize → re-encode.
//!
//! `compress` is pure and CPU-bound; the lifecycle controller runs it inside
//! `tokio::task::spawn_blocking` so the async runtime is never blocked.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

use crate::core::{clamp_quality, CompressedImage, CompressionSettings};
use crate::utils::{CompressError, OutputFormat};

/// Computes output dimensions that fit `max_width` while preserving aspect
/// ratio. Sources at or below the bound pass through unchanged; the pipeline
/// never upscales.
pub fn fit_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let scaled = (height as f64 * max_width as f64 / width as f64).round() as u32;
    (max_width, scaled)
}

/// Maps the `[0.1, 1.0]` quality dial onto the JPEG encoder's 1-100 scale.
fn encoder_quality(quality: f32) -> u8 {
    (clamp_quality(quality) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Decodes `bytes`, resizes to fit `settings.max_width` and re-encodes into
/// `settings.format` at `settings.quality`.
///
/// The source is never mutated. Deterministic: the same input and settings
/// always produce identically sized output.
pub fn compress(bytes: &[u8], settings: &CompressionSettings) -> Result<CompressedImage, CompressError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| CompressError::decode(format!("Cannot parse source image: {e}")))?;

    let (src_w, src_h) = (decoded.width(), decoded.height());
    let (out_w, out_h) = fit_width(src_w, src_h, settings.max_width);

    let surface = if (out_w, out_h) == (src_w, src_h) {
        decoded
    } else {
        decoded.resize_exact(out_w, out_h, FilterType::Lanczos3)
    };

    let bytes = encode(&surface, settings)?;
    if bytes.is_empty() {
        return Err(CompressError::encode("Encoder produced no output"));
    }

    debug!(
        "Compressed {}×{} → {}×{} ({} bytes, q={:.2})",
        src_w, src_h, out_w, out_h, bytes.len(), settings.quality
    );

    Ok(CompressedImage {
        bytes,
        width: out_w,
        height: out_h,
        format: settings.format,
    })
}

/// Encodes the surface into the target format.
///
/// JPEG honours the quality dial; PNG and WebP are written losslessly, so
/// quality only affects them through the resize pass.
fn encode(surface: &DynamicImage, settings: &CompressionSettings) -> Result<Vec<u8>, CompressError> {
    let mut out = Cursor::new(Vec::new());

    match settings.format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel; flatten before encoding.
            let rgb = surface.to_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut out, encoder_quality(settings.quality));
            rgb.write_with_encoder(encoder)
                .map_err(|e| CompressError::encode(format!("JPEG encode failed: {e}")))?;
        }
        OutputFormat::Png => {
            surface
                .write_with_encoder(PngEncoder::new(&mut out))
                .map_err(|e| CompressError::encode(format!("PNG encode failed: {e}")))?;
        }
        OutputFormat::WebP => {
            let rgba = surface.to_rgba8();
            rgba.write_with_encoder(WebPEncoder::new_lossless(&mut out))
                .map_err(|e| CompressError::encode(format!("WebP encode failed: {e}")))?;
        }
    }

    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// Renders a gradient test image and returns it PNG-encoded.
    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_with_encoder(PngEncoder::new(&mut out))
            .unwrap();
        out.into_inner()
    }

    fn jpeg_settings(quality: f32, max_width: u32) -> CompressionSettings {
        CompressionSettings {
            quality,
            max_width,
            format: OutputFormat::Jpeg,
        }
    }

    #[test]
    fn fit_width_never_upscales() {
        assert_eq!(fit_width(800, 600, 1920), (800, 600));
        assert_eq!(fit_width(1920, 1080, 1920), (1920, 1080));
    }

    #[test]
    fn fit_width_preserves_aspect_ratio() {
        assert_eq!(fit_width(3000, 2000, 1920), (1920, 1280));
        // Odd ratio rounds rather than truncates: 1001 * 500/1000 = 500.5 → 501
        assert_eq!(fit_width(1000, 1001, 500), (500, 501));
    }

    #[test]
    fn wide_source_is_scaled_to_max_width() {
        let source = png_fixture(3000, 2000);
        let result = compress(&source, &jpeg_settings(0.7, 1920)).unwrap();
        assert_eq!((result.width, result.height), (1920, 1280));
        assert!(result.size() > 0);
    }

    #[test]
    fn narrow_source_keeps_dimensions() {
        let source = png_fixture(800, 600);
        let result = compress(&source, &jpeg_settings(0.7, 1920)).unwrap();
        assert_eq!((result.width, result.height), (800, 600));
    }

    #[test]
    fn same_settings_encode_deterministically() {
        let source = png_fixture(640, 480);
        let settings = jpeg_settings(0.5, 1920);
        let a = compress(&source, &settings).unwrap();
        let b = compress(&source, &settings).unwrap();
        assert_eq!(a.size(), b.size());
    }

    #[test]
    fn lower_quality_does_not_grow_output() {
        let source = png_fixture(640, 480);
        let high = compress(&source, &jpeg_settings(0.9, 1920)).unwrap();
        let low = compress(&source, &jpeg_settings(0.3, 1920)).unwrap();
        assert!(low.size() <= high.size());
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let err = compress(b"not an image at all", &jpeg_settings(0.7, 1920)).unwrap_err();
        assert!(matches!(err, CompressError::Decode(_)));
    }

    #[test]
    fn png_output_round_trips_through_decoder() {
        let source = png_fixture(100, 50);
        let settings = CompressionSettings {
            quality: 0.7,
            max_width: 1920,
            format: OutputFormat::Png,
        };
        let result = compress(&source, &settings).unwrap();
        let reparsed = image::load_from_memory(&result.bytes).unwrap();
        assert_eq!((reparsed.width(), reparsed.height()), (100, 50));
    }
}
