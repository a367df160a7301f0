//! Upload acceptance checks.
//!
//! Ingest silently drops anything that is not plausibly a raster image:
//! the declared mime type must be `image/*` and the leading bytes must sniff
//! as a format the decoder understands.

use image::ImageFormat;
use tracing::debug;

use crate::core::Upload;

/// Formats the compressor can actually decode. Must stay in sync with the
/// decoder features enabled on the `image` dependency; accepting anything
/// the sniffer knows but the decoder does not would strand the item in
/// `error` instead of dropping it at the gate.
fn is_decodable(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Jpeg
            | ImageFormat::Png
            | ImageFormat::WebP
            | ImageFormat::Gif
            | ImageFormat::Bmp
            | ImageFormat::Tiff
    )
}

/// Returns true when the upload should enter the pipeline.
pub fn is_acceptable_upload(upload: &Upload) -> bool {
    if !upload.mime_type.starts_with("image/") {
        debug!(
            "Rejecting '{}': declared type '{}' is not an image",
            upload.name, upload.mime_type
        );
        return false;
    }

    if upload.bytes.is_empty() {
        debug!("Rejecting '{}': empty payload", upload.name);
        return false;
    }

    // Content sniff guards against mislabeled files; the declared type alone
    // is attacker/browser controlled.
    match image::guess_format(&upload.bytes) {
        Ok(format) if is_decodable(format) => true,
        Ok(format) => {
            debug!("Rejecting '{}': no decoder for sniffed {:?}", upload.name, format);
            false
        }
        Err(_) => {
            debug!("Rejecting '{}': content does not sniff as an image", upload.name);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest payload image::guess_format recognizes as PNG.
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn accepts_declared_image_with_image_content() {
        let upload = Upload::new("photo.png", "image/png", PNG_MAGIC);
        assert!(is_acceptable_upload(&upload));
    }

    #[test]
    fn rejects_non_image_mime_type() {
        let upload = Upload::new("doc.pdf", "application/pdf", PNG_MAGIC);
        assert!(!is_acceptable_upload(&upload));
    }

    #[test]
    fn rejects_mislabeled_text_content() {
        let upload = Upload::new("fake.png", "image/png", b"hello world".to_vec());
        assert!(!is_acceptable_upload(&upload));
    }

    #[test]
    fn rejects_empty_payload() {
        let upload = Upload::new("empty.jpg", "image/jpeg", Vec::new());
        assert!(!is_acceptable_upload(&upload));
    }

    #[test]
    fn accepts_gif_content() {
        // Minimal 1×1 GIF89a.
        let gif: &[u8] = &[
            0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00,
            0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
            0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3B,
        ];
        let upload = Upload::new("anim.gif", "image/gif", gif);
        assert!(is_acceptable_upload(&upload));
    }

    #[test]
    fn rejects_sniffable_format_without_a_decoder() {
        // ICO magic sniffs as an image but nothing here can decode it.
        let ico: &[u8] = &[0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x10, 0x10, 0x00, 0x00];
        let upload = Upload::new("favicon.ico", "image/x-icon", ico.to_vec());
        assert!(!is_acceptable_upload(&upload));
    }
}
