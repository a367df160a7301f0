use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::utils::PipelineError;

/// Output formats the re-encode step can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Whether the quality dial affects this format's encoder.
    ///
    /// JPEG is the lossy path; PNG and WebP encode losslessly here, so
    /// quality changes only retrigger the resize/re-encode pass.
    pub fn is_lossy(&self) -> bool {
        matches!(self, Self::Jpeg)
    }

    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            Self::Jpeg => &["jpg", "jpeg"],
            Self::Png => &["png"],
            Self::WebP => &["webp"],
        }
    }

    /// Check if the extension matches this format
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions().contains(&ext.as_str())
    }

    /// Get the primary extension for this format
    pub fn primary_extension(&self) -> &str {
        self.extensions()[0]
    }

    /// MIME type the encoded output declares.
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = PipelineError;

    fn from_str(ext: &str) -> Result<Self, Self::Err> {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            _ => Err(PipelineError::format(format!(
                "Unsupported image format: {}", ext
            ))),
        }
    }
}

/// True when `ext` (without the dot) is any extension of a supported format.
pub fn is_recognized_extension(ext: &str) -> bool {
    OutputFormat::from_str(ext).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpg_and_jpeg_both_parse() {
        assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("JPEG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!("tiff".parse::<OutputFormat>().is_err());
        assert!(!is_recognized_extension("bmp"));
    }

    #[test]
    fn only_jpeg_is_lossy() {
        assert!(OutputFormat::Jpeg.is_lossy());
        assert!(!OutputFormat::Png.is_lossy());
        assert!(!OutputFormat::WebP.is_lossy());
    }

    #[test]
    fn primary_extension_matches_itself() {
        for fmt in [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP] {
            assert!(fmt.matches_extension(fmt.primary_extension()));
        }
    }
}
