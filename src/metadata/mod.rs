//! SEO metadata fields and the suggestion-service boundary.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::MetadataError;

pub use http::HttpMetadataSuggester;

/// Free-form SEO metadata attached to each item.
///
/// All fields start empty except `file_name`, which is derived from the
/// uploaded name at ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub title: String,
    pub alt_text: String,
    pub caption: String,
    pub file_name: String,
}

/// Partial metadata update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPatch {
    pub title: Option<String>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub file_name: Option<String>,
}

impl ImageMetadata {
    /// Merges the set fields of `patch` into `self`.
    pub fn apply(&mut self, patch: MetadataPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(alt_text) = patch.alt_text {
            self.alt_text = alt_text;
        }
        if let Some(caption) = patch.caption {
            self.caption = caption;
        }
        if let Some(file_name) = patch.file_name {
            self.file_name = file_name;
        }
    }
}

/// Boundary trait for the external AI suggestion call.
///
/// Implementations receive the raw upload bytes and the declared mime type
/// and return a complete set of suggested fields. Failures are opaque to the
/// caller; the lifecycle controller maps every error to "keep existing
/// metadata" and never to an item-level error state.
#[async_trait]
pub trait MetadataSuggester: Send + Sync {
    async fn suggest(&self, bytes: &[u8], mime_type: &str) -> Result<ImageMetadata, MetadataError>;
}
