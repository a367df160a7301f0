//! HTTP-backed metadata suggester.
//!
//! Posts the image as a base64 data URL to a vision-model endpoint and
//! expects a JSON object with `title`, `altText`, `caption` and `fileName`
//! string fields. Every failure mode maps to [`MetadataError`]; callers do
//! not distinguish causes.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::metadata::{ImageMetadata, MetadataSuggester};
use crate::utils::MetadataError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Suggester that calls a JSON-over-HTTP vision endpoint.
pub struct HttpMetadataSuggester {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMetadataSuggester {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl MetadataSuggester for HttpMetadataSuggester {
    async fn suggest(&self, bytes: &[u8], mime_type: &str) -> Result<ImageMetadata, MetadataError> {
        let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes));
        let request_body = serde_json::json!({ "image": data_url });

        debug!("Requesting metadata suggestion ({} input bytes)", bytes.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| MetadataError::service(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(MetadataError::service(format!(
                "Service returned status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MetadataError::invalid_response(format!("Body is not JSON: {e}")))?;

        parse_suggestion(&body)
    }
}

/// Extracts the four suggested fields from the response body.
fn parse_suggestion(body: &serde_json::Value) -> Result<ImageMetadata, MetadataError> {
    let field = |name: &str| -> Result<String, MetadataError> {
        body[name]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| MetadataError::invalid_response(format!("Missing field: {name}")))
    };

    Ok(ImageMetadata {
        title: field("title")?,
        alt_text: field("altText")?,
        caption: field("caption")?,
        file_name: field("fileName")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_response() {
        let body = serde_json::json!({
            "title": "Sunset over harbor",
            "altText": "Orange sunset reflecting on calm harbor water",
            "caption": "Golden hour at the marina",
            "fileName": "sunset-harbor",
        });

        let meta = parse_suggestion(&body).unwrap();
        assert_eq!(meta.title, "Sunset over harbor");
        assert_eq!(meta.file_name, "sunset-harbor");
    }

    #[test]
    fn missing_field_is_invalid_response() {
        let body = serde_json::json!({ "title": "only a title" });
        assert!(matches!(
            parse_suggestion(&body),
            Err(MetadataError::InvalidResponse(_))
        ));
    }

    #[test]
    fn non_string_field_is_invalid_response() {
        let body = serde_json::json!({
            "title": "t", "altText": "a", "caption": "c", "fileName": 42,
        });
        assert!(parse_suggestion(&body).is_err());
    }
}
