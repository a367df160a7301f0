//! Error types for the optimization pipeline.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Errors produced by the transcoding pipeline itself.
#[derive(Error, Debug, Clone)]
pub enum CompressError {
    /// The source bytes could not be parsed as an image
    #[error("Decode error: {0}")]
    Decode(String),
    /// Re-encoding produced no output or the encoder failed
    #[error("Encode error: {0}")]
    Encode(String),
}

/// Errors from the external metadata suggestion service.
///
/// These are deliberately non-fatal: the lifecycle controller maps any
/// variant to "keep existing metadata" and never to an item-level error.
#[derive(Error, Debug, Clone)]
pub enum MetadataError {
    /// The suggestion call failed (network, non-success status, timeout)
    #[error("Metadata service error: {0}")]
    Service(String),
    /// The service answered but the body could not be interpreted
    #[error("Invalid metadata response: {0}")]
    InvalidResponse(String),
}

/// Main error type for the pipeline.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    /// Compression (decode or encode) failed
    #[error(transparent)]
    Compress(#[from] CompressError),

    /// Metadata suggestion failed
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Unsupported or invalid image format
    #[error("Format error: {0}")]
    Format(String),
}

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

impl CompressError {
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }
}

impl MetadataError {
    pub fn service<T: Into<String>>(msg: T) -> Self {
        Self::Service(msg.into())
    }

    pub fn invalid_response<T: Into<String>>(msg: T) -> Self {
        Self::InvalidResponse(msg.into())
    }
}

impl PipelineError {
    pub fn format<T: Into<String>>(msg: T) -> Self {
        Self::Format(msg.into())
    }
}
