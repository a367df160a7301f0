//! Revocable preview handles for uploaded images.
//!
//! The display layer owns the actual rendering resource (an object URL in a
//! browser host, a texture elsewhere). The core only needs to request a
//! handle at ingest and revoke it exactly once when the item is removed;
//! dropping a handle never releases the underlying resource implicitly.

use crate::core::item::SourceImage;

/// Opaque, revocable reference to a displayable rendering of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHandle {
    token: String,
}

impl PreviewHandle {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    /// The provider-assigned token backing this handle.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Boundary trait implemented by the display layer.
pub trait PreviewProvider: Send + Sync {
    /// Creates a displayable handle for the given source.
    fn create(&self, source: &SourceImage) -> PreviewHandle;

    /// Releases the resource behind `handle`. Called exactly once per handle,
    /// at item removal or collection teardown.
    fn revoke(&self, handle: &PreviewHandle);
}

/// Provider for headless use: hands out tokens, releases nothing.
#[derive(Debug, Default)]
pub struct NullPreviewProvider;

impl PreviewProvider for NullPreviewProvider {
    fn create(&self, source: &SourceImage) -> PreviewHandle {
        PreviewHandle::new(format!("null:{}", source.name()))
    }

    fn revoke(&self, _handle: &PreviewHandle) {}
}
