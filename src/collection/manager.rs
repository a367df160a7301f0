//! Collection manager and per-item lifecycle controller.
//!
//! One [`ImageCollection`] owns the ordered set of uploaded items and drives
//! every status transition. Compression runs on the blocking thread pool via
//! `tokio::task::spawn_blocking`; all bookkeeping happens under a single
//! async mutex, with preconditions re-checked after every await so a stale
//! completion can never clobber newer state.
//!
//! Stale-result suppression: each job carries the quality it was started
//! for. On completion the controller applies the result only when the item
//! still exists and its desired quality still equals the tag; otherwise the
//! result is dropped and a superseding job starts at the latest desired
//! quality. This keeps at most one job in flight per item.

use std::sync::Arc;

use tokio::sync::{Mutex, Notify};
use tracing::{debug, info, warn};

use crate::core::{
    clamp_quality, CompressionSettings, ImageItem, ItemId, ItemStatus, PreviewProvider,
    SourceImage, Upload,
};
use crate::metadata::{ImageMetadata, MetadataPatch, MetadataSuggester};
use crate::processing::{compress, is_acceptable_upload};
use crate::utils::{default_file_name, format_bytes, CompressError};

struct CollectionState {
    items: Vec<ImageItem>,
    next_id: u64,
    in_flight: usize,
}

struct Inner {
    state: Mutex<CollectionState>,
    preview: Arc<dyn PreviewProvider>,
    suggester: Option<Arc<dyn MetadataSuggester>>,
    settings: CompressionSettings,
    idle: Notify,
}

/// Cloneable handle to the shared collection.
#[derive(Clone)]
pub struct ImageCollection {
    inner: Arc<Inner>,
}

impl ImageCollection {
    pub fn new(preview: Arc<dyn PreviewProvider>) -> Self {
        Self::with_options(preview, CompressionSettings::default(), None)
    }

    pub fn with_settings(preview: Arc<dyn PreviewProvider>, settings: CompressionSettings) -> Self {
        Self::with_options(preview, settings, None)
    }

    /// Full constructor; pass `Some(suggester)` to enable metadata
    /// suggestion requests.
    pub fn with_options(
        preview: Arc<dyn PreviewProvider>,
        settings: CompressionSettings,
        suggester: Option<Arc<dyn MetadataSuggester>>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(CollectionState {
                    items: Vec::new(),
                    next_id: 0,
                    in_flight: 0,
                }),
                preview,
                suggester,
                settings,
                idle: Notify::new(),
            }),
        }
    }

    // ── Ingest ───────────────────────────────────────────────────────────────

    /// Filters `uploads` to recognized image content, creates one item per
    /// accepted input in upload order and schedules its initial compression.
    /// Rejected inputs are silently dropped.
    pub async fn ingest(&self, uploads: Vec<Upload>) -> Vec<ItemId> {
        let mut accepted = Vec::new();
        let mut state = self.inner.state.lock().await;

        for upload in uploads {
            if !is_acceptable_upload(&upload) {
                continue;
            }

            let id = ItemId(state.next_id);
            state.next_id += 1;

            let source = SourceImage::from_upload(&upload);
            let preview = self.inner.preview.create(&source);
            let metadata = ImageMetadata {
                file_name: default_file_name(&upload.name),
                ..Default::default()
            };

            debug!(
                "Ingested '{}' as {} ({} bytes)",
                upload.name,
                id,
                source.size()
            );

            state.items.push(ImageItem {
                id,
                source,
                preview,
                result: None,
                status: ItemStatus::Pending,
                metadata,
                quality: clamp_quality(self.inner.settings.quality),
                last_attempted_quality: None,
                last_error: None,
            });
            accepted.push(id);
        }

        // Initial compression starts without further user action.
        let quality = clamp_quality(self.inner.settings.quality);
        for &id in &accepted {
            self.spawn_compression(&mut state, id, quality);
        }

        info!("Ingest accepted {} item(s)", accepted.len());
        accepted
    }

    // ── Quality commits ──────────────────────────────────────────────────────

    /// Commits a new quality for `id` (slider release, not in-drag values).
    ///
    /// A commit equal to the last attempted quality is a no-op. While a job
    /// is already in flight only the desired value is recorded; the running
    /// job's completion discards its stale result and respawns at the latest
    /// value. Unknown ids are ignored.
    pub async fn commit_quality(&self, id: ItemId, quality: f32) {
        let quality = clamp_quality(quality);
        let mut state = self.inner.state.lock().await;

        let Some(item) = state.items.iter_mut().find(|i| i.id == id) else {
            return;
        };

        if item.last_attempted_quality == Some(quality) && item.status != ItemStatus::Compressing {
            debug!("{}: quality {:.2} already applied, ignoring commit", id, quality);
            return;
        }

        item.quality = quality;

        match item.status {
            // A job is (or will shortly be) in flight; latest value wins when
            // it completes.
            ItemStatus::Pending | ItemStatus::Compressing | ItemStatus::Analyzing => {
                debug!("{}: queued quality {:.2} behind in-flight job", id, quality);
            }
            ItemStatus::Done | ItemStatus::Error => {
                debug!("{}: recompressing at quality {:.2}", id, quality);
                // Flip before the job task runs so a second commit in the
                // same window takes the record-only path above.
                item.status = ItemStatus::Compressing;
                self.spawn_compression(&mut state, id, quality);
            }
        }
    }

    // ── Metadata ─────────────────────────────────────────────────────────────

    /// Merges `patch` into the item's metadata. Allowed in any state; unknown
    /// ids are ignored. Never touches `status`.
    pub async fn update_metadata(&self, id: ItemId, patch: MetadataPatch) {
        let mut state = self.inner.state.lock().await;
        if let Some(item) = state.items.iter_mut().find(|i| i.id == id) {
            item.metadata.apply(patch);
        }
    }

    /// Requests AI-suggested metadata for `id`.
    ///
    /// Only starts from `done` or `error`. The item moves to `analyzing` and
    /// always lands back on `done`; a failed call leaves metadata unchanged
    /// and is not surfaced as an item-level error.
    pub async fn request_metadata(&self, id: ItemId) {
        let Some(suggester) = self.inner.suggester.clone() else {
            warn!("{}: no metadata suggester configured", id);
            return;
        };

        let (bytes, mime_type) = {
            let mut state = self.inner.state.lock().await;
            let Some(item) = state.items.iter_mut().find(|i| i.id == id) else {
                return;
            };
            if !item.status.accepts_job() {
                debug!("{}: busy ({:?}), ignoring metadata request", id, item.status);
                return;
            }
            item.status = ItemStatus::Analyzing;
            let bytes = Arc::clone(item.source.bytes());
            let mime_type = item.source.mime_type().to_string();
            state.in_flight += 1;
            (bytes, mime_type)
        };

        let this = self.clone();
        tokio::spawn(async move {
            let suggestion = suggester.suggest(&bytes, &mime_type).await;
            this.finish_analysis(id, suggestion.ok()).await;
        });
    }

    // ── Removal ──────────────────────────────────────────────────────────────

    /// Removes `id`, revoking its preview handle. Returns false for unknown
    /// ids. An in-flight job for the item finishes in the background and its
    /// completion is discarded.
    pub async fn remove(&self, id: ItemId) -> bool {
        let mut state = self.inner.state.lock().await;
        let Some(index) = state.items.iter().position(|i| i.id == id) else {
            return false;
        };

        let item = state.items.remove(index);
        self.inner.preview.revoke(&item.preview);
        debug!("Removed {}", id);
        true
    }

    /// Removes every item, revoking all preview handles.
    pub async fn clear(&self) {
        let mut state = self.inner.state.lock().await;
        for item in state.items.drain(..) {
            self.inner.preview.revoke(&item.preview);
        }
        info!("Collection cleared");
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    /// Snapshot of all items in upload order.
    pub async fn items(&self) -> Vec<ImageItem> {
        self.inner.state.lock().await.items.clone()
    }

    pub async fn get(&self, id: ItemId) -> Option<ImageItem> {
        self.inner
            .state
            .lock()
            .await
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.state.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.state.lock().await.items.is_empty()
    }

    /// Resolves once no compression or analysis job is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a wakeup between the check and the
            // await is not lost.
            notified.as_mut().enable();
            if self.inner.state.lock().await.in_flight == 0 {
                return;
            }
            notified.await;
        }
    }

    // ── Job lifecycle (private) ──────────────────────────────────────────────

    /// Registers a compression job for `id` tagged with `quality` and spawns
    /// it. Caller holds the state lock, so the in-flight count is bumped
    /// before any completion can race with it.
    fn spawn_compression(&self, state: &mut CollectionState, id: ItemId, quality: f32) {
        state.in_flight += 1;
        let this = self.clone();
        tokio::spawn(async move {
            this.run_compression(id, quality).await;
        });
    }

    async fn run_compression(&self, id: ItemId, quality: f32) {
        let source = {
            let mut state = self.inner.state.lock().await;
            let Some(item) = state.items.iter_mut().find(|i| i.id == id) else {
                // Removed before the job started.
                debug!("{}: removed before compression started", id);
                self.finish_job(&mut state);
                return;
            };
            item.status = ItemStatus::Compressing;
            item.last_attempted_quality = Some(quality);
            Arc::clone(item.source.bytes())
        };

        let settings = self.inner.settings.with_quality(quality);
        let outcome = tokio::task::spawn_blocking(move || compress(&source, &settings))
            .await
            .unwrap_or_else(|e| Err(CompressError::encode(format!("Compression job panicked: {e}"))));

        let mut state = self.inner.state.lock().await;
        let Some(item) = state.items.iter_mut().find(|i| i.id == id) else {
            debug!("{}: discarding completion for removed item", id);
            self.finish_job(&mut state);
            return;
        };

        // Superseded by a newer quality commit: drop this result and run the
        // latest requested value instead.
        if item.quality != quality {
            let latest = item.quality;
            debug!(
                "{}: discarding stale result for q={:.2}, requeueing q={:.2}",
                id, quality, latest
            );
            self.spawn_compression(&mut state, id, latest);
            self.finish_job(&mut state);
            return;
        }

        match outcome {
            Ok(compressed) => {
                debug!(
                    "{}: compressed to {} ({}×{})",
                    id,
                    format_bytes(compressed.size()),
                    compressed.width,
                    compressed.height
                );
                item.result = Some(compressed);
                item.status = ItemStatus::Done;
                item.last_error = None;
            }
            Err(e) => {
                warn!("{}: compression failed: {}", id, e);
                // Prior result, if any, stays valid.
                item.status = ItemStatus::Error;
                item.last_error = Some(e.to_string());
            }
        }
        self.finish_job(&mut state);
    }

    async fn finish_analysis(&self, id: ItemId, suggestion: Option<ImageMetadata>) {
        let mut state = self.inner.state.lock().await;
        let Some(item) = state.items.iter_mut().find(|i| i.id == id) else {
            debug!("{}: discarding metadata for removed item", id);
            self.finish_job(&mut state);
            return;
        };

        match suggestion {
            Some(metadata) => {
                debug!("{}: applying suggested metadata", id);
                item.metadata = metadata;
            }
            // Failure is invisible as a status: keep fields, return to done.
            None => debug!("{}: metadata suggestion failed, keeping existing fields", id),
        }
        // A quality commit that arrived during analysis still needs a job.
        if item.last_attempted_quality != Some(item.quality) {
            let quality = item.quality;
            item.status = ItemStatus::Compressing;
            self.spawn_compression(&mut state, id, quality);
            self.finish_job(&mut state);
            return;
        }
        item.status = ItemStatus::Done;
        self.finish_job(&mut state);
    }

    /// Decrements the in-flight count and wakes idle waiters at zero.
    fn finish_job(&self, state: &mut CollectionState) {
        state.in_flight -= 1;
        if state.in_flight == 0 {
            self.inner.idle.notify_waiters();
        }
    }
}
