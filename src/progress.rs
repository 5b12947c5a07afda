//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress`] to receive real-time
//! events as the orchestrator works through the corpus.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a progress bar, a database record, or a channel of
//! their own — without the library knowing anything about how the host
//! application communicates. The trait is `Send + Sync` so it works
//! correctly when documents are processed concurrently.

use std::sync::Arc;

/// Called by the batch orchestrator as it processes each document.
///
/// Implementations must be `Send + Sync` (documents may be processed
/// concurrently). All methods have default no-op implementations so callers
/// only override what they care about.
///
/// # Thread safety
///
/// With `concurrency > 1`, the per-document methods may be called
/// concurrently from different worker tasks. Implementations must protect
/// shared mutable state with appropriate synchronisation primitives
/// (e.g. `Mutex`, `AtomicUsize`).
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after discovery, before any document is processed.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a document's conversion begins.
    fn on_document_start(&self, document: &str) {
        let _ = document;
    }

    /// Called when a document is skipped because its artifact already exists.
    fn on_document_skipped(&self, document: &str) {
        let _ = document;
    }

    /// Called when a document's artifact is written successfully.
    fn on_document_complete(&self, document: &str) {
        let _ = document;
    }

    /// Called when a document fails.
    fn on_document_failed(&self, document: &str, reason: &str) {
        let _ = (document, reason);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, successful: usize, failed: usize) {
        let _ = (successful, failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        skips: AtomicUsize,
        completes: AtomicUsize,
        failures: AtomicUsize,
        announced_total: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_batch_start(&self, total_documents: usize) {
            self.announced_total.store(total_documents, Ordering::SeqCst);
        }

        fn on_document_start(&self, _document: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_skipped(&self, _document: &str) {
            self.skips.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_complete(&self, _document: &str) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_failed(&self, _document: &str, _reason: &str) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(3);
        cb.on_document_start("a");
        cb.on_document_skipped("a");
        cb.on_document_complete("b");
        cb.on_document_failed("c", "no text extracted");
        cb.on_batch_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            skips: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            announced_total: AtomicUsize::new(0),
        };

        tracker.on_batch_start(3);
        assert_eq!(tracker.announced_total.load(Ordering::SeqCst), 3);

        tracker.on_document_start("a");
        tracker.on_document_complete("a");
        tracker.on_document_start("b");
        tracker.on_document_skipped("b");
        tracker.on_document_start("c");
        tracker.on_document_failed("c", "rasterisation failed: truncated file");

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.skips.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.failures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn BatchProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_document_start("doc");
        cb.on_document_complete("doc");
    }
}
