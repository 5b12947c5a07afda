//! Error types for the scantext library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`BatchError`] — **Fatal**: the batch cannot proceed at all (output
//!   directory cannot be created, invalid configuration). Returned as
//!   `Err(BatchError)` from [`crate::batch::BatchOrchestrator::run`].
//!
//! * [`DocumentError`] — **Non-fatal**: a single document failed (corrupt
//!   PDF, zero pages, no recognisable text) but every other document in the
//!   batch is unaffected. Stored inside
//!   [`crate::outcome::ConversionOutcome::Failure`] and itemised in
//!   [`crate::outcome::BatchStats`] so callers get a complete post-run
//!   report rather than losing the whole corpus to one bad scan.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the scantext library.
///
/// Document-level failures use [`DocumentError`] and are folded into
/// [`crate::outcome::BatchStats`] rather than propagated here.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Could not create the output directory — the one unrecoverable
    /// precondition for a batch run.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error scoped to a single document.
///
/// Converted to [`crate::outcome::ConversionOutcome::Failure`] at the
/// document boundary; the batch continues with its siblings.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The source PDF could not be opened or a page could not be rendered.
    #[error("rasterisation failed: {detail}")]
    Rasterize { detail: String },

    /// Rasterisation succeeded but produced zero pages.
    #[error("no images extracted")]
    NoPages,

    /// Every page recognised to empty text; no artifact is written so a
    /// later resume check cannot mistake an empty file for a completed one.
    #[error("no text extracted")]
    NoText,

    /// Could not write the assembled artifact.
    #[error("failed to write artifact '{path}': {detail}")]
    ArtifactWrite { path: PathBuf, detail: String },

    /// A parallel worker panicked; caught at the worker boundary.
    #[error("worker panicked: {0}")]
    WorkerPanic(String),
}
