//! Batch orchestration: discovery, dispatch, and statistics.
//!
//! ## Execution modes
//!
//! `concurrency <= 1` processes documents one at a time in discovery order.
//! `concurrency > 1` submits documents to a bounded worker pool built from
//! `futures::stream::buffer_unordered` over `spawn_blocking` tasks — every
//! document is processed exactly once, completion order is not defined, and
//! the final statistics are order-independent (the failure list is sorted
//! before being returned).
//!
//! ## Failure policy
//!
//! Document failures never cross this boundary: a worker-level panic is
//! caught at the join point and becomes a `Failure` outcome for that one
//! document. The only fatal error is the inability to create the output
//! directory.

use crate::config::BatchConfig;
use crate::document::DocumentConverter;
use crate::error::{BatchError, DocumentError};
use crate::outcome::{identifier, BatchStats, ConversionOutcome, DocumentReport};
use crate::pipeline::discover::discover_documents;
use crate::pipeline::rasterize::{PdfiumRasterizer, Rasterizer};
use crate::pipeline::recognize::{PageRecognizer, Recognizer};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Runs one batch: walks the corpus, converts every document, and folds
/// the outcomes into [`BatchStats`].
pub struct BatchOrchestrator {
    config: BatchConfig,
}

impl BatchOrchestrator {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Convert every PDF under `input_dir` into a text artifact in
    /// `output_dir`.
    ///
    /// Always returns complete statistics when the preconditions hold; no
    /// individual document can abort the run.
    ///
    /// # Errors
    /// Returns `Err(BatchError)` only for fatal conditions: the output
    /// directory cannot be created, or no recogniser is available.
    pub async fn run(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<BatchStats, BatchError> {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&output_dir).map_err(|e| BatchError::OutputDirCreateFailed {
            path: output_dir.clone(),
            source: e,
        })?;

        let documents = discover_documents(input_dir);
        info!("Found {} PDF files to process", documents.len());

        if documents.is_empty() {
            warn!("No PDF files found in the specified folder");
            return Ok(BatchStats::default());
        }

        if let Some(cb) = &self.config.progress {
            cb.on_batch_start(documents.len());
        }

        let converter = Arc::new(DocumentConverter::new(
            self.resolve_rasterizer(),
            PageRecognizer::new(self.resolve_recognizer()?),
            self.config.dpi,
            self.config.max_page_pixels,
        ));

        let reports = if self.config.concurrency > 1 {
            info!(
                "Processing {} PDFs with {} parallel workers",
                documents.len(),
                self.config.concurrency
            );
            self.run_parallel(documents.clone(), &output_dir, converter)
                .await
        } else {
            info!("Processing {} PDFs sequentially", documents.len());
            self.run_sequential(documents.clone(), &output_dir, converter)
                .await
        };

        let mut stats = BatchStats {
            total: documents.len(),
            ..Default::default()
        };
        for report in &reports {
            match &report.outcome {
                ConversionOutcome::Success { artifact } => {
                    info!("Success: {} → {}", report.source.display(), artifact.display());
                }
                ConversionOutcome::Skipped { .. } => {
                    info!("Skipped (already done): {}", report.source.display());
                }
                ConversionOutcome::Failure { error } => {
                    error!("Failed: {} - {}", report.source.display(), error);
                }
            }
            stats.record(report);
        }
        stats.finalise();

        info!(
            "Batch complete: {} total, {} successful, {} failed, output: {}",
            stats.total,
            stats.successful,
            stats.failed,
            output_dir.display()
        );
        for failure in &stats.failures {
            info!("  - {}: {}", failure.document, failure.reason);
        }

        if let Some(cb) = &self.config.progress {
            cb.on_batch_complete(stats.successful, stats.failed);
        }

        Ok(stats)
    }

    /// Synchronous wrapper around [`run`](Self::run).
    ///
    /// Creates a temporary tokio runtime internally.
    pub fn run_sync(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<BatchStats, BatchError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| BatchError::Internal(format!("Failed to create tokio runtime: {e}")))?
            .block_on(self.run(input_dir, output_dir))
    }

    /// One document at a time, in discovery order.
    async fn run_sequential(
        &self,
        documents: Vec<PathBuf>,
        output_dir: &Path,
        converter: Arc<DocumentConverter>,
    ) -> Vec<DocumentReport> {
        let mut reports = Vec::with_capacity(documents.len());
        for source in documents {
            reports.push(
                self.convert_one(source, output_dir.to_path_buf(), Arc::clone(&converter))
                    .await,
            );
        }
        reports
    }

    /// Bounded worker pool; outcomes are collected as they complete.
    async fn run_parallel(
        &self,
        documents: Vec<PathBuf>,
        output_dir: &Path,
        converter: Arc<DocumentConverter>,
    ) -> Vec<DocumentReport> {
        let output_dir = output_dir.to_path_buf();
        stream::iter(documents.into_iter().map(|source| {
            let converter = Arc::clone(&converter);
            let output_dir = output_dir.clone();
            self.convert_one(source, output_dir, converter)
        }))
        .buffer_unordered(self.config.concurrency)
        .collect()
        .await
    }

    /// Run one document inside `spawn_blocking`, translating a worker panic
    /// into a per-document failure.
    async fn convert_one(
        &self,
        source: PathBuf,
        output_dir: PathBuf,
        converter: Arc<DocumentConverter>,
    ) -> DocumentReport {
        let doc_id = identifier(&source);
        if let Some(cb) = &self.config.progress {
            cb.on_document_start(&doc_id);
        }

        let task_source = source.clone();
        let outcome =
            match tokio::task::spawn_blocking(move || converter.convert(&task_source, &output_dir))
                .await
            {
                Ok(outcome) => outcome,
                Err(join_err) => ConversionOutcome::Failure {
                    error: DocumentError::WorkerPanic(join_err.to_string()),
                },
            };

        if let Some(cb) = &self.config.progress {
            match &outcome {
                ConversionOutcome::Success { .. } => cb.on_document_complete(&doc_id),
                ConversionOutcome::Skipped { .. } => cb.on_document_skipped(&doc_id),
                ConversionOutcome::Failure { error } => {
                    cb.on_document_failed(&doc_id, &error.to_string())
                }
            }
        }

        DocumentReport { source, outcome }
    }

    fn resolve_rasterizer(&self) -> Arc<dyn Rasterizer> {
        match &self.config.rasterizer {
            Some(r) => Arc::clone(r),
            None => Arc::new(PdfiumRasterizer),
        }
    }

    /// Prefer an injected recogniser; fall back to the built-in Tesseract
    /// engine when the `ocr` feature is enabled.
    fn resolve_recognizer(&self) -> Result<Arc<dyn Recognizer>, BatchError> {
        if let Some(r) = &self.config.recognizer {
            return Ok(Arc::clone(r));
        }

        #[cfg(feature = "ocr")]
        {
            Ok(Arc::new(crate::pipeline::recognize::TesseractRecognizer::new(
                self.config.language.clone(),
            )))
        }

        #[cfg(not(feature = "ocr"))]
        {
            Err(BatchError::InvalidConfig(
                "no recogniser configured; enable the `ocr` feature or inject one via \
                 BatchConfigBuilder::recognizer"
                    .into(),
            ))
        }
    }
}
