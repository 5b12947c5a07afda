//! # scantext
//!
//! Batch-convert directory trees of scanned PDF documents into plain-text
//! artifacts via an OCR pipeline.
//!
//! ## Why this crate?
//!
//! Text-layer extraction (pdftotext, pdf-extract) returns nothing useful
//! for scanned documents — the pages are images. scantext rasterises each
//! page, cleans it up (grayscale, median denoise, Otsu binarisation), runs
//! text recognition, and assembles one `<stem>.txt` artifact per PDF with
//! explicit page markers. It is built for corpora of thousands of files:
//! individual failures are recorded and never abort the batch, finished
//! documents are skipped on re-runs, and documents can be processed by a
//! bounded pool of parallel workers.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input tree
//!  │
//!  ├─ 1. Discover   recursive *.pdf walk (case-insensitive)
//!  ├─ 2. Rasterise  render each page via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Preprocess grayscale → median filter → Otsu → closing
//!  ├─ 4. Recognise  Tesseract (PSM 6, English) or an injected engine
//!  ├─ 5. Assemble   `--- Page N ---` markers, empty pages flagged
//!  └─ 6. Persist    atomic write of <stem>.txt + batch statistics
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scantext::{BatchConfig, BatchOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::builder()
//!         .dpi(300)
//!         .concurrency(4)
//!         .build()?;
//!     let stats = BatchOrchestrator::new(config)
//!         .run("scans/", "text_out/")
//!         .await?;
//!     println!("{}/{} documents converted", stats.successful, stats.total);
//!     for failure in &stats.failures {
//!         eprintln!("  {}: {}", failure.document, failure.reason);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `scantext` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `ocr`   | on      | Built-in Tesseract recogniser via leptess |
//!
//! Disable both when using only the orchestration library with injected
//! engines:
//! ```toml
//! scantext = { version = "0.3", default-features = false }
//! ```
//!
//! ## Testing without engines
//!
//! The rasterisation and recognition backends are injected trait objects
//! ([`Rasterizer`], [`Recognizer`]), so the whole pipeline — skip logic,
//! page ordering, failure isolation, parallel dispatch — runs under test
//! with fakes returning controlled page counts and text.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod progress;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::BatchOrchestrator;
pub use config::{BatchConfig, BatchConfigBuilder};
pub use document::DocumentConverter;
pub use error::{BatchError, DocumentError};
pub use outcome::{BatchStats, ConversionOutcome, DocumentFailure, DocumentReport};
pub use pipeline::discover::discover_documents;
pub use pipeline::preprocess::preprocess;
pub use pipeline::rasterize::{PdfiumRasterizer, RasterizeError, Rasterizer};
#[cfg(feature = "ocr")]
pub use pipeline::recognize::TesseractRecognizer;
pub use pipeline::recognize::{PageRecognizer, RecognizeError, Recognizer};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use store::{DocumentStore, ExtractedDocument, StoreError};
