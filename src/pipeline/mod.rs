//! Pipeline stages for batch PDF-to-text conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different rasterisation backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ rasterize ──▶ preprocess ──▶ recognize
//! (corpus)     (pdfium)      (cleanup)      (tesseract)
//! ```
//!
//! 1. [`discover`]   — recursively find eligible PDFs under the input root
//! 2. [`rasterize`]  — render each page to a raster image; the backend is an
//!    injected [`rasterize::Rasterizer`] so tests never need pdfium
//! 3. [`preprocess`] — grayscale, denoise, binarise, and despeckle one page
//! 4. [`recognize`]  — turn the cleaned page into trimmed text via an
//!    injected [`recognize::Recognizer`]; the only stage allowed to fail
//!    softly (a bad page becomes empty text, never a document failure)

pub mod discover;
pub mod preprocess;
pub mod rasterize;
pub mod recognize;
