//! Text recognition: cleaned page image → trimmed text.
//!
//! The engine sits behind the [`Recognizer`] trait so the pipeline can be
//! tested without linking an OCR stack. The built-in implementation
//! ([`TesseractRecognizer`], `ocr` feature) drives Tesseract via leptess,
//! configured for scanned documents: a single uniform block of text,
//! inter-word spacing preserved, English model by default.
//!
//! Recognition failure is never fatal to a document: [`PageRecognizer`]
//! converts any engine error into empty text and a warning, so one
//! unreadable page costs one `[No text extracted]` marker, not the whole
//! artifact.

use crate::pipeline::preprocess::preprocess;
use image::{DynamicImage, GrayImage};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Errors from the recognition capability.
#[derive(Debug, Clone, Error)]
pub enum RecognizeError {
    /// The engine itself failed (initialisation, internal error).
    #[error("recognition engine error: {detail}")]
    Engine { detail: String },

    /// The page image could not be consumed by the engine.
    #[error("malformed page image: {detail}")]
    BadImage { detail: String },
}

/// Opaque recognition capability: binary page image → text.
///
/// Implementations are stateless from the caller's perspective; the same
/// value may be shared across worker threads.
pub trait Recognizer: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<String, RecognizeError>;
}

/// Recognises one page: preprocess, invoke the engine, trim.
///
/// Stateless; owns only an `Arc` to the engine.
#[derive(Clone)]
pub struct PageRecognizer {
    engine: Arc<dyn Recognizer>,
}

impl PageRecognizer {
    pub fn new(engine: Arc<dyn Recognizer>) -> Self {
        Self { engine }
    }

    /// Recognise one page image, returning trimmed text.
    ///
    /// Empty text is a valid result. Engine errors are logged as warnings
    /// and also yield empty text — a single bad page never fails the
    /// document.
    pub fn recognize_page(&self, page_num: usize, image: &DynamicImage) -> String {
        let cleaned = preprocess(image);
        match self.engine.recognize(&cleaned) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("Recognition failed for page {page_num}: {e}");
                String::new()
            }
        }
    }
}

/// Tesseract-backed recogniser (leptess).
///
/// A fresh engine is constructed per call: leptess handles are not `Sync`,
/// and per-page engine setup is noise next to the recognition itself. The
/// configuration matches the scanned-document assumption — PSM 6 (single
/// uniform block of text) with inter-word spaces preserved.
#[cfg(feature = "ocr")]
pub struct TesseractRecognizer {
    language: String,
}

#[cfg(feature = "ocr")]
impl TesseractRecognizer {
    /// `language` is an ISO 639-2 code known to the installed tessdata,
    /// e.g. `"eng"`.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

#[cfg(feature = "ocr")]
impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("eng")
    }
}

#[cfg(feature = "ocr")]
impl Recognizer for TesseractRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<String, RecognizeError> {
        use std::io::Cursor;

        // leptess consumes encoded bytes; PNG keeps the binarised image
        // lossless.
        let mut png = Vec::new();
        DynamicImage::ImageLuma8(image.clone())
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| RecognizeError::BadImage {
                detail: e.to_string(),
            })?;

        let mut engine =
            leptess::LepTess::new(None, &self.language).map_err(|e| RecognizeError::Engine {
                detail: e.to_string(),
            })?;

        engine
            .set_image_from_mem(&png)
            .map_err(|e| RecognizeError::BadImage {
                detail: e.to_string(),
            })?;

        // Single uniform block of text; keep column alignment readable.
        engine
            .set_variable(leptess::Variable::TesseditPagesegMode, "6")
            .map_err(|e| RecognizeError::Engine {
                detail: e.to_string(),
            })?;
        engine
            .set_variable(leptess::Variable::PreserveInterwordSpaces, "1")
            .map_err(|e| RecognizeError::Engine {
                detail: e.to_string(),
            })?;

        engine.get_utf8_text().map_err(|e| RecognizeError::Engine {
            detail: e.to_string(),
        })
    }
}
