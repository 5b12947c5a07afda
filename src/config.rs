//! Configuration types for batch OCR conversion.
//!
//! All batch behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share configs across worker threads and to diff two runs to understand
//! why their outputs differ.
//!
//! The rasterisation and recognition engines are injected as trait objects
//! so the orchestration logic can be exercised with fakes returning
//! controlled page counts and text, without linking pdfium or tesseract.

use crate::error::BatchError;
use crate::pipeline::rasterize::Rasterizer;
use crate::pipeline::recognize::Recognizer;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Configuration for one batch run.
///
/// Built via [`BatchConfig::builder()`] or [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use scantext::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .dpi(300)
///     .concurrency(4)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Rasterisation DPI for each PDF page. Range: 72–600. Default: 300.
    ///
    /// 300 DPI is the sweet spot for Tesseract on scanned documents: glyphs
    /// are large enough for reliable segmentation while a Letter page stays
    /// around 2550 × 3300 px. Raise to 400+ for small-font scans; drop to
    /// 150–200 when throughput matters more than accuracy.
    pub dpi: u32,

    /// Longest-edge cap on rendered pages, in pixels. Default: 5000.
    ///
    /// A safety cap independent of DPI: a 300-DPI render of an A0 poster
    /// would otherwise allocate a 10 000 × 14 000 px buffer per page.
    pub max_page_pixels: u32,

    /// Number of documents processed in parallel. Default: 1 (sequential).
    ///
    /// Each worker runs one whole document at a time; pages within a
    /// document are never parallelised, which preserves page order and
    /// bounds peak memory to one page raster per worker.
    pub concurrency: usize,

    /// Recognition language passed to the built-in Tesseract recogniser
    /// (ISO 639-2). Default: "eng". Ignored when a custom recogniser is
    /// injected.
    pub language: String,

    /// Page-image source. `None` selects the pdfium-backed rasteriser.
    pub rasterizer: Option<Arc<dyn Rasterizer>>,

    /// Text-recognition engine. `None` selects the built-in Tesseract
    /// recogniser when the `ocr` feature is enabled; without that feature a
    /// recogniser must be injected.
    pub recognizer: Option<Arc<dyn Recognizer>>,

    /// Per-document progress events. Default: none.
    pub progress: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            max_page_pixels: 5000,
            concurrency: 1,
            language: "eng".to_string(),
            rasterizer: None,
            recognizer: None,
            progress: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("dpi", &self.dpi)
            .field("max_page_pixels", &self.max_page_pixels)
            .field("concurrency", &self.concurrency)
            .field("language", &self.language)
            .field("rasterizer", &self.rasterizer.as_ref().map(|_| "<dyn Rasterizer>"))
            .field("recognizer", &self.recognizer.as_ref().map(|_| "<dyn Recognizer>"))
            .field("progress", &self.progress.as_ref().map(|_| "<dyn BatchProgressCallback>"))
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn max_page_pixels(mut self, px: u32) -> Self {
        self.config.max_page_pixels = px.max(100);
        self
    }

    /// `n <= 1` means sequential execution in discovery order.
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.config.language = lang.into();
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.config.rasterizer = Some(rasterizer);
        self
    }

    pub fn recognizer(mut self, recognizer: Arc<dyn Recognizer>) -> Self {
        self.config.recognizer = Some(recognizer);
        self
    }

    pub fn progress(mut self, callback: ProgressCallback) -> Self {
        self.config.progress = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, BatchError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(BatchError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.concurrency == 0 {
            return Err(BatchError::InvalidConfig("Concurrency must be ≥ 1".into()));
        }
        if c.language.is_empty() {
            return Err(BatchError::InvalidConfig(
                "Recognition language must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
