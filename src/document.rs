//! Per-document conversion: one PDF in, one text artifact out.
//!
//! [`DocumentConverter::convert`] is the document-level failure boundary:
//! it never returns an error, only a [`ConversionOutcome`]. Everything that
//! can go wrong inside a document — unreadable PDF, zero pages, no
//! recognisable text, write failure — is caught here and reported as a
//! `Failure`, so sibling documents in the batch are untouched.
//!
//! Pages are streamed: each raster is recognised and dropped before the
//! next one is rendered, bounding peak memory to a single page regardless
//! of document length.

use crate::error::DocumentError;
use crate::outcome::{artifact_path, ConversionOutcome};
use crate::pipeline::rasterize::Rasterizer;
use crate::pipeline::recognize::PageRecognizer;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Marker inserted for pages that recognised to empty text. The page still
/// appears in the artifact so page counts stay truthful.
const EMPTY_PAGE_MARKER: &str = "[No text extracted]";

/// Converts one source document into a persisted text artifact.
///
/// Shared read-only across workers; all per-document state lives on the
/// stack of `convert`.
pub struct DocumentConverter {
    rasterizer: Arc<dyn Rasterizer>,
    recognizer: PageRecognizer,
    dpi: u32,
    max_page_pixels: u32,
}

impl DocumentConverter {
    pub fn new(
        rasterizer: Arc<dyn Rasterizer>,
        recognizer: PageRecognizer,
        dpi: u32,
        max_page_pixels: u32,
    ) -> Self {
        Self {
            rasterizer,
            recognizer,
            dpi,
            max_page_pixels,
        }
    }

    /// Convert `source` and write `<stem>.txt` into `output_dir`.
    ///
    /// Resume-safe: if the artifact already exists the document is skipped
    /// without any rasterisation or recognition work, making repeat runs
    /// idempotent. Blocking; callers run it inside `spawn_blocking`.
    pub fn convert(&self, source: &Path, output_dir: &Path) -> ConversionOutcome {
        let artifact = artifact_path(source, output_dir);

        if artifact.exists() {
            info!(
                "Output file already exists, skipping: {}",
                artifact.display()
            );
            return ConversionOutcome::Skipped { artifact };
        }

        info!("Processing PDF: {}", source.display());

        match self.convert_inner(source, &artifact) {
            Ok(()) => {
                info!("Successfully processed and saved: {}", artifact.display());
                ConversionOutcome::Success { artifact }
            }
            Err(error) => ConversionOutcome::Failure { error },
        }
    }

    fn convert_inner(&self, source: &Path, artifact: &Path) -> Result<(), DocumentError> {
        let mut body = String::new();
        let mut pages_seen = 0usize;
        let mut any_text = false;

        self.rasterizer
            .rasterize(source, self.dpi, self.max_page_pixels, &mut |image| {
                pages_seen += 1;
                debug!("Processing page {} of {}", pages_seen, source.display());

                let text = self.recognizer.recognize_page(pages_seen, &image);
                drop(image);

                if pages_seen > 1 {
                    body.push('\n');
                }
                if text.is_empty() {
                    let _ = writeln!(body, "--- Page {pages_seen} ---\n{EMPTY_PAGE_MARKER}");
                } else {
                    any_text = true;
                    let _ = writeln!(body, "--- Page {pages_seen} ---\n{text}");
                }
            })
            .map_err(|e| DocumentError::Rasterize {
                detail: e.to_string(),
            })?;

        if pages_seen == 0 {
            return Err(DocumentError::NoPages);
        }
        debug!("Converted {} pages to images", pages_seen);

        // All pages empty: no artifact. An empty file on disk would be
        // indistinguishable from a completed document on the next run.
        if !any_text {
            return Err(DocumentError::NoText);
        }

        write_artifact(artifact, &body)
    }
}

/// Atomic write: uniquely-named temp file in the same directory, then
/// rename. A crash mid-write leaves only an anonymous temp file, which the
/// resume check ignores. The unique name matters under parallel execution:
/// two same-stem sources racing to the same artifact must never share a
/// staging file, or one worker could publish the other's partial write.
fn write_artifact(path: &Path, contents: &str) -> Result<(), DocumentError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let artifact_err = |detail: String| DocumentError::ArtifactWrite {
        path: path.to_path_buf(),
        detail,
    };

    let mut tmp =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| artifact_err(e.to_string()))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| artifact_err(e.to_string()))?;
    tmp.persist(path).map_err(|e| artifact_err(e.to_string()))?;
    Ok(())
}
