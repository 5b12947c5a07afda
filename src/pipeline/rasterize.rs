//! PDF rasterisation: render document pages to raster images via pdfium.
//!
//! The backend sits behind the [`Rasterizer`] trait so orchestration code
//! can be tested with fakes returning controlled page counts. The trait is
//! sink-based rather than returning a `Vec`: each page image is handed to
//! the caller and dropped before the next page is rendered, so a
//! 400-page scan never holds more than one raster in memory at a time.
//!
//! Rendering is CPU-bound and pdfium is not async-safe; callers invoke the
//! rasteriser from inside `tokio::task::spawn_blocking` (see
//! [`crate::batch`]).

use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// PDF points per inch; page dimensions are expressed in points.
const POINTS_PER_INCH: f32 = 72.0;

/// Errors from the rasterisation capability.
#[derive(Debug, Clone, Error)]
pub enum RasterizeError {
    /// The document could not be opened (missing, corrupt, encrypted).
    #[error("failed to open document: {detail}")]
    Open { detail: String },

    /// A specific page could not be rendered.
    #[error("failed to render page {page}: {detail}")]
    Render { page: usize, detail: String },
}

/// Opaque rasterisation capability: PDF file → ordered sequence of page
/// images.
///
/// Implementations must deliver pages strictly in document order, calling
/// `sink` once per page. An error aborts the document; pages already
/// delivered are the caller's problem (the document converter discards the
/// partial result and records a failure).
pub trait Rasterizer: Send + Sync {
    fn rasterize(
        &self,
        path: &Path,
        dpi: u32,
        max_page_pixels: u32,
        sink: &mut dyn FnMut(DynamicImage),
    ) -> Result<(), RasterizeError>;
}

/// Production rasteriser backed by the pdfium library.
#[derive(Debug, Default)]
pub struct PdfiumRasterizer;

impl Rasterizer for PdfiumRasterizer {
    fn rasterize(
        &self,
        path: &Path,
        dpi: u32,
        max_page_pixels: u32,
        sink: &mut dyn FnMut(DynamicImage),
    ) -> Result<(), RasterizeError> {
        let pdfium = Pdfium::default();

        let document =
            pdfium
                .load_pdf_from_file(path, None)
                .map_err(|e| RasterizeError::Open {
                    detail: format!("{e:?}"),
                })?;

        let pages = document.pages();
        debug!("PDF loaded: {} pages", pages.len());

        for (index, page) in pages.iter().enumerate() {
            let page_num = index + 1;

            // Pixel width from the page's physical size at the requested
            // DPI, capped so an outsized page cannot exhaust memory.
            let width_px = (page.width().value * dpi as f32 / POINTS_PER_INCH).round() as u32;
            let width_px = width_px.clamp(1, max_page_pixels);

            let render_config = PdfRenderConfig::new()
                .set_target_width(width_px as i32)
                .set_maximum_height(max_page_pixels as i32);

            let bitmap =
                page.render_with_config(&render_config)
                    .map_err(|e| RasterizeError::Render {
                        page: page_num,
                        detail: format!("{e:?}"),
                    })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                page_num,
                image.width(),
                image.height()
            );

            sink(image);
        }

        Ok(())
    }
}
