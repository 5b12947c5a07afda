//! End-to-end batch tests with fake rasterisation and recognition engines.
//!
//! Real pdfium/tesseract backends need native libraries and fixture scans;
//! everything the orchestrator itself guarantees — skip logic, page
//! ordering, failure isolation, statistics, parallel dispatch — is
//! observable with fakes, so that is what these tests use.

use image::{DynamicImage, GrayImage, Luma};
use scantext::{
    BatchConfig, BatchOrchestrator, BatchStats, RasterizeError, Rasterizer, RecognizeError,
    Recognizer,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Behaviour is keyed off the source file stem:
/// - `corrupt*` fails to open,
/// - `empty*` renders zero pages,
/// - `crash*` panics mid-render,
/// - anything else renders `default_pages` rasters whose width encodes the
///   page number.
struct FakeRasterizer {
    default_pages: usize,
}

impl Rasterizer for FakeRasterizer {
    fn rasterize(
        &self,
        path: &Path,
        _dpi: u32,
        _max_page_pixels: u32,
        sink: &mut dyn FnMut(DynamicImage),
    ) -> Result<(), RasterizeError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        if stem.starts_with("corrupt") {
            return Err(RasterizeError::Open {
                detail: "bad xref table".into(),
            });
        }
        if stem.starts_with("empty") {
            return Ok(());
        }
        if stem.starts_with("crash") {
            panic!("rasteriser fault on {stem}");
        }

        for n in 1..=self.default_pages {
            sink(DynamicImage::ImageLuma8(GrayImage::from_pixel(
                n as u32,
                8,
                Luma([255u8]),
            )));
        }
        Ok(())
    }
}

/// Returns deterministic text derived from the raster width, and counts
/// how many pages it was asked to recognise.
struct CountingRecognizer {
    calls: AtomicUsize,
}

impl CountingRecognizer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

impl Recognizer for CountingRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<String, RecognizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("page {} text", image.width()))
    }
}

struct BlankRecognizer;

impl Recognizer for BlankRecognizer {
    fn recognize(&self, _image: &GrayImage) -> Result<String, RecognizeError> {
        Ok(String::new())
    }
}

fn write_pdf_stub(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"%PDF-1.4 stub").unwrap();
}

fn config_with(
    recognizer: Arc<dyn Recognizer>,
    pages: usize,
    concurrency: usize,
) -> BatchConfig {
    BatchConfig::builder()
        .rasterizer(Arc::new(FakeRasterizer {
            default_pages: pages,
        }))
        .recognizer(recognizer)
        .concurrency(concurrency)
        .build()
        .unwrap()
}

#[tokio::test]
async fn converts_a_tree_and_counts_everything() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pdf_stub(input.path(), "alpha.pdf");
    std::fs::create_dir(input.path().join("nested")).unwrap();
    write_pdf_stub(&input.path().join("nested"), "beta.PDF");
    std::fs::write(input.path().join("notes.txt"), "not a pdf").unwrap();

    let stats = BatchOrchestrator::new(config_with(CountingRecognizer::new(), 2, 1))
        .run(input.path(), output.path())
        .await
        .unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(stats.successful, 2);
    assert_eq!(stats.failed, 0);
    assert!(stats.failures.is_empty());
    assert!(output.path().join("alpha.txt").exists());
    assert!(output.path().join("beta.txt").exists());
}

#[tokio::test]
async fn artifact_pages_are_ordered_with_markers() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pdf_stub(input.path(), "doc.pdf");

    BatchOrchestrator::new(config_with(CountingRecognizer::new(), 3, 1))
        .run(input.path(), output.path())
        .await
        .unwrap();

    let text = std::fs::read_to_string(output.path().join("doc.txt")).unwrap();
    assert_eq!(
        text,
        "--- Page 1 ---\npage 1 text\n\
         \n--- Page 2 ---\npage 2 text\n\
         \n--- Page 3 ---\npage 3 text\n"
    );
}

#[tokio::test]
async fn corrupt_document_does_not_block_siblings() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pdf_stub(input.path(), "corrupt.pdf");
    write_pdf_stub(input.path(), "good.pdf");

    let stats = BatchOrchestrator::new(config_with(CountingRecognizer::new(), 1, 1))
        .run(input.path(), output.path())
        .await
        .unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(stats.successful, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.failures.len(), 1);
    assert_eq!(stats.failures[0].document, "corrupt");
    assert!(stats.failures[0].reason.contains("bad xref table"));
    assert!(output.path().join("good.txt").exists());
    assert!(!output.path().join("corrupt.txt").exists());
}

#[tokio::test]
async fn panicking_worker_fails_only_its_own_document() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pdf_stub(input.path(), "crash.pdf");
    write_pdf_stub(input.path(), "fine.pdf");
    write_pdf_stub(input.path(), "other.pdf");

    let stats = BatchOrchestrator::new(config_with(CountingRecognizer::new(), 1, 4))
        .run(input.path(), output.path())
        .await
        .unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.successful, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.failures[0].document, "crash");
    assert!(
        stats.failures[0].reason.starts_with("worker panicked"),
        "got: {}",
        stats.failures[0].reason
    );
    assert!(output.path().join("fine.txt").exists());
    assert!(output.path().join("other.txt").exists());
    assert!(!output.path().join("crash.txt").exists());
}

#[tokio::test]
async fn zero_page_and_all_blank_documents_fail_with_known_reasons() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pdf_stub(input.path(), "empty.pdf");
    write_pdf_stub(input.path(), "blank.pdf");

    let stats = BatchOrchestrator::new(config_with(Arc::new(BlankRecognizer), 2, 1))
        .run(input.path(), output.path())
        .await
        .unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(stats.failed, 2);

    // failures are sorted by document name
    assert_eq!(stats.failures[0].document, "blank");
    assert_eq!(stats.failures[0].reason, "no text extracted");
    assert_eq!(stats.failures[1].document, "empty");
    assert_eq!(stats.failures[1].reason, "no images extracted");
    assert!(!output.path().join("blank.txt").exists());
    assert!(!output.path().join("empty.txt").exists());
}

#[tokio::test]
async fn second_run_skips_finished_documents() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pdf_stub(input.path(), "one.pdf");
    write_pdf_stub(input.path(), "two.pdf");

    let recognizer = CountingRecognizer::new();
    let orchestrator =
        BatchOrchestrator::new(config_with(recognizer.clone() as Arc<dyn Recognizer>, 2, 1));

    let first = orchestrator.run(input.path(), output.path()).await.unwrap();
    assert_eq!(first.successful, 2);
    let calls_after_first = recognizer.calls.load(Ordering::SeqCst);
    assert_eq!(calls_after_first, 4);
    let before = std::fs::read_to_string(output.path().join("one.txt")).unwrap();

    let second = orchestrator.run(input.path(), output.path()).await.unwrap();
    // skipped documents still count as successful
    assert_eq!(second.total, 2);
    assert_eq!(second.successful, 2);
    assert_eq!(second.failed, 0);
    // no recognition work happened the second time
    assert_eq!(recognizer.calls.load(Ordering::SeqCst), calls_after_first);
    assert_eq!(
        std::fs::read_to_string(output.path().join("one.txt")).unwrap(),
        before
    );
}

#[tokio::test]
async fn parallel_run_matches_sequential_run() {
    let input = TempDir::new().unwrap();
    for i in 0..8 {
        write_pdf_stub(input.path(), &format!("doc{i}.pdf"));
    }
    write_pdf_stub(input.path(), "corrupt.pdf");

    async fn run(input: &Path, concurrency: usize) -> (BatchStats, Vec<(String, String)>) {
        let output = TempDir::new().unwrap();
        let stats = BatchOrchestrator::new(config_with(CountingRecognizer::new(), 2, concurrency))
            .run(input, output.path())
            .await
            .unwrap();

        let mut artifacts: Vec<(String, String)> = std::fs::read_dir(output.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| {
                (
                    e.file_name().to_string_lossy().into_owned(),
                    std::fs::read_to_string(e.path()).unwrap(),
                )
            })
            .collect();
        artifacts.sort();
        (stats, artifacts)
    }

    let (seq_stats, seq_artifacts) = run(input.path(), 1).await;
    let (par_stats, par_artifacts) = run(input.path(), 4).await;

    assert_eq!(seq_stats, par_stats);
    assert_eq!(seq_artifacts, par_artifacts);
    assert_eq!(par_stats.successful + par_stats.failed, par_stats.total);
}

#[tokio::test]
async fn empty_input_returns_zeroed_stats() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let stats = BatchOrchestrator::new(config_with(CountingRecognizer::new(), 1, 1))
        .run(input.path(), output.path())
        .await
        .unwrap();

    assert_eq!(stats, BatchStats::default());
}

#[tokio::test]
async fn output_directory_is_created() {
    let input = TempDir::new().unwrap();
    let output_root = TempDir::new().unwrap();
    let output = output_root.path().join("deep").join("out");
    write_pdf_stub(input.path(), "doc.pdf");

    let stats = BatchOrchestrator::new(config_with(CountingRecognizer::new(), 1, 1))
        .run(input.path(), &output)
        .await
        .unwrap();

    assert_eq!(stats.successful, 1);
    assert!(output.join("doc.txt").exists());
}

#[test]
fn run_sync_works_without_an_ambient_runtime() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pdf_stub(input.path(), "doc.pdf");

    let stats = BatchOrchestrator::new(config_with(CountingRecognizer::new(), 1, 1))
        .run_sync(input.path(), output.path())
        .unwrap();

    assert_eq!(stats.successful, 1);
}
