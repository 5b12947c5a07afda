//! CLI binary for scantext.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `BatchConfig` and prints the batch summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use scantext::{BatchConfig, BatchOrchestrator, BatchProgressCallback, BatchStats, ProgressCallback};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-document
/// log lines using [indicatif]. Designed to work correctly when documents
/// complete out-of-order (parallel mode).
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Per-document wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<String, Instant>>,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically by
    /// `on_batch_start` (called once discovery has counted the corpus).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Discovering");
        bar.set_message("Scanning input folder…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn elapsed_secs(&self, document: &str) -> f64 {
        self.start_times
            .lock()
            .unwrap()
            .remove(document)
            .map(|t| t.elapsed().as_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} docs  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_documents as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_documents} PDF documents"))
        ));
    }

    fn on_document_start(&self, document: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(document.to_string(), Instant::now());
        self.bar.set_message(document.to_string());
    }

    fn on_document_skipped(&self, document: &str) {
        self.start_times.lock().unwrap().remove(document);
        self.bar
            .println(format!("  {} {}  {}", dim("↷"), document, dim("skipped")));
        self.bar.inc(1);
    }

    fn on_document_complete(&self, document: &str) {
        let secs = self.elapsed_secs(document);
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            document,
            dim(&format!("{secs:.1}s"))
        ));
        self.bar.inc(1);
    }

    fn on_document_failed(&self, document: &str, reason: &str) {
        let secs = self.elapsed_secs(document);
        let msg = truncate_reason(reason, 80);

        self.bar.println(format!(
            "  {} {}  {}  {}",
            red("✗"),
            document,
            red(&msg),
            dim(&format!("{secs:.1}s"))
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, successful: usize, failed: usize) {
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} documents converted successfully",
                green("✔"),
                bold(&successful.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} documents converted  ({} failed)",
                if successful == 0 { red("✘") } else { cyan("⚠") },
                bold(&successful.to_string()),
                successful + failed,
                red(&failed.to_string()),
            );
        }
    }
}

/// Truncate a failure message for one-line display, never splitting a
/// multibyte character. Failure reasons can carry arbitrary file paths, so
/// a plain byte slice would panic on non-ASCII input.
fn truncate_reason(reason: &str, max_bytes: usize) -> String {
    if reason.len() <= max_bytes {
        return reason.to_string();
    }
    let mut out = String::with_capacity(max_bytes);
    for c in reason.chars() {
        if out.len() + c.len_utf8() >= max_bytes {
            break;
        }
        out.push(c);
    }
    out.push('\u{2026}');
    out
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a folder of scans (sequential, 300 DPI)
  scantext ./scans ./text_out

  # Four parallel workers at higher resolution
  scantext --jobs 4 --dpi 400 ./scans ./text_out

  # Re-run after an interruption — finished documents are skipped
  scantext ./scans ./text_out

  # Machine-readable statistics
  scantext --json ./scans ./text_out > stats.json

OUTPUT FORMAT:
  One UTF-8 file per input PDF, named <stem>.txt, with page markers:

    --- Page 1 ---
    <recognised text>

    --- Page 2 ---
    [No text extracted]

RESUME BEHAVIOUR:
  A document whose <stem>.txt already exists in the output folder is
  skipped without any work. Delete the artifact to force reprocessing.

SETUP:
  Tesseract language data must be installed for the requested --lang
  (e.g. apt install tesseract-ocr-eng). PDFium is loaded via pdfium-render;
  point PDFIUM_DYNAMIC_LIB_PATH at libpdfium if it is not on the default
  search path.
"#;

/// Batch-convert scanned PDF trees to plain text via OCR.
#[derive(Parser, Debug)]
#[command(
    name = "scantext",
    version,
    about = "Batch-convert scanned PDF documents to plain text via OCR",
    long_about = "Recursively discovers PDF files under INPUT_DIR, rasterises each page, \
runs image cleanup and text recognition, and writes one <stem>.txt artifact per document \
into OUTPUT_DIR. Individual failures never abort the batch; already-converted documents \
are skipped on re-runs.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder containing PDF files (searched recursively).
    input_dir: PathBuf,

    /// Folder where text artifacts are written (created if absent).
    output_dir: PathBuf,

    /// Rasterisation DPI (72–600).
    #[arg(long, env = "SCANTEXT_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Number of documents processed in parallel (1 = sequential).
    #[arg(short, long, env = "SCANTEXT_JOBS", default_value_t = 1)]
    jobs: usize,

    /// Tesseract language model (ISO 639-2).
    #[arg(long, env = "SCANTEXT_LANG", default_value = "eng")]
    lang: String,

    /// Print final statistics as JSON to stdout.
    #[arg(long, env = "SCANTEXT_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "SCANTEXT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SCANTEXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SCANTEXT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user. Verbose
    // mode streams debug logs instead, so the bar stays off there — the
    // two would otherwise interleave on stderr.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.verbose;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as ProgressCallback)
    } else {
        None
    };

    let mut builder = BatchConfig::builder()
        .dpi(cli.dpi)
        .concurrency(cli.jobs)
        .language(&cli.lang);
    if let Some(cb) = progress {
        builder = builder.progress(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run batch ────────────────────────────────────────────────────────
    let stats = BatchOrchestrator::new(config)
        .run(&cli.input_dir, &cli.output_dir)
        .await
        .context("Batch conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise statistics")?
        );
    } else if !cli.quiet {
        print_summary(&stats, &cli.output_dir);
    }

    if stats.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Human-readable summary block (the callback already printed per-document
/// lines when the progress bar was active).
fn print_summary(stats: &BatchStats, output_dir: &std::path::Path) {
    eprintln!();
    eprintln!("{}", bold("PROCESSING SUMMARY"));
    eprintln!("  Total PDFs:   {}", stats.total);
    eprintln!("  Successful:   {}", green(&stats.successful.to_string()));
    eprintln!(
        "  Failed:       {}",
        if stats.failed == 0 {
            stats.failed.to_string()
        } else {
            red(&stats.failed.to_string())
        }
    );
    eprintln!("  Output:       {}", output_dir.display());

    if !stats.failures.is_empty() {
        eprintln!("  Errors:");
        for failure in &stats.failures {
            eprintln!("    - {}: {}", failure.document, failure.reason);
        }
    }
}
