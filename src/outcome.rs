//! Outcome and statistics types produced by a batch run.
//!
//! A [`ConversionOutcome`] is terminal: exactly one is produced per
//! discovered document, and [`BatchStats`] is the fold of all of them.
//! `Success` and `Skipped` both count as successful — both mean "this
//! document now has a usable artifact on disk"; the distinction only
//! matters for progress reporting and resume diagnostics.

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Terminal result of converting one source document.
#[derive(Debug, Clone)]
pub enum ConversionOutcome {
    /// The artifact was written.
    Success { artifact: PathBuf },
    /// The artifact already existed; nothing was done (resume/skip).
    Skipped { artifact: PathBuf },
    /// The document failed; no artifact was written.
    Failure { error: DocumentError },
}

/// One document's outcome paired with its source path.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// Absolute path of the source PDF.
    pub source: PathBuf,
    pub outcome: ConversionOutcome,
}

impl DocumentReport {
    /// Stable output identifier: the source file's stem.
    ///
    /// Also used to compute the artifact path, so two sources with the same
    /// stem in different subdirectories map to the same artifact.
    pub fn identifier(&self) -> String {
        identifier(&self.source)
    }
}

/// Output identifier for a source document (base name without extension).
pub fn identifier(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string_lossy().into_owned())
}

/// Artifact path for a source document: `<output_dir>/<stem>.txt`.
pub fn artifact_path(source: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.txt", identifier(source)))
}

/// One itemised failure in the final report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentFailure {
    /// Output identifier of the failed document.
    pub document: String,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Aggregated statistics for one batch run.
///
/// Invariants on completion: `successful + failed == total` and
/// `failures.len() == failed`. The failure list is sorted by document
/// identifier before the batch returns, so reports are reproducible even
/// when parallel workers complete out of order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Documents discovered.
    pub total: usize,
    /// Documents with a usable artifact (written now or in a prior run).
    pub successful: usize,
    /// Documents that produced no artifact.
    pub failed: usize,
    /// One entry per failed document.
    pub failures: Vec<DocumentFailure>,
}

impl BatchStats {
    /// Fold one document report into the accumulator.
    pub fn record(&mut self, report: &DocumentReport) {
        match &report.outcome {
            ConversionOutcome::Success { .. } | ConversionOutcome::Skipped { .. } => {
                self.successful += 1;
            }
            ConversionOutcome::Failure { error } => {
                self.failed += 1;
                self.failures.push(DocumentFailure {
                    document: report.identifier(),
                    reason: error.to_string(),
                });
            }
        }
    }

    /// Sort the failure list for stable reporting.
    pub fn finalise(&mut self) {
        self.failures.sort();
    }
}
