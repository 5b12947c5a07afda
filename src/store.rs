//! Downstream retrieval-store surface.
//!
//! The batch pipeline ends at text artifacts on disk; populating a search
//! store is a separate step consumed only through the [`DocumentStore`]
//! trait. This module defines that boundary plus the loader that turns an
//! artifact directory back into `(title, text)` pairs — the input shape a
//! retrieval store expects. Store internals (embedding, ranking) are out
//! of scope.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// One extracted document, ready for store insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Document identifier (artifact file stem).
    pub title: String,
    /// Full recognised text, page markers included.
    pub text: String,
}

/// Error inserting into a downstream store.
#[derive(Debug, Error)]
#[error("store insert failed: {detail}")]
pub struct StoreError {
    pub detail: String,
}

/// Opaque "insert documents" capability of a retrieval store.
pub trait DocumentStore: Send {
    fn insert_documents(&mut self, documents: Vec<ExtractedDocument>) -> Result<(), StoreError>;
}

/// Load every `*.txt` artifact under `dir` (non-recursive), sorted by file
/// name so insertion order is reproducible.
///
/// Unreadable files are skipped with a warning; the artifact directory is
/// append-only from the pipeline's perspective so a read error here is
/// someone else's partial write, not ours.
pub fn load_artifacts(dir: &Path) -> std::io::Result<Vec<ExtractedDocument>> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    entries.sort();

    let mut documents = Vec::with_capacity(entries.len());
    for path in entries {
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match std::fs::read_to_string(&path) {
            Ok(text) => documents.push(ExtractedDocument { title, text }),
            Err(e) => warn!("Skipping unreadable artifact {}: {}", path.display(), e),
        }
    }
    Ok(documents)
}
