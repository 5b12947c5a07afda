//! Corpus discovery: recursively find PDF documents under a root directory.
//!
//! A missing or empty root is not an error — the orchestrator reports
//! zeroed statistics and the caller decides whether that matters. Directory
//! entries are sorted per level so the discovery order is deterministic for
//! a fixed filesystem snapshot, which keeps sequential runs reproducible.

use std::path::{Path, PathBuf};
use tracing::warn;

/// Recursively collect every `*.pdf` file (case-insensitive) under `root`.
///
/// Returns an empty vec for a missing or unreadable root, after logging a
/// warning. Unreadable subdirectories are skipped with a warning rather
/// than aborting discovery.
pub fn discover_documents(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        warn!("Input directory does not exist: {}", root.display());
        return Vec::new();
    }

    let mut found = Vec::new();
    walk(root, &mut found);
    found
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };

    // read_dir order is filesystem-dependent; sort for determinism.
    let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, found);
        } else if is_pdf(&path) {
            found.push(path);
        }
    }
}

/// Case-insensitive `.pdf` extension match.
fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
