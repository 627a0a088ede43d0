// src/watch/event_handler.rs

//! Turning one changed path into a pipeline run.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::build::{PassReport, Pipeline};
use crate::status;
use crate::watch::exclude::ExcludeSet;

/// What happened to a single change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The path is outside the project root or under an excluded prefix.
    Ignored,
    /// The path was run through the pipeline.
    Processed(PassReport),
}

/// Reprocess one changed path.
///
/// `watch_root` is the canonical project root that event paths are reported
/// against; the path is rewritten relative to it and resolved against the
/// pipeline's own root before processing (descending into it if it is a
/// directory). The terminal status line is cleared before and reprinted
/// after processing.
pub async fn handle_change(
    pipeline: &Pipeline,
    excludes: &ExcludeSet,
    watch_root: &Path,
    path: &Path,
) -> ChangeOutcome {
    let Some(rel) = relativize(watch_root, path) else {
        warn!(?path, root = ?watch_root, "changed path is outside the project root");
        return ChangeOutcome::Ignored;
    };

    if rel.is_empty() || excludes.is_excluded(&rel) {
        debug!(rel = %rel, "ignoring change");
        return ChangeOutcome::Ignored;
    }

    debug!(rel = %rel, "reprocessing changed path");
    let target: PathBuf = pipeline.root().join(&rel);
    status::clear_line();
    let report = pipeline.process_path(&target).await;
    status::watching();
    ChangeOutcome::Processed(report)
}

/// Express `path` relative to `root` with `/` separators.
///
/// Falls back to comparing canonical forms, which covers platforms where
/// the watcher reports a different absolute prefix for the same directory
/// (symlinked temp dirs on macOS, for instance).
fn relativize(root: &Path, path: &Path) -> Option<String> {
    let rel = match path.strip_prefix(root) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => {
            let root = root.canonicalize().ok()?;
            let path = path.canonicalize().ok()?;
            path.strip_prefix(&root).ok()?.to_path_buf()
        }
    };
    Some(rel.to_string_lossy().replace('\\', "/"))
}
