// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::build::Pipeline;
use crate::errors::Result;
use crate::watch::event_handler::{handle_change, ChangeOutcome};
use crate::watch::exclude::ExcludeSet;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    roots: Vec<PathBuf>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

impl WatcherHandle {
    /// Source roots that are actually being watched.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

/// Watch every source root of `pipeline` and reprocess changed paths.
///
/// Events are forwarded from the `notify` callback into a single async
/// consumer, so reprocessing is serialized: one changed path finishes
/// before the next starts. Roots that do not exist are skipped with a
/// warning.
pub fn spawn_watcher(pipeline: Arc<Pipeline>, excludes: ExcludeSet) -> Result<WatcherHandle> {
    let root = pipeline.root().to_path_buf();
    // Canonicalize once so event paths can be related back to it.
    let watch_root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("globtask: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("globtask: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    let mut roots = Vec::new();
    for source_root in pipeline.source_roots() {
        if !source_root.exists() {
            warn!(root = ?source_root, "source root does not exist; not watching it");
            continue;
        }
        watcher.watch(&source_root, RecursiveMode::Recursive)?;
        info!("file watcher started on {:?}", source_root);
        roots.push(source_root);
    }

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !is_content_event(&event.kind) {
                continue;
            }
            debug!(?event, "received notify event");

            let mut paths = event.paths;
            paths.dedup();

            for path in paths {
                if let ChangeOutcome::Processed(report) =
                    handle_change(&pipeline, &excludes, &watch_root, &path).await
                {
                    debug!(?path, ?report, "reprocessed changed path");
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        _inner: watcher,
        roots,
    })
}

/// Creations and modifications carry something to rebuild from; removals
/// and plain accesses do not.
fn is_content_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any | EventKind::Other
    )
}

#[cfg(test)]
mod tests {
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};

    use super::*;

    #[test]
    fn only_create_and_modify_events_trigger() {
        assert!(is_content_event(&EventKind::Create(CreateKind::File)));
        assert!(is_content_event(&EventKind::Modify(ModifyKind::Any)));
        assert!(!is_content_event(&EventKind::Remove(RemoveKind::File)));
        assert!(!is_content_event(&EventKind::Access(AccessKind::Any)));
    }
}
