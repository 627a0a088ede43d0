// src/watch/mod.rs

//! Watch mode.
//!
//! After the initial pass, changes under the source roots are fed back into
//! the same per-file pipeline. This module is responsible for:
//! - Ignoring changes under excluded prefixes (`.git/`, `dist/` by default).
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Reprocessing changed paths one at a time.

pub mod event_handler;
pub mod exclude;
pub mod watcher;

pub use event_handler::{handle_change, ChangeOutcome};
pub use exclude::ExcludeSet;
pub use watcher::{spawn_watcher, WatcherHandle};
