// src/build/mod.rs

//! The per-file build pipeline.
//!
//! - [`walker`] enumerates files under a source root.
//! - [`staleness`] decides whether an existing output is up to date.
//! - [`hashed`] splices a content hash into destinations of `hash:` tasks and
//!   prunes superseded hashed outputs.
//! - [`pipeline`] ties these together and invokes the transforms, strictly
//!   one file and one task at a time.

pub mod hashed;
pub mod pipeline;
pub mod staleness;
pub mod walker;

pub use hashed::{apply_content_hash, compute_file_hash, HashedDestination};
pub use pipeline::{PassReport, Pipeline, PipelineOptions};
pub use staleness::is_up_to_date;
pub use walker::{Walk, WalkEntry};
