// src/errors.rs

//! Crate-wide error type and result alias.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlobtaskError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A stat/read/mkdir/unlink/listing failure on a concrete path.
    #[error("{op} {path:?}: {source}")]
    FilesystemAccess {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("task '{task}' failed: {message}")]
    Transform { task: String, message: String },

    #[error("invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("destination {0:?} has no file extension to embed a content hash in")]
    MissingExtension(PathBuf),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlobtaskError {
    /// Shorthand for building a [`GlobtaskError::FilesystemAccess`].
    pub fn fs(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        GlobtaskError::FilesystemAccess {
            op,
            path: path.into(),
            source,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GlobtaskError>;
