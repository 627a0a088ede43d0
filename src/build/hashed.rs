// src/build/hashed.rs

//! Content-hash renaming for `hash:` tasks.
//!
//! `dist/app.css` with a source hashing to `abc123` becomes
//! `dist/app.abc123.css`. When that exact file is not on disk yet, older
//! hashed variants of the same output (`dist/app.<other>.css`) are removed
//! first, so at most one hashed artifact per logical output survives.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use blake3::Hasher;
use tracing::{debug, info};

use crate::errors::{GlobtaskError, Result};
use crate::fs::FileSystem;
use crate::types::HashAlgorithm;

/// Result of [`apply_content_hash`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedDestination {
    /// Destination with the content hash embedded.
    pub path: PathBuf,
    /// Superseded hashed outputs that were deleted.
    pub pruned: Vec<PathBuf>,
}

enum Digest {
    Md5(md5::Context),
    Blake3(Hasher),
}

impl Digest {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Digest::Md5(md5::Context::new()),
            HashAlgorithm::Blake3 => Digest::Blake3(Hasher::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Digest::Md5(ctx) => ctx.consume(data),
            Digest::Blake3(hasher) => {
                hasher.update(data);
            }
        }
    }

    fn finish(self) -> String {
        match self {
            Digest::Md5(ctx) => format!("{:x}", ctx.compute()),
            Digest::Blake3(hasher) => hasher.finalize().to_hex().to_string(),
        }
    }
}

/// Hex digest of a file's full contents, read sequentially.
pub fn compute_file_hash(
    fs: &dyn FileSystem,
    path: &Path,
    algorithm: HashAlgorithm,
) -> Result<String> {
    let mut reader = fs.open_read(path)?;
    let mut digest = Digest::new(algorithm);
    let mut buf = [0u8; 8192];
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| GlobtaskError::fs("read", path, e))?;
        if n == 0 {
            break;
        }
        digest.update(&buf[..n]);
    }
    Ok(digest.finish())
}

/// Split a destination filename on its last `.` into stem and extension.
pub fn split_extension(destination: &Path) -> Result<(String, String)> {
    let name = destination
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| GlobtaskError::MissingExtension(destination.to_path_buf()))?;

    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => Ok((stem.to_string(), ext.to_string())),
        _ => Err(GlobtaskError::MissingExtension(destination.to_path_buf())),
    }
}

/// Embed `hash` into `destination` right before its extension.
pub fn hashed_destination(destination: &Path, hash: &str) -> Result<PathBuf> {
    let (stem, ext) = split_extension(destination)?;
    Ok(destination.with_file_name(format!("{stem}.{hash}.{ext}")))
}

/// Hash `source`, rename `destination` accordingly and prune stale variants.
///
/// Hashing runs on the blocking pool. Pruning only happens when the
/// destination directory exists and the freshly hashed file is not already
/// there.
pub async fn apply_content_hash(
    fs: Arc<dyn FileSystem>,
    source: &Path,
    destination: &Path,
    algorithm: HashAlgorithm,
) -> Result<HashedDestination> {
    // Fail on an extension-less template before doing any I/O.
    let (stem, ext) = split_extension(destination)?;

    let hash = {
        let fs = Arc::clone(&fs);
        let source = source.to_path_buf();
        tokio::task::spawn_blocking(move || compute_file_hash(fs.as_ref(), &source, algorithm))
            .await
            .map_err(|e| GlobtaskError::Other(anyhow!("hashing task failed: {e}")))??
    };
    debug!(source = ?source, hash = %hash, "computed content hash");

    let path = hashed_destination(destination, &hash)?;
    let name_len = path.file_name().map_or(0, |n| n.len());

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut pruned = Vec::new();
    if fs.is_dir(&dir) && !fs.exists(&path) {
        let prefix = format!("{stem}.");
        let suffix = format!(".{ext}");

        for entry in fs.read_dir(&dir)? {
            let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.len() == name_len
                && name.starts_with(&prefix)
                && name.ends_with(&suffix)
                && fs.is_file(&entry)
            {
                fs.remove_file(&entry)?;
                info!(path = ?entry, "removed superseded hashed output");
                pruned.push(entry);
            }
        }
    }

    Ok(HashedDestination { path, pruned })
}
