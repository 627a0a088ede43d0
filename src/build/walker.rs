// src/build/walker.rs

use std::path::{Path, PathBuf};

use crate::errors::{GlobtaskError, Result};
use crate::fs::FileSystem;

/// One item produced by [`Walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEntry {
    Dir(PathBuf),
    File(PathBuf),
}

/// Lazy depth-first traversal of a directory tree.
///
/// Directories are yielded before their contents and siblings are visited in
/// name order. A directory that cannot be listed (or a root that does not
/// exist) is yielded as an `Err` item; the walk then carries on with the
/// remaining entries.
#[derive(Debug)]
pub struct Walk<'a> {
    fs: &'a dyn FileSystem,
    pending: Vec<PathBuf>,
}

impl<'a> Walk<'a> {
    pub fn new(fs: &'a dyn FileSystem, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            pending: vec![root.into()],
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<WalkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.pending.pop()?;

        if self.fs.is_dir(&path) {
            return Some(match self.fs.read_dir(&path) {
                Ok(children) => {
                    // Reverse so the smallest name is popped first.
                    self.pending.extend(children.into_iter().rev());
                    Ok(WalkEntry::Dir(path))
                }
                Err(err) => Err(err),
            });
        }

        if self.fs.exists(&path) {
            Some(Ok(WalkEntry::File(path)))
        } else {
            Some(Err(missing(&path)))
        }
    }
}

fn missing(path: &Path) -> GlobtaskError {
    GlobtaskError::fs(
        "stat",
        path,
        std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
    )
}
