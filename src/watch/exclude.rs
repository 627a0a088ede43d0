// src/watch/exclude.rs

use std::fmt;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::{GlobtaskError, Result};

/// Path prefixes whose changes are ignored in watch mode.
///
/// A prefix such as `dist/` excludes the `dist` entry itself and everything
/// beneath it. Paths are relative to the project root, `/`-separated.
#[derive(Clone)]
pub struct ExcludeSet {
    prefixes: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for ExcludeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludeSet")
            .field("prefixes", &self.prefixes)
            .finish_non_exhaustive()
    }
}

impl ExcludeSet {
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::with_capacity(prefixes.len());

        for prefix in prefixes {
            let dir = prefix.as_ref().trim_start_matches("./").trim_end_matches('/');
            if dir.is_empty() {
                continue;
            }
            let escaped = globset::escape(dir);
            for pat in [escaped.clone(), format!("{escaped}/**")] {
                let glob = Glob::new(&pat).map_err(|e| GlobtaskError::Pattern {
                    pattern: prefix.as_ref().to_string(),
                    message: e.to_string(),
                })?;
                builder.add(glob);
            }
            kept.push(dir.to_string());
        }

        let set = builder.build().map_err(|e| GlobtaskError::Pattern {
            pattern: kept.join(", "),
            message: e.to_string(),
        })?;

        Ok(Self {
            prefixes: kept,
            set,
        })
    }

    pub fn is_excluded(&self, rel_path: &str) -> bool {
        self.set.is_match(rel_path.trim_start_matches("./"))
    }
}
