// src/config/model.rs

use std::sync::Arc;

use serde::Deserialize;

use crate::errors::{GlobtaskError, Result};
use crate::exec::{CopyTransform, ShellTransform};
use crate::task::{TaskDeclaration, Transform};
use crate::types::HashAlgorithm;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// hash_algorithm = "md5"
/// watch_exclude = [".git/", "dist/"]
///
/// [[task]]
/// name = "scss"
/// pattern = "hash:src/(**).scss"
/// dest = "dist/$1.css"
/// cmd = "sass --no-source-map {src} {dest}"
///
/// [[task]]
/// name = "img"
/// pattern = "static/(**)"
/// dest = "dist/$1"
/// copy = true
/// ```
///
/// Tasks are an array of tables so their declaration order is kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub task: Vec<TaskConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Digest embedded into the filenames produced by `hash:` tasks.
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,

    /// Path prefixes (relative to the project root) whose changes are
    /// ignored in watch mode.
    #[serde(default = "default_watch_exclude")]
    pub watch_exclude: Vec<String>,
}

fn default_watch_exclude() -> Vec<String> {
    vec![".git/".to_string(), "dist/".to_string()]
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::default(),
            watch_exclude: default_watch_exclude(),
        }
    }
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Label shown in status lines.
    pub name: String,

    /// Source glob, optionally prefixed with `hash:`.
    pub pattern: String,

    /// Destination template (`$1..$N`, `$@`).
    pub dest: String,

    /// Shell command to run per matched file.
    #[serde(default)]
    pub cmd: Option<String>,

    /// Copy the source verbatim instead of running a command.
    #[serde(default)]
    pub copy: bool,
}

impl TaskConfig {
    /// Build the transform this entry describes.
    pub fn transform(&self) -> Result<Arc<dyn Transform>> {
        match (&self.cmd, self.copy) {
            (Some(cmd), false) => Ok(Arc::new(ShellTransform::new(cmd.clone()))),
            (None, true) => Ok(Arc::new(CopyTransform)),
            (Some(_), true) => Err(GlobtaskError::ConfigError(format!(
                "task '{}' sets both `cmd` and `copy`",
                self.name
            ))),
            (None, false) => Err(GlobtaskError::ConfigError(format!(
                "task '{}' needs either `cmd` or `copy = true`",
                self.name
            ))),
        }
    }
}

impl ConfigFile {
    /// Turn the `[[task]]` entries into declarations, in file order.
    pub fn declarations(&self) -> Result<Vec<TaskDeclaration>> {
        self.task
            .iter()
            .map(|t| {
                Ok(TaskDeclaration {
                    name: t.name.clone(),
                    pattern: t.pattern.clone(),
                    destination: t.dest.clone(),
                    transform: t.transform()?,
                })
            })
            .collect()
    }
}
