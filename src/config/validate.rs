// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::ConfigFile;
use crate::errors::{GlobtaskError, Result};
use crate::task::pattern::{split_hash_prefix, GlobPattern};

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - there is at least one task
/// - task names are non-empty and unique
/// - `pattern` and `dest` are non-empty
/// - each task has exactly one of `cmd` / `copy`
/// - every pattern compiles
///
/// It does **not** check that `hash:` destinations carry an extension; that
/// surfaces per file at build time.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_names(cfg)?;
    validate_tasks(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &ConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(GlobtaskError::ConfigError(
            "config must contain at least one [[task]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_names(cfg: &ConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for task in &cfg.task {
        if task.name.trim().is_empty() {
            return Err(GlobtaskError::ConfigError(format!(
                "task with pattern '{}' has an empty name",
                task.pattern
            )));
        }
        if !seen.insert(task.name.as_str()) {
            return Err(GlobtaskError::ConfigError(format!(
                "duplicate task name '{}'",
                task.name
            )));
        }
    }
    Ok(())
}

fn validate_tasks(cfg: &ConfigFile) -> Result<()> {
    for task in &cfg.task {
        let (bare, _) = split_hash_prefix(&task.pattern);
        if bare.is_empty() {
            return Err(GlobtaskError::ConfigError(format!(
                "task '{}' has an empty pattern",
                task.name
            )));
        }
        if task.dest.is_empty() {
            return Err(GlobtaskError::ConfigError(format!(
                "task '{}' has an empty dest",
                task.name
            )));
        }
        task.transform()?;
        GlobPattern::compile(bare)?;
    }
    Ok(())
}
