// src/task/mod.rs

//! Task declarations and their compiled form.
//!
//! A [`TaskDeclaration`] is what the caller hands in: a glob pattern
//! (optionally `hash:`-prefixed), a destination template and a transform.
//! [`CompiledTask`] is the same rule after the pattern has been compiled,
//! which happens exactly once, before any file is processed.

pub mod pattern;
pub mod template;

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::Result;

pub use pattern::{GlobPattern, HASH_PREFIX};
pub use template::expand_destination;

/// Public type alias for task names.
pub type TaskName = String;

/// Boxed future returned by [`Transform::run`].
pub type TransformFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// Everything a transform gets to know about one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformJob {
    pub task: TaskName,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// `true` unless the run was started with `--release`.
    pub debug: bool,
}

/// Produces a destination file from a source file.
///
/// The pipeline guarantees that the destination's parent directory exists
/// before calling [`Transform::run`].
pub trait Transform: Send + Sync {
    fn run<'a>(&'a self, job: &'a TransformJob) -> TransformFuture<'a>;
}

/// Adapter turning an async closure into a [`Transform`].
pub struct FnTransform<F>(pub F);

impl<F, Fut> Transform for FnTransform<F>
where
    F: Fn(TransformJob) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn run<'a>(&'a self, job: &'a TransformJob) -> TransformFuture<'a> {
        Box::pin((self.0)(job.clone()))
    }
}

/// A user-declared rule, before compilation.
#[derive(Clone)]
pub struct TaskDeclaration {
    /// Label used in status lines and logs.
    pub name: TaskName,
    /// Glob pattern, optionally prefixed with `hash:`.
    pub pattern: String,
    /// Destination template with `$1..$N` / `$@` placeholders.
    pub destination: String,
    pub transform: Arc<dyn Transform>,
}

impl fmt::Debug for TaskDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDeclaration")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

impl TaskDeclaration {
    pub fn new<N, P, D, T>(name: N, pattern: P, destination: D, transform: T) -> Self
    where
        N: Into<TaskName>,
        P: Into<String>,
        D: Into<String>,
        T: Transform + 'static,
    {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            destination: destination.into(),
            transform: Arc::new(transform),
        }
    }

    /// Compile the pattern, recording whether `hash:` was requested.
    pub fn compile(&self) -> Result<CompiledTask> {
        let (bare, hashed) = pattern::split_hash_prefix(&self.pattern);
        Ok(CompiledTask {
            name: self.name.clone(),
            matcher: GlobPattern::compile(bare)?,
            destination: self.destination.clone(),
            hashed,
            transform: Arc::clone(&self.transform),
        })
    }
}

/// A task after pattern compilation.
#[derive(Clone)]
pub struct CompiledTask {
    pub name: TaskName,
    pub matcher: GlobPattern,
    pub destination: String,
    pub hashed: bool,
    pub transform: Arc<dyn Transform>,
}

impl fmt::Debug for CompiledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTask")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .field("destination", &self.destination)
            .field("hashed", &self.hashed)
            .finish_non_exhaustive()
    }
}

impl CompiledTask {
    /// If `rel_path` matches, return the expanded (pre-hash) destination.
    pub fn destination_for(&self, rel_path: &str) -> Option<String> {
        let captures = self.matcher.captures(rel_path)?;
        Some(expand_destination(&self.destination, &captures))
    }
}

/// Compile all declarations, preserving declaration order.
pub fn compile_all(declarations: &[TaskDeclaration]) -> Result<Vec<CompiledTask>> {
    declarations.iter().map(TaskDeclaration::compile).collect()
}
