// src/exec/copy.rs

use anyhow::Context;
use tracing::debug;

use crate::task::{Transform, TransformFuture, TransformJob};

/// Copies the source file to the destination unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyTransform;

impl Transform for CopyTransform {
    fn run<'a>(&'a self, job: &'a TransformJob) -> TransformFuture<'a> {
        Box::pin(copy_file(job))
    }
}

async fn copy_file(job: &TransformJob) -> anyhow::Result<()> {
    let bytes = tokio::fs::copy(&job.source, &job.destination)
        .await
        .with_context(|| format!("copying {:?} to {:?}", job.source, job.destination))?;
    debug!(task = %job.task, bytes, "copied source to destination");
    Ok(())
}
