use std::io::Read;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use globtask::fs::FileSystem;
use globtask::task::{Transform, TransformFuture, TransformJob};

/// A transform for tests that:
/// - records every job it is handed, in order
/// - copies the source bytes to the destination through the given
///   `FileSystem` (so it works with both the mock and the real one)
/// - optionally fails for sources whose path contains a marker.
#[derive(Debug, Clone)]
pub struct RecordingTransform {
    fs: Arc<dyn FileSystem>,
    jobs: Arc<Mutex<Vec<TransformJob>>>,
    fail_marker: Option<String>,
}

impl RecordingTransform {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            jobs: Arc::new(Mutex::new(Vec::new())),
            fail_marker: None,
        }
    }

    /// Fail (after recording) for any source path containing `marker`.
    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    /// Jobs recorded so far.
    pub fn jobs(&self) -> Vec<TransformJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.jobs.lock().unwrap().clear();
    }

    fn execute(&self, job: &TransformJob) -> anyhow::Result<()> {
        self.jobs.lock().unwrap().push(job.clone());

        if let Some(marker) = &self.fail_marker {
            if job.source.to_string_lossy().contains(marker.as_str()) {
                return Err(anyhow!("refusing to build {:?}", job.source));
            }
        }

        let mut reader = self.fs.open_read(&job.source)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.fs.write(&job.destination, &bytes)?;
        Ok(())
    }
}

impl Transform for RecordingTransform {
    fn run<'a>(&'a self, job: &'a TransformJob) -> TransformFuture<'a> {
        let result = self.execute(job);
        Box::pin(async move { result })
    }
}
