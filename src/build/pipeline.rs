// src/build/pipeline.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::build::hashed::apply_content_hash;
use crate::build::staleness::is_up_to_date;
use crate::build::walker::{Walk, WalkEntry};
use crate::errors::{GlobtaskError, Result};
use crate::fs::FileSystem;
use crate::status;
use crate::task::{compile_all, CompiledTask, TaskDeclaration, TransformJob};
use crate::types::HashAlgorithm;

/// Process-wide settings handed to the pipeline at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Exposed to transforms; `false` when building with `--release`.
    pub debug: bool,
    pub hash_algorithm: HashAlgorithm,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            debug: true,
            hash_algorithm: HashAlgorithm::default(),
        }
    }
}

/// Counters for one pass (initial build or one watch-triggered path).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub files_seen: usize,
    pub tasks_run: usize,
    pub tasks_up_to_date: usize,
    pub errors: usize,
}

impl PassReport {
    pub fn merge(&mut self, other: PassReport) {
        self.files_seen += other.files_seen;
        self.tasks_run += other.tasks_run;
        self.tasks_up_to_date += other.tasks_up_to_date;
        self.errors += other.errors;
    }
}

/// Matches files against compiled tasks and runs the stale ones.
///
/// Files are handled one at a time and, per file, tasks run in declaration
/// order, each transform awaited before the next starts. Any failure while
/// handling a file is logged and counted; the pass moves on to the next
/// entry.
pub struct Pipeline {
    root: PathBuf,
    tasks: Vec<CompiledTask>,
    fs: Arc<dyn FileSystem>,
    options: PipelineOptions,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("root", &self.root)
            .field("tasks", &self.tasks)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Compile all declarations up front. `root` is the project directory
    /// patterns and destination templates are relative to.
    pub fn new(
        root: impl Into<PathBuf>,
        declarations: &[TaskDeclaration],
        fs: Arc<dyn FileSystem>,
        options: PipelineOptions,
    ) -> Result<Self> {
        let tasks = compile_all(declarations)?;
        Ok(Self {
            root: root.into(),
            tasks,
            fs,
            options,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tasks(&self) -> &[CompiledTask] {
        &self.tasks
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Distinct traversal roots in first-declared order, resolved against
    /// the project root.
    pub fn source_roots(&self) -> Vec<PathBuf> {
        let mut seen: Vec<&str> = Vec::new();
        for task in &self.tasks {
            let root = task.matcher.source_root();
            if !seen.contains(&root) {
                seen.push(root);
            }
        }
        seen.into_iter()
            .map(|r| if r == "." { self.root.clone() } else { self.root.join(r) })
            .collect()
    }

    /// Path relative to the project root with `/` separators, the form
    /// patterns are matched against.
    pub fn relative_path(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.to_string_lossy().replace('\\', "/")
    }

    /// Walk every source root once.
    pub async fn run_initial_pass(&self) -> PassReport {
        let mut report = PassReport::default();
        for root in self.source_roots() {
            debug!(root = ?root, "processing source root");
            report.merge(self.process_path(&root).await);
        }
        info!(
            files = report.files_seen,
            ran = report.tasks_run,
            up_to_date = report.tasks_up_to_date,
            errors = report.errors,
            "initial pass complete"
        );
        report
    }

    /// Process a single file, or every file below a directory.
    pub async fn process_path(&self, path: &Path) -> PassReport {
        let mut report = PassReport::default();

        for entry in Walk::new(self.fs.as_ref(), path) {
            match entry {
                Ok(WalkEntry::Dir(_)) => {}
                Ok(WalkEntry::File(file)) => {
                    report.files_seen += 1;
                    if let Err(err) = self.process_file(&file, &mut report).await {
                        report.errors += 1;
                        error!(path = ?file, "{err}");
                    }
                }
                Err(err) => {
                    report.errors += 1;
                    error!("{err}");
                }
            }
        }

        report
    }

    async fn process_file(&self, path: &Path, report: &mut PassReport) -> Result<()> {
        let rel = self.relative_path(path);
        let source_modified = self.fs.modified(path)?;

        for task in &self.tasks {
            let Some(dest) = task.destination_for(&rel) else {
                continue;
            };
            let mut destination = self.root.join(&dest);

            if task.hashed {
                let hashed = apply_content_hash(
                    Arc::clone(&self.fs),
                    path,
                    &destination,
                    self.options.hash_algorithm,
                )
                .await?;
                destination = hashed.path;
            }

            if is_up_to_date(self.fs.as_ref(), source_modified, &destination)? {
                debug!(task = %task.name, source = %rel, "output up to date");
                report.tasks_up_to_date += 1;
                continue;
            }

            if let Some(parent) = destination.parent() {
                self.fs.create_dir_all(parent)?;
            }

            status::tag(&task.name, self.relative_path(&destination));

            let job = TransformJob {
                task: task.name.clone(),
                source: path.to_path_buf(),
                destination,
                debug: self.options.debug,
            };
            task.transform
                .run(&job)
                .await
                .map_err(|err| GlobtaskError::Transform {
                    task: task.name.clone(),
                    message: format!("{err:#}"),
                })?;

            report.tasks_run += 1;
        }

        Ok(())
    }
}
