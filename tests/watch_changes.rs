use std::fs;
use std::path::Path;
use std::sync::Arc;

use tokio::time::{sleep, Duration};

use globtask::build::{Pipeline, PipelineOptions};
use globtask::exec::CopyTransform;
use globtask::fs::{FileSystem, RealFileSystem};
use globtask::task::TaskDeclaration;
use globtask::watch::{handle_change, spawn_watcher, ChangeOutcome, ExcludeSet};
use globtask_test_utils::{init_tracing, with_timeout, RecordingTransform};

fn copy_pipeline(root: &Path) -> Pipeline {
    Pipeline::new(
        root,
        &[TaskDeclaration::new("copy", "src/(**)", "dist/$1", CopyTransform)],
        Arc::new(RealFileSystem),
        PipelineOptions::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn changes_under_excluded_prefixes_are_ignored() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let fs_impl: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let transform = RecordingTransform::new(Arc::clone(&fs_impl));
    let pipeline = Pipeline::new(
        &root,
        &[TaskDeclaration::new("all", "(**)", "out/$1", transform.clone())],
        fs_impl,
        PipelineOptions::default(),
    )
    .unwrap();
    let excludes = ExcludeSet::new(&[".git/", "dist/"]).unwrap();

    for rel in ["dist/a.css", ".git/HEAD", "dist"] {
        let outcome = handle_change(&pipeline, &excludes, &root, &root.join(rel)).await;
        assert_eq!(outcome, ChangeOutcome::Ignored, "{rel}");
    }
    let outside = handle_change(&pipeline, &excludes, &root, Path::new("/definitely/not/here")).await;
    assert_eq!(outside, ChangeOutcome::Ignored);
    assert_eq!(transform.count(), 0);
}

#[tokio::test]
async fn changed_file_is_rebuilt() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("src/nested")).unwrap();
    fs::write(root.join("src/nested/a.txt"), "one").unwrap();

    let pipeline = copy_pipeline(&root);
    let excludes = ExcludeSet::new(&["dist/"]).unwrap();

    let outcome =
        handle_change(&pipeline, &excludes, &root, &root.join("src/nested/a.txt")).await;
    let ChangeOutcome::Processed(report) = outcome else {
        panic!("expected the change to be processed");
    };
    assert_eq!(report.files_seen, 1);
    assert_eq!(report.tasks_run, 1);
    assert_eq!(fs::read_to_string(root.join("dist/nested/a.txt")).unwrap(), "one");
}

#[tokio::test]
async fn changed_directory_is_walked() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("src/d")).unwrap();
    fs::write(root.join("src/d/a.txt"), "a").unwrap();
    fs::write(root.join("src/d/b.txt"), "b").unwrap();

    let pipeline = copy_pipeline(&root);
    let excludes = ExcludeSet::new(&["dist/"]).unwrap();

    let outcome = handle_change(&pipeline, &excludes, &root, &root.join("src/d")).await;
    assert!(matches!(outcome, ChangeOutcome::Processed(r) if r.tasks_run == 2));
}

#[tokio::test]
async fn watcher_builds_newly_created_files() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("src")).unwrap();

    let pipeline = Arc::new(copy_pipeline(&root));
    pipeline.run_initial_pass().await;

    let excludes = ExcludeSet::new(&["dist/"]).unwrap();
    let handle = spawn_watcher(Arc::clone(&pipeline), excludes).unwrap();
    assert_eq!(handle.roots(), &[root.join("src")]);

    // Give the backend a moment to register the watch.
    sleep(Duration::from_millis(200)).await;
    fs::write(root.join("src/new.txt"), "fresh").unwrap();

    let output = root.join("dist/new.txt");
    with_timeout(async {
        loop {
            if fs::read_to_string(&output).map(|s| s == "fresh").unwrap_or(false) {
                break;
            }
            sleep(Duration::from_millis(50)).await;
        }
    })
    .await;
}
