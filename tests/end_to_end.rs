use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use globtask::exec::CopyTransform;
use globtask::task::TaskDeclaration;
use globtask::{cli, run, run_tasks, RunOptions};
use globtask_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn hashed_outputs(dir: &Path, stem: &str, ext: &str) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with(&format!("{stem}.")) && n.ends_with(&format!(".{ext}")))
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn hashed_copy_keeps_a_single_current_artifact() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("src"))?;
    fs::write(root.join("src/a.scss"), "body{}")?;

    let decls = [TaskDeclaration::new(
        "scss",
        "hash:src/(**).scss",
        "dist/$1.css",
        CopyTransform,
    )];

    let report = run_tasks(root, &decls, RunOptions::default()).await?;
    assert_eq!(report.tasks_run, 1);
    assert_eq!(report.errors, 0);

    let first = format!("a.{:x}.css", md5::compute(b"body{}"));
    assert_eq!(hashed_outputs(&root.join("dist"), "a", "css"), vec![first.clone()]);
    assert_eq!(fs::read_to_string(root.join("dist").join(&first))?, "body{}");

    // Nothing changed: nothing runs.
    let again = run_tasks(root, &decls, RunOptions::default()).await?;
    assert_eq!(again.tasks_run, 0);

    fs::write(root.join("src/a.scss"), "body{margin:0}")?;
    run_tasks(root, &decls, RunOptions::default()).await?;

    let second = format!("a.{:x}.css", md5::compute(b"body{margin:0}"));
    assert_eq!(hashed_outputs(&root.join("dist"), "a", "css"), vec![second]);
    Ok(())
}

#[tokio::test]
async fn stale_output_is_rebuilt_and_fresh_output_skipped() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("src"))?;
    fs::create_dir_all(root.join("dist"))?;
    fs::write(root.join("src/a.txt"), "new")?;
    fs::write(root.join("dist/a.txt"), "old")?;

    let decls = [TaskDeclaration::new("txt", "src/(*).txt", "dist/$1.txt", CopyTransform)];
    let source_time = SystemTime::now() - Duration::from_secs(60);
    fs::File::options()
        .write(true)
        .open(root.join("src/a.txt"))?
        .set_modified(source_time)?;

    fs::File::options()
        .write(true)
        .open(root.join("dist/a.txt"))?
        .set_modified(source_time)?;
    let report = run_tasks(root, &decls, RunOptions::default()).await?;
    assert_eq!(report.tasks_up_to_date, 1);
    assert_eq!(fs::read_to_string(root.join("dist/a.txt"))?, "old");

    fs::File::options()
        .write(true)
        .open(root.join("dist/a.txt"))?
        .set_modified(source_time - Duration::from_secs(10))?;
    let report = run_tasks(root, &decls, RunOptions::default()).await?;
    assert_eq!(report.tasks_run, 1);
    assert_eq!(fs::read_to_string(root.join("dist/a.txt"))?, "new");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn config_driven_run_uses_shell_and_copy_transforms() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("src/js"))?;
    fs::create_dir_all(root.join("static"))?;
    fs::write(root.join("src/js/app.js"), "let a = 1;")?;
    fs::write(root.join("static/logo.svg"), "<svg/>")?;

    let config_path = root.join("Globtask.toml");
    fs::write(
        &config_path,
        r#"
[[task]]
name = "js"
pattern = "src/js/(*).js"
dest = "dist/$1.js"
cmd = "printf '%s' \"$GLOBTASK_DEBUG\" > {dest}; cat {src} >> {dest}"

[[task]]
name = "static"
pattern = "static/(**)"
dest = "dist/$1"
copy = true
"#,
    )?;

    let config_arg = config_path.to_string_lossy().into_owned();
    let args = cli::parse_from(["globtask", "--release", "-c", config_arg.as_str()]);
    run(args).await?;

    assert_eq!(fs::read_to_string(root.join("dist/app.js"))?, "0let a = 1;");
    assert_eq!(fs::read_to_string(root.join("dist/logo.svg"))?, "<svg/>");
    Ok(())
}

#[tokio::test]
async fn dry_run_builds_nothing() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("src"))?;
    fs::write(root.join("src/a.txt"), "a")?;

    let config_path = root.join("Globtask.toml");
    fs::write(
        &config_path,
        "[[task]]\nname = \"txt\"\npattern = \"src/(*).txt\"\ndest = \"dist/$1.txt\"\ncopy = true\n",
    )?;

    let config_arg = config_path.to_string_lossy().into_owned();
    run(cli::parse_from(["globtask", "--dry-run", "--config", config_arg.as_str()])).await?;

    assert!(!root.join("dist").exists());
    Ok(())
}
