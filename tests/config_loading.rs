use std::error::Error;
use std::io::Write;

use tempfile::NamedTempFile;

use globtask::config::{load_and_validate, load_from_path, validate_config};
use globtask::errors::GlobtaskError;
use globtask::types::HashAlgorithm;
use globtask_test_utils::builders::{ConfigFileBuilder, TaskConfigBuilder};
use globtask_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn tasks_keep_file_order_and_defaults_apply() -> TestResult {
    init_tracing();

    let file = write_config(
        r#"
[[task]]
name = "scss"
pattern = "hash:src/(**).scss"
dest = "dist/$1.css"
cmd = "sass {src} {dest}"

[[task]]
name = "assets"
pattern = "static/(**)"
dest = "dist/$1"
copy = true
"#,
    );

    let cfg = load_and_validate(file.path())?;
    let names: Vec<&str> = cfg.task.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["scss", "assets"]);
    assert_eq!(cfg.config.hash_algorithm, HashAlgorithm::Md5);
    assert_eq!(cfg.config.watch_exclude, vec![".git/", "dist/"]);

    let decls = cfg.declarations()?;
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0].pattern, "hash:src/(**).scss");
    assert_eq!(decls[1].destination, "dist/$1");
    Ok(())
}

#[test]
fn config_section_overrides_defaults() -> TestResult {
    init_tracing();

    let file = write_config(
        r#"
[config]
hash_algorithm = "blake3"
watch_exclude = ["public/"]

[[task]]
name = "copy"
pattern = "src/(*)"
dest = "public/$1"
copy = true
"#,
    );

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.config.hash_algorithm, HashAlgorithm::Blake3);
    assert_eq!(cfg.config.watch_exclude, vec!["public/"]);
    Ok(())
}

#[test]
fn unknown_hash_algorithm_is_a_toml_error() {
    let file = write_config(
        r#"
[config]
hash_algorithm = "sha1"

[[task]]
name = "copy"
pattern = "src/(*)"
dest = "out/$1"
copy = true
"#,
    );

    assert!(matches!(
        load_from_path(file.path()),
        Err(GlobtaskError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_a_filesystem_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_from_path(dir.path().join("Globtask.toml")).unwrap_err();
    assert!(matches!(err, GlobtaskError::FilesystemAccess { .. }), "{err}");
}

#[test]
fn empty_config_is_rejected() {
    let file = write_config("");
    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, GlobtaskError::ConfigError(_)), "{err}");
}

#[test]
fn duplicate_task_names_are_rejected() {
    let cfg = ConfigFileBuilder::new()
        .with_task(TaskConfigBuilder::new("css", "src/*.css", "dist/$1.css").copy().build())
        .with_task(TaskConfigBuilder::new("css", "lib/*.css", "dist/$1.css").copy().build())
        .build_unchecked();

    let err = validate_config(&cfg).unwrap_err();
    assert!(err.to_string().contains("duplicate task name 'css'"), "{err}");
}

#[test]
fn transform_kind_must_be_exactly_one() {
    let both = ConfigFileBuilder::new()
        .with_task(
            TaskConfigBuilder::new("x", "src/*.a", "out/$1")
                .cmd("true")
                .copy()
                .build(),
        )
        .build_unchecked();
    assert!(matches!(validate_config(&both), Err(GlobtaskError::ConfigError(_))));

    let neither = ConfigFileBuilder::new()
        .with_task(TaskConfigBuilder::new("x", "src/*.a", "out/$1").build())
        .build_unchecked();
    assert!(matches!(validate_config(&neither), Err(GlobtaskError::ConfigError(_))));
}

#[test]
fn empty_pattern_or_destination_is_rejected() {
    let no_pattern = ConfigFileBuilder::new()
        .with_task(TaskConfigBuilder::new("x", "hash:", "out/$1").copy().build())
        .build_unchecked();
    assert!(validate_config(&no_pattern).is_err());

    let no_dest = ConfigFileBuilder::new()
        .with_task(TaskConfigBuilder::new("x", "src/*", "").copy().build())
        .build_unchecked();
    assert!(validate_config(&no_dest).is_err());
}

#[test]
fn builder_produces_valid_config() {
    let cfg = ConfigFileBuilder::new()
        .with_hash_algorithm(HashAlgorithm::Blake3)
        .with_watch_exclude("tmp/")
        .with_task(
            TaskConfigBuilder::new("min", "hash:src/(*).js", "dist/$1.js")
                .cmd("cp {src} {dest}")
                .build(),
        )
        .build();

    assert_eq!(cfg.config.watch_exclude, vec![".git/", "dist/", "tmp/"]);
    assert_eq!(cfg.declarations().unwrap()[0].name, "min");
}

#[test]
fn demo_config_is_valid() -> TestResult {
    init_tracing();

    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("demos/Globtask.toml"))?;

    assert_eq!(cfg.task[0].name, "css");
    assert!(cfg.task[0].copy);
    assert!(cfg.task[1].cmd.is_some());
    Ok(())
}
