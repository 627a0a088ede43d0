// src/lib.rs

pub mod build;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod status;
pub mod task;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::build::{PassReport, Pipeline, PipelineOptions};
use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::fs::RealFileSystem;
use crate::task::TaskDeclaration;
use crate::watch::ExcludeSet;

/// Options for [`run_tasks`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Keep watching the source roots after the initial pass.
    pub watch: bool,
    pub pipeline: PipelineOptions,
    /// Prefixes ignored in watch mode.
    pub watch_exclude: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            watch: false,
            pipeline: PipelineOptions::default(),
            watch_exclude: vec![".git/".to_string(), "dist/".to_string()],
        }
    }
}

/// Compile `declarations` and build everything under `root` once.
///
/// With `options.watch` set this then keeps reprocessing changed paths and
/// only returns once Ctrl-C is received.
pub async fn run_tasks(
    root: impl Into<PathBuf>,
    declarations: &[TaskDeclaration],
    options: RunOptions,
) -> Result<PassReport> {
    let pipeline = Pipeline::new(
        root,
        declarations,
        Arc::new(RealFileSystem),
        options.pipeline,
    )?;

    let report = pipeline.run_initial_pass().await;
    if !options.watch {
        return Ok(report);
    }

    let excludes = ExcludeSet::new(&options.watch_exclude)?;
    let pipeline = Arc::new(pipeline);
    let _watcher_handle = watch::spawn_watcher(Arc::clone(&pipeline), excludes)?;
    status::watching();

    tokio::signal::ctrl_c().await?;
    println!();
    info!("received Ctrl-C, stopping");
    Ok(report)
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - task declarations from `[[task]]` entries
/// - the initial build pass
/// - (optional) watch mode
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let root = config_root_dir(&config_path);
    let declarations = cfg.declarations()?;

    let options = RunOptions {
        watch: args.watch,
        pipeline: PipelineOptions {
            debug: args.debug(),
            hash_algorithm: args.hash_algorithm.unwrap_or(cfg.config.hash_algorithm),
        },
        watch_exclude: cfg.config.watch_exclude.clone(),
    };

    if args.dry_run {
        print_dry_run(&root, &declarations, &options)?;
        return Ok(());
    }

    let report = run_tasks(root, &declarations, options).await?;
    debug!(?report, "run finished");
    Ok(())
}

/// Figure out the project root that patterns are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "web/Globtask.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Globtask.toml" (parent = ""),
///   we fall back to "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Simple dry-run output: print compiled tasks and traversal roots.
fn print_dry_run(
    root: &Path,
    declarations: &[TaskDeclaration],
    options: &RunOptions,
) -> Result<()> {
    let pipeline = Pipeline::new(
        root,
        declarations,
        Arc::new(RealFileSystem),
        options.pipeline,
    )?;

    println!("globtask dry-run");
    println!("  root = {}", root.display());
    println!("  debug = {}", options.pipeline.debug);
    println!("  hash_algorithm = {:?}", options.pipeline.hash_algorithm);
    println!("  watch = {}", options.watch);
    println!();

    println!("tasks ({}):", pipeline.tasks().len());
    for task in pipeline.tasks() {
        println!("  - {}", task.name);
        println!("      pattern: {}", task.matcher.as_str());
        println!("      regex: {}", task.matcher.regex_str());
        println!("      dest: {}", task.destination);
        if task.hashed {
            println!("      hashed: true");
        }
    }

    println!();
    println!("source roots:");
    for source_root in pipeline.source_roots() {
        println!("  - {}", source_root.display());
    }

    debug!("dry-run complete (no transforms run)");
    Ok(())
}
