// src/cli.rs

//! CLI argument parsing using `clap`.

use std::ffi::OsString;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::types::HashAlgorithm;

/// Command-line arguments for `globtask`.
///
/// Unrecognized arguments are ignored rather than rejected, see [`parse_from`].
#[derive(Debug, Clone, Parser)]
#[command(
    name = "globtask",
    version,
    about = "Build derived files from source globs, skipping up-to-date outputs.",
    long_about = None
)]
pub struct CliArgs {
    /// Watch files for changes after the first build.
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Build in release mode (default is debug).
    ///
    /// Transforms see this as `debug = false` / `GLOBTASK_DEBUG=0`.
    #[arg(long)]
    pub release: bool,

    /// Path to the config file (TOML).
    #[arg(short, long, value_name = "PATH", default_value_t = DEFAULT_CONFIG_FILE.to_string())]
    pub config: String,

    /// Override `[config].hash_algorithm` (md5, blake3).
    #[arg(long, value_name = "ALGO")]
    pub hash_algorithm: Option<HashAlgorithm>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GLOBTASK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the compiled tasks and source roots without building anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Debug mode unless `--release` was given.
    pub fn debug(&self) -> bool {
        !self.release
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse the process arguments, see [`parse_from`].
pub fn parse() -> CliArgs {
    parse_from(std::env::args_os())
}

/// Parse arguments, dropping any that are not recognized.
///
/// `--help` / `--version` print and exit with status 0; other errors
/// (e.g. a missing option value) print and exit as usual.
pub fn parse_from<I, T>(itr: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    match try_parse_lenient(itr) {
        Ok(args) => args,
        Err(err) => err.exit(),
    }
}

/// Like [`parse_from`], but returns the error instead of exiting.
///
/// An argv element clap rejects as unknown (`--frobnicate`, a short
/// cluster such as `-wx`, a flag with an attached value such as
/// `--release=1`) is dropped whole and parsing is retried.
pub fn try_parse_lenient<I, T>(itr: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = itr.into_iter().map(Into::into).collect();

    loop {
        let err = match CliArgs::try_parse_from(&args) {
            Ok(parsed) => return Ok(parsed),
            Err(err) => err,
        };
        match offending_index(&args, &err) {
            Some(idx) => {
                args.remove(idx);
            }
            None => return Err(err),
        }
    }
}

/// Index (never 0) of the argv element responsible for an "unknown" error.
fn offending_index(args: &[OsString], err: &clap::Error) -> Option<usize> {
    let position = |pred: &dyn Fn(&str) -> bool| {
        args.iter()
            .skip(1)
            .position(|a| pred(a.to_string_lossy().as_ref()))
            .map(|i| i + 1)
    };

    match err.kind() {
        ErrorKind::UnknownArgument => {
            let bad = context_str(err, ContextKind::InvalidArg)?;
            let with_value = format!("{bad}=");
            position(&|a| a == bad || a.starts_with(&with_value)).or_else(|| {
                // `-x` reported out of a cluster like `-wx`.
                let short = bad.strip_prefix('-').filter(|c| c.chars().count() == 1)?;
                position(&|a| {
                    a.len() > 1
                        && a.starts_with('-')
                        && !a.starts_with("--")
                        && a[1..].contains(short)
                })
            })
        }
        ErrorKind::TooManyValues => {
            // A value glued onto a flag that takes none: `--release=1`.
            let value = context_str(err, ContextKind::InvalidValue)?;
            let suffix = format!("={value}");
            position(&|a| a.starts_with('-') && a.ends_with(&suffix))
        }
        _ => None,
    }
}

fn context_str(err: &clap::Error, kind: ContextKind) -> Option<&str> {
    match err.get(kind) {
        Some(ContextValue::String(s)) => Some(s.as_str()),
        _ => None,
    }
}
