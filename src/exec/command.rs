// src/exec/command.rs

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{bail, Context};
use tokio::process::Command;
use tracing::{debug, info};

use crate::task::{Transform, TransformFuture, TransformJob};

/// Runs a shell command for each matched file.
///
/// `{src}` and `{dest}` in the command are replaced by the (shell-quoted)
/// source and destination paths. The same values, plus the debug flag, are
/// exported as `GLOBTASK_SRC`, `GLOBTASK_DEST` and `GLOBTASK_DEBUG`
/// (`1`/`0`). A non-zero exit is a transform failure carrying the exit code
/// and stderr.
///
/// The command inherits the process working directory unless one is set
/// with [`ShellTransform::in_dir`]; job paths are relative to the former.
#[derive(Debug, Clone)]
pub struct ShellTransform {
    command: String,
    working_dir: Option<PathBuf>,
}

impl ShellTransform {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            working_dir: None,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The command line with placeholders expanded for `job`.
    pub fn render(&self, job: &TransformJob) -> String {
        self.command
            .replace("{src}", &quote(&job.source))
            .replace("{dest}", &quote(&job.destination))
    }
}

impl Transform for ShellTransform {
    fn run<'a>(&'a self, job: &'a TransformJob) -> TransformFuture<'a> {
        Box::pin(self.execute(job))
    }
}

impl ShellTransform {
    async fn execute(&self, job: &TransformJob) -> anyhow::Result<()> {
        let rendered = self.render(job);
        info!(task = %job.task, cmd = %rendered, "running transform command");

        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&rendered);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&rendered);
            c
        };

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd.env("GLOBTASK_SRC", &job.source)
            .env("GLOBTASK_DEST", &job.destination)
            .env("GLOBTASK_DEBUG", if job.debug { "1" } else { "0" })
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = cmd
            .output()
            .await
            .with_context(|| format!("spawning process for task '{}'", job.task))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(task = %job.task, "stdout: {}", line);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            debug!(task = %job.task, "stderr: {}", line);
        }

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            bail!("command exited with code {code}: {}", stderr.trim());
        }
        Ok(())
    }
}

#[cfg(unix)]
fn quote(path: &Path) -> String {
    let s = path.to_string_lossy();
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(not(unix))]
fn quote(path: &Path) -> String {
    format!("\"{}\"", path.to_string_lossy())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn job(dir: &Path) -> TransformJob {
        TransformJob {
            task: "sh".to_string(),
            source: dir.join("in file.txt"),
            destination: dir.join("out.txt"),
            debug: false,
        }
    }

    #[test]
    fn placeholders_are_quoted() {
        let t = ShellTransform::new("cp {src} {dest}");
        let rendered = t.render(&job(Path::new("/tmp/x")));
        assert_eq!(rendered, "cp '/tmp/x/in file.txt' '/tmp/x/out.txt'");
    }

    #[tokio::test]
    async fn runs_command_with_env() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("in file.txt"), "hi").unwrap();

        let t = ShellTransform::new(
            "cat {src} > {dest} && printf \"$GLOBTASK_DEBUG\" >> \"$GLOBTASK_DEST\"",
        )
        .in_dir(dir.path());
        t.run(&job(dir.path())).await.unwrap();

        let out = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(out, "hi0");
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error_with_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let t = ShellTransform::new("echo broken >&2; exit 3").in_dir(dir.path());

        let err = t.run(&job(dir.path())).await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("code 3"), "{msg}");
        assert!(msg.contains("broken"), "{msg}");
    }
}
