//! # npmrs Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Runs one shell command line as a subprocess and waits for it to exit.
//! Standard output is captured and, when a sink is supplied, copied to that
//! sink chunk by chunk while the process is still running. Standard error is
//! captured so it can be surfaced when the process fails.
//!
//! ## Architecture
//!
//! - The command line goes through the platform shell (`sh -c` on Unix,
//!   `cmd /C` on Windows) via `tokio::process::Command`.
//! - stdout and stderr are drained concurrently with `tokio::join!`, so a
//!   chatty stderr can never block a process that is writing to stdout.
//! - A zero exit status yields stdout with one trailing newline removed.
//!   Anything else becomes `NpmError::CommandFailed`.
//!
//! ```rust,no_run
//! use npmrs::common::process::{run_shell, ExecOptions};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let opts = ExecOptions::new(std::env::current_dir()?);
//! let version = run_shell("npm --version", &opts).await?;
//! println!("npm {version}");
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{NpmError, Result};
use anyhow::Context;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

/// Shared writer receiving a copy of every stdout chunk.
pub type OutputSink = Arc<Mutex<dyn Write + Send>>;

/// Wraps a writer into an [`OutputSink`].
pub fn sink<W: Write + Send + 'static>(writer: W) -> OutputSink {
    Arc::new(Mutex::new(writer))
}

/// Where and how a command line is executed.
#[derive(Clone)]
pub struct ExecOptions {
    pub cwd: PathBuf,
    pub env: HashMap<String, String>,
    pub sink: Option<OutputSink>,
}

impl ExecOptions {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            env: HashMap::new(),
            sink: None,
        }
    }
}

impl fmt::Debug for ExecOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecOptions")
            .field("cwd", &self.cwd)
            .field("env", &self.env)
            .field("sink", &self.sink.as_ref().map(|_| "<writer>"))
            .finish()
    }
}

fn shell_command(line: &str) -> Command {
    #[cfg(windows)]
    {
        let mut command = Command::new("cmd");
        command.arg("/C").arg(line);
        command
    }
    #[cfg(not(windows))]
    {
        let mut command = Command::new("sh");
        command.arg("-c").arg(line);
        command
    }
}

/// Runs `line` through the shell and returns its stdout.
///
/// # Errors
///
/// - The shell cannot be spawned or its pipes fail (I/O error with context).
/// - The process exits unsuccessfully: `NpmError::CommandFailed` carrying the
///   command line, the exit code (if any) and the trimmed stderr.
pub async fn run_shell(line: &str, opts: &ExecOptions) -> Result<String> {
    debug!("Executing `{}` in {}", line, opts.cwd.display());

    let mut command = shell_command(line);
    command
        .current_dir(&opts.cwd)
        .envs(&opts.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("Failed to spawn `{}` in {}", line, opts.cwd.display()))?;

    let stdout = child
        .stdout
        .take()
        .context("Child process stdout was not captured")?;
    let stderr = child
        .stderr
        .take()
        .context("Child process stderr was not captured")?;

    let (stdout_bytes, stderr_bytes, status) = tokio::join!(
        drain(stdout, opts.sink.as_ref()),
        drain(stderr, None),
        child.wait()
    );
    let stdout_bytes = stdout_bytes.context("Failed to read npm stdout")?;
    let stderr_bytes = stderr_bytes.context("Failed to read npm stderr")?;
    let status = status.with_context(|| format!("Failed to wait for `{}`", line))?;

    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr_bytes).trim().to_string();
        warn!("`{}` exited with {}", line, status);
        return Err(NpmError::CommandFailed {
            cmd: line.to_string(),
            code: status.code(),
            stderr,
        }
        .into());
    }

    debug!("`{}` finished ({} bytes of stdout)", line, stdout_bytes.len());
    let stdout = String::from_utf8_lossy(&stdout_bytes).into_owned();
    Ok(strip_final_newline(stdout))
}

/// Reads `reader` to the end, mirroring each chunk into `sink` if present.
///
/// A sink that fails (poisoned lock or write error, e.g. a closed pipe) is
/// dropped for the rest of the stream; capturing continues.
async fn drain<R>(mut reader: R, sink: Option<&OutputSink>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Vec::new();
    let mut buf = [0u8; 8192];
    let mut mirror = sink;
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        captured.extend_from_slice(&buf[..n]);
        if let Some(sink) = mirror {
            if let Err(e) = mirror_chunk(sink, &buf[..n]) {
                warn!("Stopped mirroring npm output: {}", e);
                mirror = None;
            }
        }
    }
    Ok(captured)
}

fn mirror_chunk(sink: &OutputSink, chunk: &[u8]) -> std::io::Result<()> {
    let mut writer = sink
        .lock()
        .map_err(|_| std::io::Error::other("output sink lock poisoned"))?;
    writer.write_all(chunk)?;
    writer.flush()
}

fn strip_final_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}
