// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-backed collaborators: Inkscape as exporter, Ghostscript as validator.
//
// Each tool runs as a child process with stdin/stdout closed and stderr
// captured to an anonymous temp file (no pipe to fill up). The child is polled
// until it exits or the timeout elapses, in which case it is killed.

use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use cutcontour_core::error::{CutlineError, Result};
use tracing::{debug, info, instrument, warn};

use crate::traits::{Exporter, Validation, Validator};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Last bytes of stderr kept in error messages.
const STDERR_TAIL: usize = 400;

/// Exit status and captured stderr of a finished tool.
#[derive(Debug)]
pub struct ToolRun {
    pub status: ExitStatus,
    pub stderr: String,
}

/// Run `command` to completion or until `timeout` elapses.
///
/// Spawn failures are returned as `CutlineError::Io` so callers can tell a
/// missing binary (`NotFound`) apart from a failing one.
pub fn run_with_timeout(mut command: Command, tool: &str, timeout: Duration) -> Result<ToolRun> {
    let mut stderr_file = tempfile::tempfile()?;
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::from(stderr_file.try_clone()?));

    let mut child = command.spawn()?;
    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() >= timeout {
            if let Err(err) = child.kill() {
                warn!(tool, error = %err, "failed to kill timed-out tool");
            }
            // Reap the child; its exit status is irrelevant now.
            let _ = child.wait();
            return Err(CutlineError::CollaboratorTimeout {
                tool: tool.to_owned(),
                seconds: timeout.as_secs(),
            });
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    let mut raw = Vec::new();
    stderr_file.seek(SeekFrom::Start(0))?;
    stderr_file.read_to_end(&mut raw)?;
    let stderr = String::from_utf8_lossy(&raw).into_owned();

    debug!(tool, %status, elapsed_ms = started.elapsed().as_millis() as u64, "tool finished");
    Ok(ToolRun { status, stderr })
}

fn tail(text: &str) -> &str {
    let trimmed = text.trim();
    let mut start = trimmed.len().saturating_sub(STDERR_TAIL);
    while !trimmed.is_char_boundary(start) {
        start += 1;
    }
    &trimmed[start..]
}

fn tool_name(binary: &Path) -> String {
    binary
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| binary.display().to_string())
}

// -- Inkscape -----------------------------------------------------------------

/// Exports SVG drawings to EPS with the Inkscape 1.x command line.
#[derive(Debug, Clone)]
pub struct InkscapeExporter {
    binary: PathBuf,
    timeout: Duration,
}

impl InkscapeExporter {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    fn command(&self, drawing: &Path, output: &Path, selector: Option<&str>) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg(drawing)
            .arg("--export-type=eps")
            .arg(format!("--export-filename={}", output.display()))
            // Same page box for every layer so the merge lines up.
            .arg("--export-area-page")
            // Font resources live in the setup section, which the merge drops.
            .arg("--export-text-to-path");
        if let Some(id) = selector {
            command.arg(format!("--export-id={id}")).arg("--export-id-only");
        }
        command
    }
}

impl Exporter for InkscapeExporter {
    #[instrument(skip(self), fields(drawing = %drawing.display(), output = %output.display()))]
    fn export(&self, drawing: &Path, output: &Path, selector: Option<&str>) -> Result<()> {
        let tool = tool_name(&self.binary);
        let run = match run_with_timeout(self.command(drawing, output, selector), &tool, self.timeout)
        {
            Ok(run) => run,
            Err(CutlineError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CutlineError::Exporter(format!("{tool}: program not found")));
            }
            Err(CutlineError::Io(err)) => {
                return Err(CutlineError::Exporter(format!("{tool}: {err}")));
            }
            Err(other) => return Err(other),
        };

        if !run.status.success() {
            return Err(CutlineError::Exporter(format!(
                "{tool} exited with {}: {}",
                run.status,
                tail(&run.stderr)
            )));
        }
        if !output.is_file() {
            return Err(CutlineError::Exporter(format!(
                "{tool} reported success but produced no output at {}",
                output.display()
            )));
        }

        info!("drawing exported");
        Ok(())
    }
}

// -- Ghostscript --------------------------------------------------------------

/// Interprets the document with Ghostscript's null device.
#[derive(Debug, Clone)]
pub struct GhostscriptValidator {
    binary: PathBuf,
    timeout: Duration,
}

impl GhostscriptValidator {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

impl Validator for GhostscriptValidator {
    #[instrument(skip(self), fields(document = %document.display()))]
    fn validate(&self, document: &Path) -> Result<Validation> {
        let tool = tool_name(&self.binary);
        let mut command = Command::new(&self.binary);
        command
            .args(["-q", "-dSAFER", "-dBATCH", "-dNOPAUSE", "-sDEVICE=nullpage"])
            .arg(document);

        match run_with_timeout(command, &tool, self.timeout) {
            Ok(run) if run.status.success() => {
                info!("document validated");
                Ok(Validation::Valid)
            }
            Ok(run) => {
                warn!(status = %run.status, "validator rejected the document");
                Ok(Validation::Invalid(tail(&run.stderr).to_owned()))
            }
            Err(CutlineError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("{tool} not found, skipping validation");
                Ok(Validation::Skipped(format!("{tool} not installed")))
            }
            Err(CutlineError::Io(err)) => Err(CutlineError::Validator(format!("{tool}: {err}"))),
            Err(other) => Err(other),
        }
    }
}
