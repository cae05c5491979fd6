// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output naming and atomic writes.

use std::io::Write;
use std::path::{Path, PathBuf};

use cutcontour_core::InputKind;
use cutcontour_core::error::{CutlineError, Result};
use tempfile::NamedTempFile;
use tracing::debug;

/// Suffix appended to the input stem when no output path is given.
pub const OUTPUT_SUFFIX: &str = "_versaworks";

/// `<dir>/<stem>_versaworks<ext>` next to `input`; drawings become `.eps`.
pub fn default_output_path(input: &Path, kind: InputKind) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".into());
    let extension = match kind {
        InputKind::Drawing => "eps".to_owned(),
        InputKind::PostScript => input
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "eps".into()),
    };
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}.{extension}"))
}

/// Write `bytes` to a hidden temp file in the destination directory.
///
/// Nothing is visible at `destination` until [`commit`] succeeds; dropping
/// the returned handle removes the temp file.
pub fn stage(destination: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::Builder::new()
        .prefix(".cutcontour-")
        .suffix(".eps")
        .tempfile_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    debug!(staged = %staged.path().display(), bytes = bytes.len(), "output staged");
    Ok(staged)
}

/// Atomically move a staged file into place, replacing any existing file.
pub fn commit(staged: NamedTempFile, destination: &Path) -> Result<()> {
    staged
        .persist(destination)
        .map_err(|err| CutlineError::Io(err.error))?;
    Ok(())
}
