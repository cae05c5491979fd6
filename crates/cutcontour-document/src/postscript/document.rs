// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory PostScript/EPS document as an ordered list of text lines.
//
// EPS files are single-byte text. They are decoded as Latin-1 so every byte
// survives a read/write cycle unchanged, and split on '\n' only so joining the
// lines back reproduces the input exactly (CR of CRLF files stays on its line).

use std::path::Path;

use cutcontour_core::error::{CutlineError, Result};
use tracing::{debug, instrument};

/// Magic comment every conforming PostScript document starts with.
pub const START_MARKER: &str = "%!PS-Adobe";

/// A page-description document held as lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsDocument {
    lines: Vec<String>,
}

impl PsDocument {
    // -- Construction ---------------------------------------------------------

    /// Parse document text, rejecting input without the `%!PS-Adobe` marker.
    pub fn parse(text: &str) -> Result<Self> {
        if !text.starts_with(START_MARKER) {
            return Err(CutlineError::InvalidDocument(format!(
                "document does not start with {START_MARKER}"
            )));
        }
        Ok(Self::from_lines(text.split('\n').map(str::to_owned).collect()))
    }

    /// Decode raw Latin-1 bytes and parse them.
    pub fn from_latin1(bytes: &[u8]) -> Result<Self> {
        Self::parse(&decode_latin1(bytes))
    }

    /// Read and parse a document from disk.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let doc = Self::from_latin1(&bytes)?;
        debug!(bytes = bytes.len(), lines = doc.lines.len(), "EPS loaded");
        Ok(doc)
    }

    /// Build a document from lines that are already known to be well formed.
    pub(crate) fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    // -- Inspection -----------------------------------------------------------

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether `name` appears anywhere in the document text.
    pub fn contains_marker(&self, name: &str) -> bool {
        self.lines.iter().any(|line| line.contains(name))
    }

    // -- Editing --------------------------------------------------------------

    /// Insert `new_lines` so that the first of them ends up at index `at`.
    pub(crate) fn insert_lines<I>(&mut self, at: usize, new_lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        let at = at.min(self.lines.len());
        self.lines.splice(at..at, new_lines);
    }

    pub(crate) fn replace_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    // -- Serialisation --------------------------------------------------------

    /// Join the lines back into document text.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Encode the document as Latin-1 bytes.
    pub fn to_latin1(&self) -> Result<Vec<u8>> {
        encode_latin1(&self.to_text())
    }
}

/// `"\r"` for lines split from a CRLF file, otherwise empty. Lines inserted
/// next to `line` carry the same ending.
pub(crate) fn line_ending(line: &str) -> &'static str {
    if line.ends_with('\r') { "\r" } else { "" }
}

/// Map every byte to the Unicode scalar of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Inverse of [`decode_latin1`]; fails on scalars above U+00FF.
pub fn encode_latin1(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| {
                CutlineError::Encoding(format!("character {c:?} is not representable in Latin-1"))
            })
        })
        .collect()
}
