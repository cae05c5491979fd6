// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait definitions for the collaborators the converter treats as black boxes.
//
// Every call is blocking. Implementations bound their own running time and
// report an overrun as `CutlineError::CollaboratorTimeout`.

use std::path::Path;

use cutcontour_core::error::Result;

/// Turns a vector drawing into a PostScript/EPS document.
pub trait Exporter {
    /// Export `drawing` to `output`. With `selector`, only the element with
    /// that id is exported.
    fn export(&self, drawing: &Path, output: &Path, selector: Option<&str>) -> Result<()>;
}

/// Verdict of a validator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    /// The validator rejected the document; the detail is its diagnostic.
    Invalid(String),
    /// No validator available; the document is assumed valid.
    Skipped(String),
}

impl Validation {
    /// Whether the document may be treated as valid.
    pub fn is_acceptable(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }
}

/// Sanity-checks a produced document.
pub trait Validator {
    fn validate(&self, document: &Path) -> Result<Validation>;
}

/// Asks the operator a yes/no question.
pub trait Confirm {
    /// Returns `Ok(true)` only on an explicit yes.
    fn confirm(&self, question: &str) -> Result<bool>;
}
