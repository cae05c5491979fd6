// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for CutContour.

use thiserror::Error;

/// Top-level error type for all CutContour operations.
#[derive(Debug, Error)]
pub enum CutlineError {
    // -- Input errors --
    #[error("not a valid PostScript/EPS document: {0}")]
    InvalidDocument(String),

    #[error("could not read drawing: {0}")]
    Drawing(String),

    #[error("text encoding error: {0}")]
    Encoding(String),

    // -- Structure errors --
    /// A structural marker required by the merge could not be located.
    #[error("{step}: marker `{marker}` not found")]
    MarkerNotFound {
        step: &'static str,
        marker: &'static str,
    },

    // -- External tools --
    #[error("export failed: {0}")]
    Exporter(String),

    #[error("{tool} did not finish within {seconds}s")]
    CollaboratorTimeout { tool: String, seconds: u64 },

    #[error("validation failed: {0}")]
    Validator(String),

    // -- User interaction --
    #[error("conversion cancelled by user")]
    Declined,

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CutlineError>;
