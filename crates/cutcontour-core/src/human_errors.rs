// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for sign shop operators.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives the CLI exit message.

use crate::error::CutlineError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Slow machine, busy tool — running again may work.
    Transient,
    /// The operator must change something (file, flag, layer name).
    ActionRequired,
    /// The input cannot be converted as-is.
    Permanent,
    /// A missing external program must be installed.
    InstallRequired,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the operator should try.
    pub suggestion: String,
    /// Whether simply running again could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `CutlineError` into a `HumanError`.
pub fn humanize_error(err: &CutlineError) -> HumanError {
    match err {
        CutlineError::InvalidDocument(_) => HumanError {
            message: "This file is not a PostScript/EPS document.".into(),
            suggestion: "Export the artwork as EPS (or pass the SVG directly) and try again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        CutlineError::Drawing(detail) => HumanError {
            message: "The SVG drawing could not be read.".into(),
            suggestion: format!("Open and re-save it in Inkscape, then try again. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        CutlineError::Encoding(_) => HumanError {
            message: "The document contains characters that cannot be written back.".into(),
            suggestion: "Re-export the EPS with text converted to paths.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        CutlineError::MarkerNotFound { step, marker } => HumanError {
            message: "The exported layers could not be combined.".into(),
            suggestion: format!(
                "The exporter produced an unexpected layout ({step}: missing {marker}). \
                 Try again with --ignore-region to convert without merging."
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        CutlineError::Exporter(detail) => humanize_tool_error(detail),

        CutlineError::CollaboratorTimeout { tool, seconds } => HumanError {
            message: format!("{tool} took longer than {seconds} seconds."),
            suggestion: "Try again, or raise tool_timeout_secs in the config file for large drawings."
                .into(),
            retriable: true,
            severity: Severity::Transient,
        },

        CutlineError::Validator(detail) => HumanError {
            message: "The validator could not check the output.".into(),
            suggestion: format!("The file was still written. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        CutlineError::Declined => HumanError {
            message: "Nothing was written.".into(),
            suggestion: "Re-run with --yes to convert a file that already uses CutContour.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        CutlineError::Config(detail) => HumanError {
            message: "The configuration is invalid.".into(),
            suggestion: format!("Fix the config file or command-line flags. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        CutlineError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "Check the path and try again.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Permission denied while reading or writing a file.".into(),
                suggestion: "Check the file permissions, or choose a different output directory."
                    .into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                retriable: true,
                severity: Severity::Transient,
            },
        },

        CutlineError::Serialization(_) => HumanError {
            message: "The config file is not valid JSON.".into(),
            suggestion: "Fix or delete the config file; defaults are used when it is absent.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

/// Map exporter failure details to messages.
fn humanize_tool_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("not found") || lower.contains("no such file") {
        HumanError {
            message: "Inkscape is not installed or not on PATH.".into(),
            suggestion: "Install Inkscape 1.x, or set inkscape_binary in the config file.".into(),
            retriable: false,
            severity: Severity::InstallRequired,
        }
    } else if lower.contains("no output") {
        HumanError {
            message: "Inkscape finished but produced no EPS file.".into(),
            suggestion: "Open the drawing in Inkscape and check that it exports to EPS by hand."
                .into(),
            retriable: false,
            severity: Severity::Permanent,
        }
    } else {
        HumanError {
            message: "Inkscape could not export the drawing.".into(),
            suggestion: format!("Try again. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}
