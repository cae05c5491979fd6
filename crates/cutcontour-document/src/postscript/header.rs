// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DSC header annotation — declares the spot color to interpreters and RIPs.

use cutcontour_core::SpotColorSpec;
use tracing::{debug, warn};

use super::document::{PsDocument, line_ending};
use super::markers::{CMYK_CUSTOM_COLOR, CUSTOM_COLORS, find_header_anchor};

/// Lines after (and including) the anchor searched for an existing declaration.
const LOOKAHEAD: usize = 5;

/// What the annotator did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderOutcome {
    /// Declarations inserted directly after the anchor line at this index.
    Inserted { after: usize },
    /// A custom color declaration already follows the anchor.
    AlreadyPresent,
    /// No `%%BoundingBox:` / `%%LanguageLevel:` line exists.
    NoAnchor,
}

/// The two DSC comment lines declaring `color`.
pub fn header_lines(color: &SpotColorSpec) -> [String; 2] {
    [
        format!("{CUSTOM_COLORS} ({})", color.name),
        format!(
            "{CMYK_CUSTOM_COLOR} {} ({})",
            color.header_channels(),
            color.name
        ),
    ]
}

/// Insert the custom color declarations after the first bounding-box or
/// language-level line, at most once.
pub fn annotate_header(doc: &mut PsDocument, color: &SpotColorSpec) -> HeaderOutcome {
    let Some(anchor) = find_header_anchor(doc.lines()) else {
        warn!("no %%BoundingBox or %%LanguageLevel line; header left unannotated");
        return HeaderOutcome::NoAnchor;
    };

    let window_end = (anchor + LOOKAHEAD).min(doc.line_count());
    if doc.lines()[anchor..window_end]
        .iter()
        .any(|line| line.contains(CUSTOM_COLORS))
    {
        debug!(anchor, "custom color declaration already present");
        return HeaderOutcome::AlreadyPresent;
    }

    let eol = line_ending(&doc.lines()[anchor]);
    doc.insert_lines(
        anchor + 1,
        header_lines(color).map(|line| format!("{line}{eol}")),
    );
    debug!(anchor, "custom color declared in header");
    HeaderOutcome::Inserted { after: anchor }
}
