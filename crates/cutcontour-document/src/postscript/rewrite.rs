// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stroke rewriting — routes every page stroke through the injected spot color
// and width procedures.

use cutcontour_core::types::{COLOR_ACTIVATE_PROC, WIDTH_ACTIVATE_PROC};
use tracing::debug;

use super::classify::{LineLabel, is_stroke_token};
use super::document::{PsDocument, line_ending};

/// Counters describing one rewrite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// RGB, CMYK, and gray color lines deleted.
    pub colors_removed: usize,
    /// Width lines replaced by the width procedure.
    pub widths_replaced: usize,
    /// Stroke tokens rewritten in place on mixed lines.
    pub inline_strokes: usize,
    /// Stroke-only lines preceded by the activation calls.
    pub standalone_strokes: usize,
}

impl RewriteStats {
    /// Number of color activation calls emitted.
    pub fn activations(&self) -> usize {
        self.inline_strokes + self.standalone_strokes
    }
}

/// Rewrite page-body lines according to their labels.
///
/// `labels` must come from [`classify_lines`](super::classify::classify_lines)
/// over the same document; lines outside page regions are never touched.
pub fn rewrite_strokes(doc: &mut PsDocument, labels: &[LineLabel]) -> RewriteStats {
    debug_assert_eq!(labels.len(), doc.line_count());

    let mut stats = RewriteStats::default();
    let mut out = Vec::with_capacity(doc.line_count() + 16);

    for (line, label) in doc.lines().iter().zip(labels) {
        let eol = line_ending(line);
        match label {
            LineLabel::ColorSet | LineLabel::CmykSet | LineLabel::GraySet => {
                stats.colors_removed += 1;
            }
            LineLabel::WidthSet => {
                stats.widths_replaced += 1;
                out.push(format!("{WIDTH_ACTIVATE_PROC}{eol}"));
            }
            LineLabel::StrokeInline => {
                let (rewritten, count) = activate_inline(line);
                stats.inline_strokes += count;
                out.push(rewritten);
            }
            LineLabel::StrokeStandalone => {
                stats.standalone_strokes += 1;
                out.push(format!("{COLOR_ACTIVATE_PROC}{eol}"));
                out.push(format!("{WIDTH_ACTIVATE_PROC}{eol}"));
                out.push(line.clone());
            }
            LineLabel::OutsidePage
            | LineLabel::PageStart
            | LineLabel::PageEnd
            | LineLabel::Other => out.push(line.clone()),
        }
    }

    doc.replace_lines(out);
    debug!(?stats, "stroke rewrite complete");
    stats
}

/// Prefix every whitespace-delimited stroke token with the activation calls,
/// keeping all other bytes of the line in place.
fn activate_inline(line: &str) -> (String, usize) {
    let mut out = String::with_capacity(line.len() + 40);
    let mut count = 0;
    let mut rest = line;

    while !rest.is_empty() {
        let token_start = rest.len() - rest.trim_start().len();
        out.push_str(&rest[..token_start]);
        rest = &rest[token_start..];

        let token_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let token = &rest[..token_len];
        if is_stroke_token(token) {
            out.push_str(COLOR_ACTIVATE_PROC);
            out.push(' ');
            out.push_str(WIDTH_ACTIVATE_PROC);
            out.push(' ');
            count += 1;
        }
        out.push_str(token);
        rest = &rest[token_len..];
    }

    (out, count)
}
