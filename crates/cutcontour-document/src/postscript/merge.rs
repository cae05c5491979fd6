// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print/cut merge — stitches two renderings of the same page into one EPS.
//
// Both inputs must come from the same exporter with the same page geometry.
// The cut document supplies the header, prolog (with the spot color
// procedures), page setup and trailer; the print body is painted first so the
// cut strokes stay on top.
//
// Page bodies are extracted with one rule for both documents: the lines after
// `%%EndPageSetup` and before the first `showpage`, minus the leading
// clip/transform line and the trailing restores that close its saves.

use cutcontour_core::error::{CutlineError, Result};
use tracing::{debug, info, instrument, warn};

use super::document::{PsDocument, line_ending};
use super::markers::{
    BOUNDING_BOX, END_PAGE_SETUP, PAGE_PAINT, TRAILER, find_bounding_box, find_page_paint,
    find_page_setup_end, find_trailer,
};

/// Save operator emitted by cairo (`/q { gsave } bind def`).
const SAVE_TOKEN: &str = "q";
/// Restore operator emitted by cairo (`/Q { grestore } bind def`).
const RESTORE_TOKEN: &str = "Q";
/// Operator that marks the page clip/transform line.
const PAGE_CLIP_TOKEN: &str = "rectclip";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Print,
    Cut,
}

impl Layer {
    fn header_step(self) -> &'static str {
        match self {
            Self::Print => "print document header",
            Self::Cut => "cut document header",
        }
    }

    fn setup_step(self) -> &'static str {
        match self {
            Self::Print => "print document page setup",
            Self::Cut => "cut document page setup",
        }
    }

    fn body_step(self) -> &'static str {
        match self {
            Self::Print => "print document page body",
            Self::Cut => "cut document page body",
        }
    }
}

/// One document's page split at the structural markers.
#[derive(Debug)]
struct PageParts<'a> {
    bounding_box: &'a str,
    /// Index of `%%EndPageSetup`.
    setup_end: usize,
    /// Index of `showpage`.
    paint: usize,
    /// Leading clip/transform line, if present.
    setup_line: Option<&'a str>,
    /// Drawing commands between setup and restore.
    fragment: Vec<String>,
    /// Restore tokens that close the saves opened by `setup_line`.
    restore: Vec<&'static str>,
}

fn split_page(lines: &[String], layer: Layer) -> Result<PageParts<'_>> {
    let bbox = find_bounding_box(lines).ok_or(CutlineError::MarkerNotFound {
        step: layer.header_step(),
        marker: BOUNDING_BOX,
    })?;
    let setup_end = find_page_setup_end(lines).ok_or(CutlineError::MarkerNotFound {
        step: layer.setup_step(),
        marker: END_PAGE_SETUP,
    })?;
    let paint = find_page_paint(lines, setup_end + 1).ok_or(CutlineError::MarkerNotFound {
        step: layer.body_step(),
        marker: PAGE_PAINT,
    })?;

    let body = &lines[setup_end + 1..paint];

    // Leading clip/transform line.
    let (setup_line, body) = match body.iter().position(|l| !l.trim().is_empty()) {
        Some(first) if is_page_clip(&body[first]) => (Some(body[first].as_str()), &body[first + 1..]),
        _ => (None, body),
    };

    // Only the restores matching the setup line's saves are stripped; the
    // artwork's own q/Q pairs stay in the fragment.
    let depth = setup_line.map_or(0, save_depth);
    let mut fragment = body.to_vec();
    let mut restore = Vec::new();
    while restore.len() < depth {
        let Some(last) = fragment.last_mut() else {
            break;
        };
        if last.trim().is_empty() {
            fragment.pop();
            continue;
        }
        if !is_restore_only(last) {
            break;
        }
        let tokens = last.split_whitespace().count();
        let take = tokens.min(depth - restore.len());
        if take == tokens {
            fragment.pop();
        } else {
            let eol = line_ending(last);
            *last = format!("{}{eol}", vec![RESTORE_TOKEN; tokens - take].join(" "));
        }
        restore.extend(std::iter::repeat_n(RESTORE_TOKEN, take));
    }
    if restore.len() < depth {
        warn!(
            step = layer.body_step(),
            depth,
            closed = restore.len(),
            "page setup saves are not all restored at the end of the body"
        );
    }

    Ok(PageParts {
        bounding_box: lines[bbox].trim(),
        setup_end,
        paint,
        setup_line,
        fragment,
        restore,
    })
}

fn is_page_clip(line: &str) -> bool {
    line.split_whitespace().any(|t| t == PAGE_CLIP_TOKEN)
}

fn save_depth(line: &str) -> usize {
    line.split_whitespace().filter(|t| *t == SAVE_TOKEN).count()
}

fn is_restore_only(line: &str) -> bool {
    let mut tokens = line.split_whitespace().peekable();
    tokens.peek().is_some() && tokens.all(|t| t == RESTORE_TOKEN)
}

/// Merge a rewritten cut document and an untouched print document.
///
/// Fails with [`CutlineError::MarkerNotFound`] naming the extraction step when
/// either document lacks a bounding box, page setup or `showpage`, or when the
/// cut document has no trailer. No partial output is produced.
#[instrument(skip_all, fields(print_lines = print.line_count(), cut_lines = cut.line_count()))]
pub fn merge_layers(print: &PsDocument, cut: &PsDocument) -> Result<PsDocument> {
    let print_parts = split_page(print.lines(), Layer::Print)?;
    let cut_parts = split_page(cut.lines(), Layer::Cut)?;
    let cut_lines = cut.lines();
    find_trailer(cut_lines, cut_parts.paint + 1).ok_or(CutlineError::MarkerNotFound {
        step: "cut document trailer",
        marker: TRAILER,
    })?;

    if print_parts.bounding_box != cut_parts.bounding_box {
        warn!(
            print = print_parts.bounding_box,
            cut = cut_parts.bounding_box,
            "print and cut bounding boxes differ; layers may not align"
        );
    }

    debug!(
        print_fragment = print_parts.fragment.len(),
        cut_fragment = cut_parts.fragment.len(),
        "page bodies extracted"
    );

    let mut merged: Vec<String> = Vec::with_capacity(
        cut_lines.len() + print_parts.fragment.len() + 4,
    );
    merged.extend_from_slice(&cut_lines[..=cut_parts.setup_end]);
    if let Some(setup) = cut_parts.setup_line {
        merged.push(setup.to_owned());
    }
    merged.extend(print_parts.fragment);
    merged.extend(cut_parts.fragment);
    let paint_line = &cut_lines[cut_parts.paint];
    if !cut_parts.restore.is_empty() {
        merged.push(format!("{}{}", cut_parts.restore.join(" "), line_ending(paint_line)));
    }
    merged.push(paint_line.clone());
    merged.extend_from_slice(&cut_lines[cut_parts.paint + 1..]);

    info!(lines = merged.len(), "print and cut layers merged");
    Ok(PsDocument::from_lines(merged))
}
