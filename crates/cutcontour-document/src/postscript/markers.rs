// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structural marker lookup by literal text search.
//
// Each lookup returns `None` when the marker is absent so callers decide
// whether absence is recoverable (header/prolog) or fatal (merge).

pub const BOUNDING_BOX: &str = "%%BoundingBox:";
pub const LANGUAGE_LEVEL: &str = "%%LanguageLevel:";
pub const CUSTOM_COLORS: &str = "%%DocumentCustomColors:";
pub const CMYK_CUSTOM_COLOR: &str = "%%CMYKCustomColor:";
pub const END_PROLOG: &str = "%%EndProlog";
pub const BEGIN_SETUP: &str = "%%BeginSetup";
pub const END_PAGE_SETUP: &str = "%%EndPageSetup";
pub const TRAILER: &str = "%%Trailer";
pub const PAGE_PAINT: &str = "showpage";

const PAGE: &str = "%%Page:";
const BEGIN_PAGE_SETUP: &str = "%%BeginPageSetup";
const EOF: &str = "%%EOF";

fn starts_with_marker(line: &str, marker: &str) -> bool {
    line.trim_start().starts_with(marker)
}

fn find_from(lines: &[String], from: usize, pred: impl Fn(&str) -> bool) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, line)| pred(line))
        .map(|(idx, _)| idx)
}

/// First `%%BoundingBox:` line.
pub fn find_bounding_box(lines: &[String]) -> Option<usize> {
    find_from(lines, 0, |l| starts_with_marker(l, BOUNDING_BOX))
}

/// First `%%BoundingBox:` or `%%LanguageLevel:` line; header insertions go after it.
pub fn find_header_anchor(lines: &[String]) -> Option<usize> {
    find_from(lines, 0, |l| {
        starts_with_marker(l, BOUNDING_BOX) || starts_with_marker(l, LANGUAGE_LEVEL)
    })
}

pub fn find_prolog_end(lines: &[String]) -> Option<usize> {
    find_from(lines, 0, |l| starts_with_marker(l, END_PROLOG))
}

pub fn find_setup_begin(lines: &[String]) -> Option<usize> {
    find_from(lines, 0, |l| starts_with_marker(l, BEGIN_SETUP))
}

pub fn find_page_setup_end(lines: &[String]) -> Option<usize> {
    find_from(lines, 0, |l| starts_with_marker(l, END_PAGE_SETUP))
}

/// First `showpage` line at or after `from`.
pub fn find_page_paint(lines: &[String], from: usize) -> Option<usize> {
    find_from(lines, from, |l| l.trim() == PAGE_PAINT)
}

/// First `%%Trailer` line at or after `from`.
pub fn find_trailer(lines: &[String], from: usize) -> Option<usize> {
    find_from(lines, from, |l| starts_with_marker(l, TRAILER))
}

/// Line opens a page region (`%%Page:` or `%%BeginPageSetup`).
pub fn is_page_start(line: &str) -> bool {
    line.contains(PAGE) || line.contains(BEGIN_PAGE_SETUP)
}

/// Line closes the page region (`%%Trailer` or `%%EOF`).
pub fn is_page_end(line: &str) -> bool {
    line.contains(TRAILER) || line.contains(EOF)
}
