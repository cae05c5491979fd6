// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line classifier — labels every document line with its page region and
// instruction category.
//
// Recognition is line-granular and exact: a line is only labelled as an
// instruction when, trimmed, it has one of the fixed shapes below. Anything
// else inside a page is `Other` and passes through the rewriter untouched.

use once_cell::sync::Lazy;
use regex::Regex;

use super::markers::{is_page_end, is_page_start};

static RGB_SET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[\d.]+\s+[\d.]+\s+[\d.]+\s+(?:rg|setrgbcolor)\s*$").expect("valid regex")
});

static CMYK_SET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[\d.]+\s+[\d.]+\s+[\d.]+\s+[\d.]+\s+(?:k|setcmykcolor)\s*$")
        .expect("valid regex")
});

static GRAY_SET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[\d.]+\s+(?:g|setgray)\s*$").expect("valid regex"));

static WIDTH_SET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[\d.]+\s+(?:w|setlinewidth)\s*$").expect("valid regex"));

/// Operators that paint the current path outline.
pub const STROKE_TOKENS: [&str; 2] = ["S", "stroke"];

/// Category of a single document line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineLabel {
    /// Header, prolog, setup, or trailer text.
    OutsidePage,
    /// `%%Page:` / `%%BeginPageSetup`.
    PageStart,
    /// `%%Trailer` / `%%EOF`.
    PageEnd,
    /// `N N N rg` / `setrgbcolor`.
    ColorSet,
    /// `N N N N k` / `setcmykcolor`.
    CmykSet,
    /// `N g` / `setgray`.
    GraySet,
    /// `N w` / `setlinewidth`.
    WidthSet,
    /// Stroke token with other instructions on the same line.
    StrokeInline,
    /// Line that is exactly a stroke token.
    StrokeStandalone,
    /// Any other page line.
    Other,
}

impl LineLabel {
    /// Whether the line belongs to a page region.
    pub fn in_page(self) -> bool {
        !matches!(self, Self::OutsidePage | Self::PageEnd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Region {
    #[default]
    Outside,
    Page,
}

/// Finite-state classifier; feed lines in document order.
#[derive(Debug, Default)]
pub struct LineClassifier {
    region: Region,
}

impl LineClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label `line` and advance the page-region state.
    pub fn classify(&mut self, line: &str) -> LineLabel {
        if is_page_start(line) {
            self.region = Region::Page;
            return LineLabel::PageStart;
        }
        if is_page_end(line) {
            self.region = Region::Outside;
            return LineLabel::PageEnd;
        }
        match self.region {
            Region::Outside => LineLabel::OutsidePage,
            Region::Page => classify_instruction(line),
        }
    }
}

/// Label every line of a document.
pub fn classify_lines(lines: &[String]) -> Vec<LineLabel> {
    let mut classifier = LineClassifier::new();
    lines.iter().map(|line| classifier.classify(line)).collect()
}

/// Instruction category of a line known to be inside a page.
pub fn classify_instruction(line: &str) -> LineLabel {
    if RGB_SET.is_match(line) {
        LineLabel::ColorSet
    } else if CMYK_SET.is_match(line) {
        LineLabel::CmykSet
    } else if GRAY_SET.is_match(line) {
        LineLabel::GraySet
    } else if WIDTH_SET.is_match(line) {
        LineLabel::WidthSet
    } else if is_stroke_token(line.trim()) {
        LineLabel::StrokeStandalone
    } else if line.split_whitespace().any(is_stroke_token) {
        LineLabel::StrokeInline
    } else {
        LineLabel::Other
    }
}

pub fn is_stroke_token(token: &str) -> bool {
    STROKE_TOKENS.contains(&token)
}
