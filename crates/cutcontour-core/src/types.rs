// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the CutContour converter.

use serde::{Deserialize, Serialize};

/// Name of the spot color VersaWorks treats as a cut line.
pub const CUT_CONTOUR_NAME: &str = "CutContour";

/// Prolog procedure that registers the spot color handle.
pub const COLOR_PROC: &str = "CutContourColor";

/// Prolog procedure that activates the spot color at full tint for stroking.
pub const COLOR_ACTIVATE_PROC: &str = "SetCutContourStroke";

/// Prolog procedure that fixes the stroke width.
pub const WIDTH_ACTIVATE_PROC: &str = "SetHairlineStroke";

/// Illustrator "hairline": 0.25 pt.
pub const HAIRLINE_WIDTH: f64 = 0.25;

/// A named spot color with its CMYK fallback channels in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotColorSpec {
    pub name: String,
    pub cyan: f64,
    pub magenta: f64,
    pub yellow: f64,
    pub black: f64,
}

impl SpotColorSpec {
    /// The only color this system emits: 100% magenta named `CutContour`.
    pub fn cut_contour() -> Self {
        Self {
            name: CUT_CONTOUR_NAME.to_string(),
            cyan: 0.0,
            magenta: 1.0,
            yellow: 0.0,
            black: 0.0,
        }
    }

    /// Channels in C, M, Y, K order.
    pub fn channels(&self) -> [f64; 4] {
        [self.cyan, self.magenta, self.yellow, self.black]
    }

    /// Channels with two decimals, as written in DSC header comments.
    pub fn header_channels(&self) -> String {
        self.channels()
            .iter()
            .map(|v| format!("{v:.2}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Channels as PostScript numerals with full precision (`0.0 1.0 0.0 0.0`).
    pub fn literal_channels(&self) -> String {
        self.channels()
            .iter()
            .map(|v| ps_number(*v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for SpotColorSpec {
    fn default() -> Self {
        Self::cut_contour()
    }
}

/// Uniform stroke style applied to every rewritten stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyleSpec {
    /// Width in points.
    pub width: f64,
}

impl StrokeStyleSpec {
    pub fn new(width: f64) -> Self {
        Self { width }
    }

    /// Width as a PostScript numeral.
    pub fn literal_width(&self) -> String {
        ps_number(self.width)
    }
}

impl Default for StrokeStyleSpec {
    fn default() -> Self {
        Self::new(HAIRLINE_WIDTH)
    }
}

/// Render a float as a PostScript numeral that always carries a fractional
/// part, using the shortest representation that round-trips.
pub fn ps_number(value: f64) -> String {
    format!("{value:?}")
}

/// Predicate classifying drawing elements as belonging to the cut region.
///
/// An element matches when its identifier or label contains any of the tag
/// words, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTag {
    needles: Vec<String>,
}

impl RegionTag {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let needles = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { needles }
    }

    /// Whether `text` (an id or label) denotes the cut region.
    pub fn matches(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.needles.iter().any(|n| haystack.contains(n.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.needles.is_empty()
    }
}

impl Default for RegionTag {
    fn default() -> Self {
        Self::new([CUT_CONTOUR_NAME])
    }
}

/// Input formats the converter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    /// PostScript / EPS, rewritten directly.
    PostScript,
    /// SVG drawing, routed through the exporter first.
    Drawing,
}

impl InputKind {
    /// Infer the input kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "eps" | "ps" | "epsf" => Some(Self::PostScript),
            "svg" => Some(Self::Drawing),
            _ => None,
        }
    }
}
