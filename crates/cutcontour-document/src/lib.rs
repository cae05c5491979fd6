// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cutcontour-document — Document processing for the CutContour converter.
//
// Provides the line-level EPS rewrite (DSC header annotation, prolog
// injection, stroke rewriting), the print/cut page merge, and SVG layer
// splitting. Nothing here spawns processes or touches the filesystem beyond
// `PsDocument::open`.

pub mod integrity;
pub mod postscript;
pub mod svg;

// Re-export the primary entry points so callers can use `cutcontour_document::merge_layers` etc.
pub use integrity::fingerprint;
pub use postscript::{CutContourReport, PsDocument, apply_cut_contour, merge_layers};
pub use svg::{LayerSplit, split_layers};
