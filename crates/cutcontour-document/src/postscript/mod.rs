// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PostScript module — line-level EPS rewriting and print/cut merging.

pub mod classify;
pub mod document;
pub mod header;
pub mod markers;
pub mod merge;
pub mod prolog;
pub mod rewrite;

pub use classify::{LineClassifier, LineLabel, classify_lines};
pub use document::PsDocument;
pub use header::{HeaderOutcome, annotate_header};
pub use merge::merge_layers;
pub use prolog::{PrologOutcome, inject_prolog};
pub use rewrite::{RewriteStats, rewrite_strokes};

use cutcontour_core::{SpotColorSpec, StrokeStyleSpec};
use tracing::{info, instrument};

/// Summary of one cut-contour pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutContourReport {
    pub header: HeaderOutcome,
    pub prolog: PrologOutcome,
    pub strokes: RewriteStats,
}

/// Declare the spot color, inject its procedures, and rewrite every page
/// stroke to use them.
#[instrument(skip_all, fields(lines = doc.line_count()))]
pub fn apply_cut_contour(
    doc: &mut PsDocument,
    color: &SpotColorSpec,
    stroke: &StrokeStyleSpec,
) -> CutContourReport {
    info!("[1/3] adding DSC header definitions");
    let header = annotate_header(doc, color);

    info!("[2/3] adding spot color PostScript support");
    let prolog = inject_prolog(doc, color, stroke);

    info!("[3/3] replacing stroke commands with {}", color.name);
    let labels = classify_lines(doc.lines());
    let strokes = rewrite_strokes(doc, &labels);

    info!(
        strokes = strokes.activations(),
        colors_removed = strokes.colors_removed,
        widths_replaced = strokes.widths_replaced,
        "cut contour applied"
    );
    CutContourReport {
        header,
        prolog,
        strokes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAIRO_EPS: &str = "%!PS-Adobe-3.0 EPSF-3.0\n\
        %%Creator: cairo 1.18.0 (https://cairographics.org)\n\
        %%LanguageLevel: 3\n\
        %%DocumentData: Clean7Bit\n\
        %%BoundingBox: 0 0 100 100\n\
        %%EndComments\n\
        %%BeginProlog\n\
        50 dict begin\n\
        /S { stroke } bind def\n\
        /w { setlinewidth } bind def\n\
        %%EndProlog\n\
        %%BeginSetup\n\
        %%EndSetup\n\
        %%Page: 1 1\n\
        %%BeginPageSetup\n\
        %%PageBoundingBox: 0 0 100 100\n\
        %%EndPageSetup\n\
        q 0 0 100 100 rectclip q\n\
        1 0 0 rg\n\
        2 w\n\
        10 10 m 90 90 l S\n\
        Q Q\n\
        showpage\n\
        %%Trailer\n\
        end\n\
        %%EOF\n";

    #[test]
    fn full_pass_over_cairo_output() {
        let mut doc = PsDocument::parse(CAIRO_EPS).unwrap();
        let report = apply_cut_contour(
            &mut doc,
            &SpotColorSpec::cut_contour(),
            &StrokeStyleSpec::default(),
        );

        assert_eq!(report.header, HeaderOutcome::Inserted { after: 2 });
        assert!(matches!(report.prolog, PrologOutcome::BeforePrologEnd(_)));
        assert_eq!(report.strokes.activations(), 1);

        let text = doc.to_text();
        assert!(text.contains("%%LanguageLevel: 3\n%%DocumentCustomColors: (CutContour)\n"));
        // Prolog definitions of S and w are outside the page and survive.
        assert!(text.contains("/S { stroke } bind def"));
        assert!(text.contains("/w { setlinewidth } bind def"));
        assert!(!text.contains("1 0 0 rg"));
        assert!(text.contains("\nSetHairlineStroke\n10 10 m 90 90 l SetCutContourStroke SetHairlineStroke S\n"));
    }

    #[test]
    fn page_body_unchanged_without_instructions() {
        let plain = CAIRO_EPS
            .replace("1 0 0 rg\n", "")
            .replace("2 w\n", "")
            .replace("10 10 m 90 90 l S\n", "10 10 m 90 90 l f\n");
        let mut doc = PsDocument::parse(&plain).unwrap();
        apply_cut_contour(
            &mut doc,
            &SpotColorSpec::cut_contour(),
            &StrokeStyleSpec::default(),
        );
        let text = doc.to_text();
        let body_start = plain.find("%%Page: 1 1").unwrap();
        assert!(text.ends_with(&plain[body_start..]));
    }
}
