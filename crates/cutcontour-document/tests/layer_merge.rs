// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end split → export → rewrite → merge, with a stand-in exporter that
// renders each drawn element as one stroked path.

use cutcontour_core::{RegionTag, SpotColorSpec, StrokeStyleSpec};
use cutcontour_document::{
    PsDocument, apply_cut_contour, fingerprint, merge_layers, split_layers,
};

const DRAWING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="100pt" height="100pt" viewBox="0 0 100 100">
  <g inkscape:label="Background" id="background"><path id="sky" d="M0 0H100V50H0Z"/></g>
  <g inkscape:label="Logo" id="logo"><path id="letters" d="M10 10L20 20"/></g>
  <g inkscape:label="CutContour" id="cut"><path id="outline" d="M5 5H95V95H5Z"/></g>
</svg>"#;

/// Render every `<path id="...">` as a stroked line in a cairo-shaped EPS.
fn fake_export(svg: &str) -> PsDocument {
    let mut body = String::new();
    for (n, chunk) in svg.split("<path id=\"").skip(1).enumerate() {
        let id = &chunk[..chunk.find('"').unwrap()];
        body.push_str(&format!("% {id}\n0 0 0 rg\n1 w\n{n} 0 m {n} 100 l S\n"));
    }
    let text = format!(
        "%!PS-Adobe-3.0 EPSF-3.0\n\
         %%Creator: cairo 1.18.0\n\
         %%LanguageLevel: 2\n\
         %%BoundingBox: 0 0 100 100\n\
         %%EndComments\n\
         %%BeginProlog\n\
         50 dict begin\n\
         /S {{ stroke }} bind def\n\
         %%EndProlog\n\
         %%BeginSetup\n\
         %%EndSetup\n\
         %%Page: 1 1\n\
         %%BeginPageSetup\n\
         %%PageBoundingBox: 0 0 100 100\n\
         %%EndPageSetup\n\
         q 0 0 100 100 rectclip q\n\
         {body}\
         Q Q\n\
         showpage\n\
         %%Trailer\n\
         end\n\
         %%EOF\n"
    );
    PsDocument::parse(&text).unwrap()
}

fn convert(svg: &str) -> PsDocument {
    let layers = split_layers(svg, &RegionTag::default())
        .unwrap()
        .expect("drawing is tagged");

    let print = fake_export(&layers.print_svg);
    let mut cut = fake_export(&layers.cut_svg);
    apply_cut_contour(
        &mut cut,
        &SpotColorSpec::cut_contour(),
        &StrokeStyleSpec::default(),
    );
    merge_layers(&print, &cut).unwrap()
}

#[test]
fn three_regions_merge_with_cut_on_top() {
    let layers = split_layers(DRAWING, &RegionTag::default()).unwrap().unwrap();
    assert_eq!(fake_export(&layers.cut_svg).to_text().matches(" l S").count(), 1);
    assert_eq!(fake_export(&layers.print_svg).to_text().matches(" l S").count(), 2);

    let merged = convert(DRAWING).to_text();
    let sky = merged.find("% sky").unwrap();
    let letters = merged.find("% letters").unwrap();
    let outline = merged.find("% outline").unwrap();
    assert!(sky < outline && letters < outline);

    // Only the cut layer is rewritten.
    assert_eq!(merged.matches("SetCutContourStroke SetHairlineStroke S").count(), 1);
    assert_eq!(merged.matches("0 0 0 rg").count(), 2);
    assert!(merged.contains("%%DocumentCustomColors: (CutContour)"));
    assert!(merged.contains("/SetCutContourStroke {"));
    assert_eq!(merged.matches("showpage").count(), 1);
}

#[test]
fn merge_output_is_deterministic() {
    let a = convert(DRAWING).to_latin1().unwrap();
    let b = convert(DRAWING).to_latin1().unwrap();
    assert_eq!(fingerprint(&a), fingerprint(&b));
}

#[test]
fn merged_document_is_still_valid_postscript() {
    let merged = convert(DRAWING);
    let reparsed = PsDocument::parse(&merged.to_text()).unwrap();
    assert_eq!(reparsed, merged);
}
