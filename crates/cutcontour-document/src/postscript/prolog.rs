// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Prolog injection — defines the spot color and stroke procedures the page
// body calls after rewriting.
//
// `findcmykcustomcolor` and `setcustomcolor` are Level 2 operators. The block
// probes for each with `where` and only defines a CMYK fallback when the
// interpreter lacks it, so native spot color handling is never overridden.

use cutcontour_core::types::{COLOR_ACTIVATE_PROC, COLOR_PROC, WIDTH_ACTIVATE_PROC};
use cutcontour_core::{SpotColorSpec, StrokeStyleSpec};
use tracing::{debug, warn};

use super::document::{PsDocument, line_ending};
use super::markers::{find_prolog_end, find_setup_begin};

/// Where the procedure block went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrologOutcome {
    /// Inserted before `%%EndProlog` at this line index.
    BeforePrologEnd(usize),
    /// No `%%EndProlog`; inserted before `%%BeginSetup` at this line index.
    BeforeSetup(usize),
    /// Neither marker exists; document unchanged.
    Skipped,
}

/// The injected PostScript, one entry per line, framed by blank lines.
pub fn procedure_block(color: &SpotColorSpec, stroke: &StrokeStyleSpec) -> Vec<String> {
    let block = format!(
        r#"
% {name} spot color support
/findcmykcustomcolor where {{
  pop
}} {{
  % Level 1 fallback: keep C M Y K name together
  /findcmykcustomcolor {{
    5 array astore
  }} def
}} ifelse
/setcustomcolor where {{
  pop
}} {{
  % Level 1 fallback: scale the CMYK components by the tint
  /setcustomcolor {{
    exch aload pop pop
    4 {{
      4 index mul 4 1 roll
    }} repeat
    5 -1 roll pop
    setcmykcolor
  }} def
}} ifelse
/{color_proc} {{
  {channels} ({name}) findcmykcustomcolor
}} def
/{activate_color} {{
  {color_proc} 1.0 setcustomcolor
}} def
/{activate_width} {{
  {width} setlinewidth
}} def
"#,
        name = color.name,
        channels = color.literal_channels(),
        width = stroke.literal_width(),
        color_proc = COLOR_PROC,
        activate_color = COLOR_ACTIVATE_PROC,
        activate_width = WIDTH_ACTIVATE_PROC,
    );
    block.split('\n').map(str::to_owned).collect()
}

/// Insert the procedure block before the end of the prolog.
///
/// Falls back to the start of the setup section, and leaves the document
/// untouched (with a warning) when neither marker exists. Running it twice
/// injects a second, redundant block.
pub fn inject_prolog(
    doc: &mut PsDocument,
    color: &SpotColorSpec,
    stroke: &StrokeStyleSpec,
) -> PrologOutcome {
    let (outcome, at) = if let Some(idx) = find_prolog_end(doc.lines()) {
        (PrologOutcome::BeforePrologEnd(idx), idx)
    } else if let Some(idx) = find_setup_begin(doc.lines()) {
        warn!("%%EndProlog not found, inserting before %%BeginSetup");
        (PrologOutcome::BeforeSetup(idx), idx)
    } else {
        warn!("neither %%EndProlog nor %%BeginSetup found; spot color procedures not injected");
        return PrologOutcome::Skipped;
    };

    let eol = line_ending(&doc.lines()[at]);
    let block = procedure_block(color, stroke)
        .into_iter()
        .map(|line| format!("{line}{eol}"));
    doc.insert_lines(at, block);
    debug!(?outcome, "spot color procedures injected");
    outcome
}
