// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion pipeline — routes an input through single-layer rewriting or the
// split / export / rewrite / merge path and writes the result.
//
// Exports live in a per-invocation TempDir that is removed when `convert`
// returns, whatever the outcome. Layer drawings are staged as hidden temp files
// next to the input so relative hrefs such as linked images still resolve.
// The output file only appears once the whole conversion has succeeded.

use std::io::Write;
use std::path::{Path, PathBuf};

use cutcontour_bridge::traits::{Confirm, Exporter, Validation, Validator};
use cutcontour_core::error::{CutlineError, Result};
use cutcontour_core::{CUT_CONTOUR_NAME, ConvertConfig, InputKind, SpotColorSpec};
use cutcontour_document::{PsDocument, apply_cut_contour, fingerprint, merge_layers, split_layers};
use tracing::{debug, info, instrument, warn};

use super::output;

/// One file to convert.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: PathBuf,
    /// Defaults to `<stem>_versaworks<ext>` next to the input.
    pub output: Option<PathBuf>,
}

/// External tools the pipeline drives.
pub struct Collaborators<'a> {
    pub exporter: &'a dyn Exporter,
    pub validator: &'a dyn Validator,
    pub confirm: &'a dyn Confirm,
}

/// How the output was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertMode {
    /// Every stroke of one document was rewritten.
    SingleLayer,
    /// Print and cut layers were exported separately and merged.
    Merged { cut_elements: usize },
}

/// What a successful conversion produced.
#[derive(Debug, Clone)]
pub struct ConvertSummary {
    pub output: PathBuf,
    pub mode: ConvertMode,
    /// Strokes routed through the cut-contour procedures.
    pub strokes: usize,
    /// SHA-256 of the written bytes.
    pub fingerprint: String,
    pub validation: Validation,
}

/// Convert `request.input` and write the result.
#[instrument(skip_all, fields(input = %request.input.display()))]
pub fn convert(
    request: &ConvertRequest,
    config: &ConvertConfig,
    tools: &Collaborators<'_>,
) -> Result<ConvertSummary> {
    config.validate()?;
    let kind = input_kind(&request.input)?;
    let destination = request
        .output
        .clone()
        .unwrap_or_else(|| output::default_output_path(&request.input, kind));
    info!(output = %destination.display(), "converting");

    let scratch = tempfile::Builder::new().prefix("cutcontour-").tempdir()?;
    debug!(scratch = %scratch.path().display(), "scratch directory created");

    let (document, mode, strokes) = match kind {
        InputKind::PostScript => {
            let doc = PsDocument::open(&request.input)?;
            let (doc, strokes) = single_layer(doc, config, tools.confirm)?;
            (doc, ConvertMode::SingleLayer, strokes)
        }
        InputKind::Drawing => convert_drawing(&request.input, scratch.path(), config, tools)?,
    };

    let bytes = document.to_latin1()?;
    let digest = fingerprint(&bytes);
    let staged = output::stage(&destination, &bytes)?;
    let validation = run_validator(tools.validator, staged.path());
    output::commit(staged, &destination)?;

    info!(
        output = %destination.display(),
        bytes = bytes.len(),
        sha256 = %digest,
        "conversion complete"
    );
    Ok(ConvertSummary {
        output: destination,
        mode,
        strokes,
        fingerprint: digest,
        validation,
    })
}

fn input_kind(input: &Path) -> Result<InputKind> {
    input
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(InputKind::from_extension)
        .ok_or_else(|| {
            CutlineError::InvalidDocument(format!(
                "{}: expected an .eps, .ps or .svg file",
                input.display()
            ))
        })
}

// -- Single layer -------------------------------------------------------------

fn single_layer(
    mut doc: PsDocument,
    config: &ConvertConfig,
    confirm: &dyn Confirm,
) -> Result<(PsDocument, usize)> {
    ensure_not_converted(&[&doc], confirm)?;
    let report = apply_cut_contour(&mut doc, &SpotColorSpec::cut_contour(), &config.stroke());
    Ok((doc, report.strokes.activations()))
}

/// Ask before converting documents that already mention the spot color.
fn ensure_not_converted(docs: &[&PsDocument], confirm: &dyn Confirm) -> Result<()> {
    if !docs.iter().any(|doc| doc.contains_marker(CUT_CONTOUR_NAME)) {
        return Ok(());
    }
    warn!("input already contains '{CUT_CONTOUR_NAME}'");
    if confirm.confirm(&format!("File already contains '{CUT_CONTOUR_NAME}'. Continue?"))? {
        Ok(())
    } else {
        info!("conversion declined, nothing written");
        Err(CutlineError::Declined)
    }
}

// -- Drawings -----------------------------------------------------------------

fn convert_drawing(
    input: &Path,
    scratch: &Path,
    config: &ConvertConfig,
    tools: &Collaborators<'_>,
) -> Result<(PsDocument, ConvertMode, usize)> {
    let svg = String::from_utf8(std::fs::read(input)?)
        .map_err(|err| CutlineError::Drawing(format!("drawing is not UTF-8: {err}")))?;

    let layers = if config.ignore_region {
        debug!("region tags ignored, converting as one layer");
        None
    } else {
        split_layers(&svg, &config.region_tag())?
    };

    let Some(layers) = layers else {
        let exported = scratch.join("drawing.eps");
        tools.exporter.export(input, &exported, None)?;
        let (doc, strokes) = single_layer(PsDocument::open(&exported)?, config, tools.confirm)?;
        return Ok((doc, ConvertMode::SingleLayer, strokes));
    };

    let input_dir = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let print = export_layer(tools.exporter, input_dir, scratch, "print", &layers.print_svg)?;
    let mut cut = export_layer(tools.exporter, input_dir, scratch, "cut", &layers.cut_svg)?;
    ensure_not_converted(&[&print, &cut], tools.confirm)?;

    // Only the cut layer is rewritten; print strokes keep their colors.
    let report = apply_cut_contour(&mut cut, &SpotColorSpec::cut_contour(), &config.stroke());
    let merged = merge_layers(&print, &cut)?;
    Ok((
        merged,
        ConvertMode::Merged {
            cut_elements: layers.cut_elements,
        },
        report.strokes.activations(),
    ))
}

/// Stage one layer's drawing beside the input and export it into `scratch`.
///
/// The staged drawing is deleted when this returns.
fn export_layer(
    exporter: &dyn Exporter,
    input_dir: &Path,
    scratch: &Path,
    name: &str,
    svg: &str,
) -> Result<PsDocument> {
    let mut drawing = tempfile::Builder::new()
        .prefix(&format!(".cutcontour-{name}-"))
        .suffix(".svg")
        .tempfile_in(input_dir)?;
    drawing.write_all(svg.as_bytes())?;
    drawing.flush()?;
    let exported = scratch.join(format!("{name}.eps"));
    exporter.export(drawing.path(), &exported, None)?;
    debug!(layer = name, drawing = %drawing.path().display(), "layer exported");
    PsDocument::open(&exported)
}

/// Validation never fails the conversion.
fn run_validator(validator: &dyn Validator, document: &Path) -> Validation {
    match validator.validate(document) {
        Ok(verdict) if !verdict.is_acceptable() => {
            warn!(?verdict, "validator rejected the output; it is written anyway");
            verdict
        }
        Ok(verdict) => verdict,
        Err(err) => {
            warn!(error = %err, "validator could not run");
            Validation::Skipped(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use cutcontour_bridge::stub::{AssumeYes, NoValidator};

    /// Renders every `<path id="...">` of the drawing as one stroked line.
    #[derive(Default)]
    struct FakeExporter {
        seen: RefCell<Vec<PathBuf>>,
    }

    impl Exporter for FakeExporter {
        fn export(&self, drawing: &Path, output: &Path, _selector: Option<&str>) -> Result<()> {
            let svg = std::fs::read_to_string(drawing)?;
            let mut body = String::new();
            for (n, chunk) in svg.split("<path id=\"").skip(1).enumerate() {
                let id = &chunk[..chunk.find('"').unwrap()];
                body.push_str(&format!("% {id}\n0 0 0 rg\n1 w\n{n} 0 m {n} 100 l S\n"));
            }
            let eps = format!(
                "%!PS-Adobe-3.0 EPSF-3.0\n%%BoundingBox: 0 0 100 100\n%%EndComments\n\
                 %%BeginProlog\n%%EndProlog\n%%BeginSetup\n%%EndSetup\n%%Page: 1 1\n\
                 %%BeginPageSetup\n%%EndPageSetup\nq 0 0 100 100 rectclip q\n{body}Q Q\n\
                 showpage\n%%Trailer\n%%EOF\n"
            );
            std::fs::write(output, eps)?;
            self.seen.borrow_mut().push(drawing.to_path_buf());
            self.seen.borrow_mut().push(output.to_path_buf());
            Ok(())
        }
    }

    struct FailingExporter;

    impl Exporter for FailingExporter {
        fn export(&self, _: &Path, _: &Path, _: Option<&str>) -> Result<()> {
            Err(CutlineError::Exporter("inkscape exited with 1".into()))
        }
    }

    /// Fails when a relative href of the drawing does not resolve from the
    /// drawing's own directory, as a real exporter would.
    #[derive(Default)]
    struct LinkResolvingExporter {
        inner: FakeExporter,
    }

    impl Exporter for LinkResolvingExporter {
        fn export(&self, drawing: &Path, output: &Path, selector: Option<&str>) -> Result<()> {
            let svg = std::fs::read_to_string(drawing)?;
            let base = drawing.parent().unwrap();
            for chunk in svg.split("href=\"").skip(1) {
                let href = &chunk[..chunk.find('"').unwrap()];
                if !base.join(href).exists() {
                    return Err(CutlineError::Exporter(format!("cannot open {href}")));
                }
            }
            self.inner.export(drawing, output, selector)
        }
    }

    /// Exports the first layer, then fails.
    #[derive(Default)]
    struct SecondExportFails {
        inner: FakeExporter,
        calls: Cell<usize>,
    }

    impl Exporter for SecondExportFails {
        fn export(&self, drawing: &Path, output: &Path, selector: Option<&str>) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            if self.calls.get() > 1 {
                return Err(CutlineError::Exporter("inkscape exited with 1".into()));
            }
            self.inner.export(drawing, output, selector)
        }
    }

    struct TimedOutValidator;

    impl Validator for TimedOutValidator {
        fn validate(&self, _: &Path) -> Result<Validation> {
            Err(CutlineError::CollaboratorTimeout {
                tool: "gs".into(),
                seconds: 30,
            })
        }
    }

    struct RejectingValidator;

    impl Validator for RejectingValidator {
        fn validate(&self, _: &Path) -> Result<Validation> {
            Ok(Validation::Invalid("syntaxerror".into()))
        }
    }

    struct Decline;

    impl Confirm for Decline {
        fn confirm(&self, _: &str) -> Result<bool> {
            Ok(false)
        }
    }

    const EPS: &str = "%!PS-Adobe-3.0 EPSF-3.0\n%%BoundingBox: 0 0 10 10\n%%EndComments\n\
        %%BeginProlog\n%%EndProlog\n%%Page: 1 1\n1 0 0 setrgbcolor\n0.5 w\n\
        10 20 m 30 40 l S\nshowpage\n%%Trailer\n%%EOF\n";

    const DRAWING: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" viewBox="0 0 100 100">
<g inkscape:label="Background"><path id="sky" d="M0 0H100"/></g>
<g inkscape:label="Logo"><path id="letters" d="M10 10L20 20"/></g>
<g inkscape:label="CutContour"><path id="outline" d="M5 5H95"/></g>
</svg>"#;

    fn run(
        input: &Path,
        config: &ConvertConfig,
        exporter: &dyn Exporter,
        validator: &dyn Validator,
        confirm: &dyn Confirm,
    ) -> Result<ConvertSummary> {
        let request = ConvertRequest {
            input: input.to_path_buf(),
            output: None,
        };
        let tools = Collaborators {
            exporter,
            validator,
            confirm,
        };
        convert(&request, config, &tools)
    }

    #[test]
    fn converts_eps_in_place_with_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sticker.eps");
        std::fs::write(&input, EPS).unwrap();

        let summary = run(
            &input,
            &ConvertConfig::default(),
            &FakeExporter::default(),
            &NoValidator,
            &AssumeYes,
        )
        .unwrap();

        assert_eq!(summary.output, dir.path().join("sticker_versaworks.eps"));
        assert_eq!(summary.mode, ConvertMode::SingleLayer);
        assert_eq!(summary.strokes, 1);

        let written = std::fs::read(&summary.output).unwrap();
        assert_eq!(summary.fingerprint, fingerprint(&written));
        let text = String::from_utf8(written).unwrap();
        assert!(text.contains("10 20 m 30 40 l SetCutContourStroke SetHairlineStroke S"));
        assert!(!text.contains("1 0 0 setrgbcolor"));
    }

    #[test]
    fn declining_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("done.eps");
        std::fs::write(&input, EPS.replace("%%EndComments", "% CutContour\n%%EndComments"))
            .unwrap();

        let err = run(
            &input,
            &ConvertConfig::default(),
            &FakeExporter::default(),
            &NoValidator,
            &Decline,
        )
        .unwrap_err();

        assert!(matches!(err, CutlineError::Declined));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn rejects_non_postscript_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.eps");
        std::fs::write(&input, "hello").unwrap();

        let err = run(
            &input,
            &ConvertConfig::default(),
            &FakeExporter::default(),
            &NoValidator,
            &AssumeYes,
        )
        .unwrap_err();
        assert!(matches!(err, CutlineError::InvalidDocument(_)));
        assert!(!dir.path().join("notes_versaworks.eps").exists());
    }

    #[test]
    fn unknown_extension_is_invalid() {
        assert!(matches!(
            input_kind(Path::new("photo.png")),
            Err(CutlineError::InvalidDocument(_))
        ));
        assert_eq!(input_kind(Path::new("a.SVG")).unwrap(), InputKind::Drawing);
    }

    #[test]
    fn tagged_drawing_is_merged_and_scratch_removed() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("logo.svg");
        std::fs::write(&input, DRAWING).unwrap();
        let exporter = FakeExporter::default();

        let summary = run(
            &input,
            &ConvertConfig::default(),
            &exporter,
            &NoValidator,
            &AssumeYes,
        )
        .unwrap();

        assert_eq!(summary.mode, ConvertMode::Merged { cut_elements: 1 });
        assert_eq!(summary.strokes, 1);
        assert_eq!(summary.output, dir.path().join("logo_versaworks.eps"));

        let text = std::fs::read_to_string(&summary.output).unwrap();
        let outline = text.find("% outline").unwrap();
        assert!(text.find("% sky").unwrap() < outline);
        assert!(text.find("% letters").unwrap() < outline);
        assert_eq!(text.matches("0 0 0 rg").count(), 2);
        assert_eq!(text.matches("showpage").count(), 1);

        // Two layers, each a drawing and an export.
        let seen = exporter.seen.borrow();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|path| !path.exists()));
    }

    #[test]
    fn ignore_region_exports_once() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("logo.svg");
        std::fs::write(&input, DRAWING).unwrap();
        let exporter = FakeExporter::default();
        let config = ConvertConfig {
            ignore_region: true,
            ..ConvertConfig::default()
        };

        let summary = run(&input, &config, &exporter, &NoValidator, &AssumeYes).unwrap();
        assert_eq!(summary.mode, ConvertMode::SingleLayer);
        assert_eq!(summary.strokes, 3);
        assert_eq!(exporter.seen.borrow().len(), 2);
    }

    #[test]
    fn exporter_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("logo.svg");
        std::fs::write(&input, DRAWING).unwrap();

        let err = run(
            &input,
            &ConvertConfig::default(),
            &FailingExporter,
            &NoValidator,
            &AssumeYes,
        )
        .unwrap_err();
        assert!(matches!(err, CutlineError::Exporter(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn invalid_output_is_still_written() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sticker.eps");
        std::fs::write(&input, EPS).unwrap();

        let summary = run(
            &input,
            &ConvertConfig::default(),
            &FakeExporter::default(),
            &RejectingValidator,
            &AssumeYes,
        )
        .unwrap();
        assert_eq!(summary.validation, Validation::Invalid("syntaxerror".into()));
        assert!(summary.output.exists());
    }

    #[test]
    fn bad_config_is_rejected_before_reading() {
        let config = ConvertConfig {
            stroke_width: -1.0,
            ..ConvertConfig::default()
        };
        let err = run(
            Path::new("/nonexistent/in.eps"),
            &config,
            &FakeExporter::default(),
            &NoValidator,
            &AssumeYes,
        )
        .unwrap_err();
        assert!(matches!(err, CutlineError::Config(_)));
    }

    #[test]
    fn linked_images_resolve_from_layer_drawings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.png"), b"\x89PNG").unwrap();
        let input = dir.path().join("label.svg");
        let drawing = DRAWING
            .replace(
                "xmlns:inkscape=",
                "xmlns:xlink=\"http://www.w3.org/1999/xlink\" xmlns:inkscape=",
            )
            .replace(
                "<path id=\"sky\" d=\"M0 0H100\"/>",
                "<path id=\"sky\" d=\"M0 0H100\"/><image id=\"photo\" xlink:href=\"photo.png\" width=\"10\" height=\"10\"/>",
            );
        std::fs::write(&input, drawing).unwrap();
        let exporter = LinkResolvingExporter::default();

        let summary = run(
            &input,
            &ConvertConfig::default(),
            &exporter,
            &NoValidator,
            &AssumeYes,
        )
        .unwrap();

        assert_eq!(summary.mode, ConvertMode::Merged { cut_elements: 1 });
        let mut left: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        left.sort();
        assert_eq!(left, ["label.svg", "label_versaworks.eps", "photo.png"]);
    }

    #[test]
    fn declining_a_converted_cut_layer_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("logo.svg");
        std::fs::write(&input, DRAWING.replace("id=\"outline\"", "id=\"CutContour1\"")).unwrap();
        let exporter = FakeExporter::default();

        let err = run(
            &input,
            &ConvertConfig::default(),
            &exporter,
            &NoValidator,
            &Decline,
        )
        .unwrap_err();

        assert!(matches!(err, CutlineError::Declined));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        let seen = exporter.seen.borrow();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|path| !path.exists()));
    }

    #[test]
    fn validator_error_is_skipped_and_output_written() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sticker.eps");
        std::fs::write(&input, EPS).unwrap();

        let summary = run(
            &input,
            &ConvertConfig::default(),
            &FakeExporter::default(),
            &TimedOutValidator,
            &AssumeYes,
        )
        .unwrap();

        match &summary.validation {
            Validation::Skipped(reason) => assert!(reason.contains("gs")),
            other => panic!("unexpected verdict: {other:?}"),
        }
        assert!(summary.validation.is_acceptable());
        assert!(summary.output.exists());
    }

    #[test]
    fn failed_second_export_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("logo.svg");
        std::fs::write(&input, DRAWING).unwrap();
        let exporter = SecondExportFails::default();

        let err = run(
            &input,
            &ConvertConfig::default(),
            &exporter,
            &NoValidator,
            &AssumeYes,
        )
        .unwrap_err();

        assert!(matches!(err, CutlineError::Exporter(_)));
        assert_eq!(exporter.calls.get(), 2);
        // The first layer's drawing and export, both gone with their directories.
        let seen = exporter.inner.seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|path| !path.exists()));
        assert!(!seen[1].parent().unwrap().exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
