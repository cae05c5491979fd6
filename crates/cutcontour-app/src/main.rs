// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CutContour — marks EPS strokes as VersaWorks cut lines.
//
// Entry point. Parses arguments, initialises logging, loads the config file,
// and runs one conversion.

mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cutcontour_bridge::stub::AssumeYes;
use cutcontour_bridge::traits::{Confirm, Validation};
use cutcontour_core::config::default_config_path;
use cutcontour_core::error::Result;
use cutcontour_core::human_errors::humanize_error;
use cutcontour_core::{ConvertConfig, SpotColorSpec};
use tracing_subscriber::EnvFilter;

use services::pipeline::{Collaborators, ConvertMode, ConvertRequest, ConvertSummary, convert};
use services::prompt::TerminalConfirm;

#[derive(Parser, Debug)]
#[command(name = "cutcontour", version)]
#[command(about = "Apply the CutContour spot color to EPS strokes for Roland VersaWorks")]
#[command(after_help = "Examples:
  cutcontour input.eps
  cutcontour input.eps -o output_cutcontour.eps
  cutcontour drawing.svg --stroke-width 0.5

SVG drawings with a layer or element named CutContour are split: only that
region becomes cut lines, the rest is printed underneath.")]
struct Cli {
    /// Input EPS/PS document or SVG drawing
    input: PathBuf,

    /// Output file (default: <input>_versaworks.eps)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stroke width in points (default: 0.25)
    #[arg(short = 'w', long)]
    stroke_width: Option<f64>,

    /// Convert tagged SVG drawings as a single layer
    #[arg(long)]
    ignore_region: bool,

    /// Skip Ghostscript validation of the output
    #[arg(long)]
    no_validate: bool,

    /// Continue without asking when the input already uses CutContour
    #[arg(short = 'y', long)]
    yes: bool,

    /// Config file (default: $XDG_CONFIG_HOME/cutcontour/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Warnings and errors only
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Load the config file and layer the command-line flags on top.
    fn resolve_config(&self) -> Result<ConvertConfig> {
        let path = self.config.clone().unwrap_or_else(default_config_path);
        let mut config = ConvertConfig::load(&path)?;
        if let Some(width) = self.stroke_width {
            config.stroke_width = width;
        }
        config.ignore_region |= self.ignore_region;
        config.assume_yes |= self.yes;
        if self.no_validate {
            config.validate = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(summary) => {
            report(&summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "conversion failed");
            let human = humanize_error(&err);
            eprintln!("Error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ConvertSummary> {
    let config = cli.resolve_config()?;
    tracing::debug!(?config, "configuration resolved");

    let exporter = cutcontour_bridge::exporter(&config);
    let validator = cutcontour_bridge::validator(&config);
    let confirm: Box<dyn Confirm> = if config.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalConfirm)
    };

    let request = ConvertRequest {
        input: cli.input.clone(),
        output: cli.output.clone(),
    };
    let tools = Collaborators {
        exporter: exporter.as_ref(),
        validator: validator.as_ref(),
        confirm: confirm.as_ref(),
    };
    convert(&request, &config, &tools)
}

fn report(summary: &ConvertSummary) {
    let color = SpotColorSpec::cut_contour();
    println!("Conversion complete: {}", summary.output.display());
    match summary.mode {
        ConvertMode::SingleLayer => {
            println!("  {} stroke(s) now use the {} spot color", summary.strokes, color.name)
        }
        ConvertMode::Merged { cut_elements } => println!(
            "  {cut_elements} cut region(s), {} stroke(s) on {} above the print layer",
            summary.strokes, color.name
        ),
    }
    match &summary.validation {
        Validation::Valid => println!("  validated with Ghostscript"),
        Validation::Invalid(detail) => println!("  WARNING: validator rejected the output: {detail}"),
        Validation::Skipped(reason) => println!("  validation skipped ({reason})"),
    }
    println!("  sha256 {}", summary.fingerprint);
}
