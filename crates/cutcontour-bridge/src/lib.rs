// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CutContour — bridges to the external tools the converter drives.

pub mod process;
pub mod stub;
pub mod traits;

use std::time::Duration;

use cutcontour_core::ConvertConfig;

/// Exporter configured from `config` (Inkscape on the `PATH` by default).
pub fn exporter(config: &ConvertConfig) -> Box<dyn traits::Exporter> {
    Box::new(process::InkscapeExporter::new(
        config.inkscape_binary.clone(),
        Duration::from_secs(config.tool_timeout_secs),
    ))
}

/// Validator configured from `config`; a no-op when validation is off.
pub fn validator(config: &ConvertConfig) -> Box<dyn traits::Validator> {
    if !config.validate {
        return Box::new(stub::NoValidator);
    }
    Box::new(process::GhostscriptValidator::new(
        config.ghostscript_binary.clone(),
        Duration::from_secs(config.tool_timeout_secs),
    ))
}
