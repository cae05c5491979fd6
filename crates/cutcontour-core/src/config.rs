// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Converter configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CutlineError, Result};
use crate::types::{HAIRLINE_WIDTH, RegionTag, StrokeStyleSpec};

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE: &str = "config.json";

/// Settings consumed by the conversion pipeline.
///
/// The spot color itself is fixed and deliberately absent here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Stroke width in points applied to every cut line.
    pub stroke_width: f64,
    /// Words that mark a drawing element as the cut region.
    pub region_tags: Vec<String>,
    /// Treat tagged drawings as a single layer (no split / merge).
    pub ignore_region: bool,
    /// Run the external validator on the produced document.
    pub validate: bool,
    /// Exporter executable (Inkscape).
    pub inkscape_binary: PathBuf,
    /// Validator executable (Ghostscript).
    pub ghostscript_binary: PathBuf,
    /// Upper bound for any single external tool invocation.
    pub tool_timeout_secs: u64,
    /// Proceed without asking when the input already mentions the spot color.
    pub assume_yes: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            stroke_width: HAIRLINE_WIDTH,
            region_tags: vec!["CutContour".into()],
            ignore_region: false,
            validate: true,
            inkscape_binary: PathBuf::from("inkscape"),
            ghostscript_binary: PathBuf::from("gs"),
            tool_timeout_secs: 30,
            assume_yes: false,
        }
    }
}

impl ConvertConfig {
    /// Stroke style derived from the configured width.
    pub fn stroke(&self) -> StrokeStyleSpec {
        StrokeStyleSpec::new(self.stroke_width)
    }

    /// Region predicate derived from the configured tag words.
    pub fn region_tag(&self) -> RegionTag {
        RegionTag::new(&self.region_tags)
    }

    /// Reject values the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !(self.stroke_width.is_finite() && self.stroke_width > 0.0) {
            return Err(CutlineError::Config(format!(
                "stroke width must be a positive number, got {}",
                self.stroke_width
            )));
        }
        if self.tool_timeout_secs == 0 {
            return Err(CutlineError::Config(
                "tool timeout must be at least one second".into(),
            ));
        }
        if !self.ignore_region && self.region_tag().is_empty() {
            return Err(CutlineError::Config(
                "region_tags needs at least one word (or set ignore_region)".into(),
            ));
        }
        Ok(())
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn persist(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Default location of the config file (`$XDG_CONFIG_HOME/cutcontour/config.json`).
pub fn default_config_path() -> PathBuf {
    config_base().join("cutcontour").join(CONFIG_FILE)
}

fn config_base() -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    PathBuf::from(".")
}
