// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub collaborators for runs where validation or prompting is switched off.

use std::path::Path;

use cutcontour_core::error::Result;

use crate::traits::*;

/// Validator used when validation is disabled.
pub struct NoValidator;

impl Validator for NoValidator {
    fn validate(&self, document: &Path) -> Result<Validation> {
        tracing::debug!(path = %document.display(), "validation disabled");
        Ok(Validation::Skipped("validation disabled".into()))
    }
}

/// Answers yes to every question (`--yes`).
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, question: &str) -> Result<bool> {
        tracing::info!(question, "assuming yes");
        Ok(true)
    }
}
