// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output fingerprinting — SHA-256 digests logged for every written document.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a serialised document.
///
/// Converting the same input twice yields the same fingerprint; the pipeline
/// logs it next to the output path so repeated runs can be compared.
pub fn fingerprint(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
