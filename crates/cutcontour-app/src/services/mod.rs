// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — wires the document crate and the tool bridges into one
// conversion run for the CLI.

pub mod output;
pub mod pipeline;
pub mod prompt;
