// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SVG module — splitting a drawing into cut and print layers.

pub mod split;
mod tree;

pub use split::{LayerSplit, split_layers};
