// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive yes/no confirmation on the terminal.

use std::io::{BufRead, Write};

use cutcontour_bridge::traits::Confirm;
use cutcontour_core::error::Result;

/// Asks on stderr and reads the answer from stdin.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, question: &str) -> Result<bool> {
        let mut stderr = std::io::stderr().lock();
        write!(stderr, "{question} (y/n): ")?;
        stderr.flush()?;
        read_answer(std::io::stdin().lock())
    }
}

/// Read one line and interpret it. End of input counts as "no".
fn read_answer(mut input: impl BufRead) -> Result<bool> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(is_yes(&line))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  YES "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn end_of_input_declines() {
        assert!(!read_answer(&b""[..]).unwrap());
        assert!(read_answer(&b"y\nignored\n"[..]).unwrap());
    }
}
