//! Loop partner resolution.
//!
//! Brackets are matched lazily: a scan only happens when `[` is entered with a
//! zero cell or `]` is reached with a non-zero cell. Each scan costs time
//! linear in the distance to the partner, and is repeated every time the loop
//! is skipped or repeated. There is no jump table.

use std::fmt;

/// One side of a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Open,
    Close,
}

impl Bracket {
    pub fn as_char(self) -> char {
        match self {
            Bracket::Open => '[',
            Bracket::Close => ']',
        }
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.as_char())
    }
}

/// A bracket at `ip` whose partner does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unmatched bracket at instruction {ip}: missing {missing}")]
pub struct UnmatchedBracket {
    /// Index of the bracket that started the scan.
    pub ip: usize,
    /// The partner that was never found.
    pub missing: Bracket,
}

/// Find the `]` matching the `[` at `open`.
pub fn find_matching_close(code: &[char], open: usize) -> Result<usize, UnmatchedBracket> {
    let mut depth = 1usize;
    for (i, &c) in code.iter().enumerate().skip(open + 1) {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(UnmatchedBracket { ip: open, missing: Bracket::Close })
}

/// Find the `[` matching the `]` at `close`.
///
/// Mirror of [`find_matching_close`]: walking backwards, a `]` opens a
/// nesting level and a `[` closes one.
pub fn find_matching_open(code: &[char], close: usize) -> Result<usize, UnmatchedBracket> {
    let mut depth = 1usize;
    let end = close.min(code.len());
    for (i, &c) in code[..end].iter().enumerate().rev() {
        match c {
            ']' => depth += 1,
            '[' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(UnmatchedBracket { ip: close, missing: Bracket::Open })
}
