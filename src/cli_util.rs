use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Style;

use crate::theme::{self, Highlights};
use crate::InterpreterError;

/// Whether styled output should be used for a stream.
///
/// An explicit flag wins; otherwise color is on for terminals unless
/// `NO_COLOR` is set.
pub fn use_color(flag: Option<bool>, is_terminal: bool) -> bool {
    flag.unwrap_or_else(|| is_terminal && std::env::var_os("NO_COLOR").is_none())
}

/// Print a structured [`InterpreterError`] to stderr with caret positioning.
/// If `program` is `Some("bf")`, prefix messages with "bf: ...".
pub fn print_interpreter_error(
    program: Option<&str>,
    code: &str,
    err: &InterpreterError,
    color: Option<bool>,
) {
    let color = use_color(color, io::stderr().is_terminal());
    let mut stderr = io::stderr().lock();
    let _ = write_interpreter_error(&mut stderr, program, code, err, color);
    let _ = stderr.flush();
}

pub fn write_interpreter_error(
    out: &mut dyn Write,
    program: Option<&str>,
    code: &str,
    err: &InterpreterError,
    color: bool,
) -> io::Result<()> {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    let msg = match err {
        InterpreterError::PointerOverflow { ptr, .. } => {
            format!("Runtime error: pointer overflow (ptr={ptr}, op='>')")
        }
        InterpreterError::PointerUnderflow { .. } => {
            "Runtime error: pointer underflow (ptr=0, op='<')".to_string()
        }
        InterpreterError::UnmatchedBracket { missing, .. } => {
            format!("Parse error: unmatched bracket, missing {missing}")
        }
        InterpreterError::InputExhausted { .. } => {
            "Input error: no input left for ','".to_string()
        }
        InterpreterError::IoError { source, .. } => format!("I/O error: {source}"),
    };

    writeln!(out)?;
    let banner = "  Execution error  ";
    if color {
        write!(out, "{}", theme::banner(Highlights::ERROR).paint(banner))?;
    } else {
        write!(out, "{banner}")?;
    }
    writeln!(out, ": {}", prefix_program(&msg))?;
    write_error_context(out, code, err.ip(), color)
}

/// Show the instruction index and a short window of code with a caret under
/// it, slicing by char so multi-byte input stays intact.
pub fn write_error_context(
    out: &mut dyn Write,
    code: &str,
    pos: usize,
    color: bool,
) -> io::Result<()> {
    writeln!(out, "  at instruction {pos}")?;

    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    if total_chars == 0 {
        return Ok(());
    }
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    // Newlines and tabs would break caret alignment.
    let slice: String = code
        .chars()
        .skip(start_char)
        .take(end_char - start_char)
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    writeln!(out, "  {slice}")?;

    let caret_offset_chars = pos.saturating_sub(start_char);
    let underline = format!("{}^", " ".repeat(caret_offset_chars));
    if color {
        writeln!(out, "  {}", Style::new().fg(Highlights::ERROR).bold().paint(underline))
    } else {
        writeln!(out, "  {underline}")
    }
}
