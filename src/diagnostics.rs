//! The `#` debug report and the `@` memory snapshot.
//!
//! Both only read the tape; calling them twice in a row prints the same thing.

use std::io;

use crate::sink::OutputSink;
use crate::tape::MemoryTape;
use crate::theme::{self, Highlights};

/// The printable ASCII form of `value`, if it has one.
pub fn printable(value: u8) -> Option<char> {
    (32..=126).contains(&value).then(|| char::from(value))
}

/// Tape state summarized by the `#` instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugInfo {
    pub pointer: usize,
    pub value: u8,
    pub utilization: f64,
    pub non_zero: usize,
}

impl DebugInfo {
    pub fn capture(tape: &MemoryTape) -> Self {
        Self {
            pointer: tape.pointer(),
            value: tape.read(),
            utilization: tape.utilization_percent(),
            non_zero: tape.usage().non_zero,
        }
    }
}

fn value_with_char(value: u8) -> String {
    match printable(value) {
        Some(c) => format!("{value} ({c})"),
        None => value.to_string(),
    }
}

fn labeled_row(
    sink: &mut dyn OutputSink,
    color: nu_ansi_term::Color,
    label: &str,
    value: &str,
) -> io::Result<()> {
    sink.write_styled(theme::label(color), label)?;
    sink.write_styled(theme::value(), &format!("  {value}"))?;
    sink.write_text("\n")
}

/// Print pointer position, current value, memory usage and non-zero count.
pub fn debug_report(tape: &MemoryTape, sink: &mut dyn OutputSink) -> io::Result<()> {
    let info = DebugInfo::capture(tape);

    sink.write_text("\n\n")?;
    sink.write_styled(theme::banner(Highlights::TITLE), "    debug information    ")?;
    sink.write_text("\n")?;

    let pointer = info.pointer.to_string();
    let value = value_with_char(info.value);
    let usage = format!("{:.2}%", info.utilization);
    labeled_row(sink, Highlights::POINTER_LOCATION, " pointer location ", &pointer)?;
    labeled_row(sink, Highlights::POINTER_VALUE, " pointer value    ", &value)?;
    labeled_row(sink, Highlights::MEMORY_USAGE, " memory usage     ", &usage)?;
    labeled_row(sink, Highlights::NON_ZERO, " non-zero cells   ", &info.non_zero.to_string())
}

/// Print the cells from `start_offset` before the pointer to `end_offset`
/// after it, marking the pointer's own cell.
pub fn snapshot(
    tape: &MemoryTape,
    start_offset: usize,
    end_offset: usize,
    sink: &mut dyn OutputSink,
) -> io::Result<()> {
    sink.write_text("\n\n")?;
    sink.write_styled(theme::banner(Highlights::SNAPSHOT_TITLE), "      memory snapshot      ")?;
    sink.write_text("\n")?;

    let cells = tape.cells();
    for i in tape.window(start_offset, end_offset) {
        let marker = if i == tape.pointer() {
            Highlights::POINTER_VALUE
        } else {
            Highlights::POINTER_LOCATION
        };
        sink.write_styled(theme::label(marker), &format!(" [{i:02}] "))?;
        sink.write_styled(theme::value(), &format!(" {}", value_with_char(cells[i])))?;
        sink.write_text("\n")?;
    }
    sink.write_text("\n")
}
