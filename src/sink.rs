//! Where program output and diagnostics go.
//!
//! The engine never touches a terminal directly. It writes plain text, styled
//! text, image cells and row breaks to an [`OutputSink`]. Styling is scoped to
//! a single call: a styled write is emitted as prefix, text and reset in one
//! piece, so there is no "current style" that an early error could leave
//! behind.

use std::io::{self, Write};

use nu_ansi_term::Style;

use crate::theme::Shade;

pub trait OutputSink {
    fn write_text(&mut self, text: &str) -> io::Result<()>;

    fn write_styled(&mut self, style: Style, text: &str) -> io::Result<()>;

    /// One image cell filled with the color of `shade`.
    fn write_cell(&mut self, shade: Shade) -> io::Result<()>;

    fn row_break(&mut self) -> io::Result<()> {
        self.write_text("\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink over any writer, painting with ANSI escapes when `color` is on.
///
/// Without color, image cells are written as their shade index so piped
/// output still shows the picture.
#[derive(Debug)]
pub struct TerminalSink<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn write_styled(&mut self, style: Style, text: &str) -> io::Result<()> {
        if self.color {
            write!(self.out, "{}", style.paint(text))
        } else {
            self.write_text(text)
        }
    }

    fn write_cell(&mut self, shade: Shade) -> io::Result<()> {
        if self.color {
            write!(self.out, "{}", Style::new().on(shade.color()).paint("  "))
        } else {
            write!(self.out, "{} ", shade.index())
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Everything a [`RecordingSink`] was asked to write, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Text(String),
    Styled(Style, String),
    Cell(Shade),
    RowBreak,
}

/// In-memory sink that keeps every write as an event.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text written, styled or not, with row breaks as newlines.
    pub fn text(&self) -> String {
        let mut s = String::new();
        for event in &self.events {
            match event {
                SinkEvent::Text(t) | SinkEvent::Styled(_, t) => s.push_str(t),
                SinkEvent::RowBreak => s.push('\n'),
                SinkEvent::Cell(_) => {}
            }
        }
        s
    }

    pub fn cells(&self) -> Vec<Shade> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Cell(shade) => Some(*shade),
                _ => None,
            })
            .collect()
    }
}

impl OutputSink for RecordingSink {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.events.push(SinkEvent::Text(text.to_string()));
        Ok(())
    }

    fn write_styled(&mut self, style: Style, text: &str) -> io::Result<()> {
        self.events.push(SinkEvent::Styled(style, text.to_string()));
        Ok(())
    }

    fn write_cell(&mut self, shade: Shade) -> io::Result<()> {
        self.events.push(SinkEvent::Cell(shade));
        Ok(())
    }

    fn row_break(&mut self) -> io::Result<()> {
        self.events.push(SinkEvent::RowBreak);
        Ok(())
    }
}
