//! How the `.` instruction shows a cell.

use std::io;

use crate::config::OutputMode;
use crate::sink::OutputSink;
use crate::theme::Shade;

/// Output strategy for `.`. The engine's control flow is the same for
/// every renderer.
pub trait Renderer {
    fn render(&mut self, value: u8, sink: &mut dyn OutputSink) -> io::Result<()>;

    /// Forget state from an earlier run.
    fn reset(&mut self) {}

    /// Whether the output so far stops partway through a line.
    fn line_open(&self) -> bool {
        true
    }
}

/// Writes the cell as a character.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&mut self, value: u8, sink: &mut dyn OutputSink) -> io::Result<()> {
        let mut buf = [0u8; 4];
        sink.write_text(char::from(value).encode_utf8(&mut buf))
    }
}

/// Draws the cell as a colored square and wraps every `width` squares.
#[derive(Debug, Clone)]
pub struct ImageRenderer {
    width: usize,
    drawn: usize,
}

impl ImageRenderer {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            drawn: 0,
        }
    }

    /// Cells drawn so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl Renderer for ImageRenderer {
    fn render(&mut self, value: u8, sink: &mut dyn OutputSink) -> io::Result<()> {
        sink.write_cell(Shade::of(value))?;
        self.drawn += 1;
        if self.drawn % self.width == 0 {
            sink.row_break()?;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.drawn = 0;
    }

    fn line_open(&self) -> bool {
        self.drawn % self.width != 0
    }
}

/// Build the renderer for an output mode.
pub fn renderer_for(mode: OutputMode, image_width: usize) -> Box<dyn Renderer> {
    match mode {
        OutputMode::Text => Box::new(TextRenderer),
        OutputMode::Image => Box::new(ImageRenderer::new(image_width)),
    }
}
