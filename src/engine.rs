//! The dispatch loop.
//!
//! One loop serves both output modes; the only mode-specific behavior is the
//! [`Renderer`] that `.` hands the current cell to.

use std::io::{self, Read};

use crate::config::RunConfig;
use crate::diagnostics;
use crate::render::{renderer_for, Renderer};
use crate::scanner::{find_matching_close, find_matching_open, Bracket, UnmatchedBracket};
use crate::sink::OutputSink;
use crate::tape::{MemoryTape, TapeError};

/// Errors that stop a run. Output written before the failing instruction is
/// kept.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    /// `>` on the last cell.
    #[error("pointer overflow at instruction {ip} (ptr={ptr})")]
    PointerOverflow { ip: usize, ptr: usize },

    /// `<` on cell 0.
    #[error("pointer underflow at instruction {ip}")]
    PointerUnderflow { ip: usize },

    /// A loop bracket without a partner.
    #[error("unmatched bracket at instruction {ip}: missing {missing}")]
    UnmatchedBracket { ip: usize, missing: Bracket },

    /// `,` found no more input.
    #[error("input exhausted at instruction {ip}")]
    InputExhausted { ip: usize },

    /// Reading input or writing output failed.
    #[error("I/O error at instruction {ip}: {source}")]
    IoError { ip: usize, #[source] source: io::Error },
}

impl InterpreterError {
    /// Instruction index the error was raised at.
    pub fn ip(&self) -> usize {
        match self {
            InterpreterError::PointerOverflow { ip, .. }
            | InterpreterError::PointerUnderflow { ip }
            | InterpreterError::UnmatchedBracket { ip, .. }
            | InterpreterError::InputExhausted { ip }
            | InterpreterError::IoError { ip, .. } => *ip,
        }
    }

    fn from_tape(ip: usize, err: TapeError) -> Self {
        match err {
            TapeError::Overflow { ptr } => InterpreterError::PointerOverflow { ip, ptr },
            TapeError::Underflow => InterpreterError::PointerUnderflow { ip },
        }
    }
}

impl From<UnmatchedBracket> for InterpreterError {
    fn from(e: UnmatchedBracket) -> Self {
        InterpreterError::UnmatchedBracket { ip: e.ip, missing: e.missing }
    }
}

/// A Brainfuck interpreter with `#` and `@` diagnostics.
///
/// The interpreter holds:
/// - the program as a sequence of `char`s,
/// - a memory tape sized by [`RunConfig::memory_size`],
/// - the renderer for `.` chosen by [`RunConfig::output_mode`].
///
/// Characters outside `><+-.,[]#@` are skipped.
pub struct Interpreter {
    code: Vec<char>,
    tape: MemoryTape,
    config: RunConfig,
    renderer: Box<dyn Renderer>,
}

impl Interpreter {
    /// Create an interpreter for `code` with default settings.
    pub fn new(code: &str) -> Self {
        Self::with_config(code, RunConfig::default())
    }

    /// Create an interpreter for `code` with the given settings.
    pub fn with_config(code: &str, config: RunConfig) -> Self {
        let renderer = renderer_for(config.output_mode, config.image_width);
        Self {
            code: code.chars().collect(),
            tape: MemoryTape::new(config.memory_size),
            config,
            renderer,
        }
    }

    /// Replace the renderer picked from the output mode.
    pub fn set_renderer<R>(&mut self, renderer: R)
    where
        R: Renderer + 'static,
    {
        self.renderer = Box::new(renderer);
    }

    pub fn tape(&self) -> &MemoryTape {
        &self.tape
    }

    /// Whether the last run stopped partway through a line of output.
    pub fn line_open(&self) -> bool {
        self.renderer.line_open()
    }

    /// Execute the program until it ends or fails.
    ///
    /// Every run starts on a zeroed tape and a fresh renderer; [`tape`](Self::tape)
    /// shows the state the latest run left behind.
    ///
    /// `,` reads from `input`; `.`, `#` and `@` write to `sink`. The sink is
    /// flushed before every read and before returning, so prompts are
    /// visible while waiting for input and output survives an error.
    pub fn run(
        &mut self,
        input: &mut dyn Read,
        sink: &mut dyn OutputSink,
    ) -> Result<(), InterpreterError> {
        self.tape = MemoryTape::new(self.config.memory_size);
        self.renderer.reset();

        let result = self.execute(input, sink);
        let flushed = sink.flush();
        result?;
        flushed.map_err(|source| InterpreterError::IoError { ip: self.code.len(), source })
    }

    fn execute(
        &mut self,
        input: &mut dyn Read,
        sink: &mut dyn OutputSink,
    ) -> Result<(), InterpreterError> {
        let mut ip = 0;
        let io_err = |ip: usize| move |source: io::Error| InterpreterError::IoError { ip, source };

        while ip < self.code.len() {
            match self.code[ip] {
                '>' => self.tape.move_right().map_err(|e| InterpreterError::from_tape(ip, e))?,
                '<' => self.tape.move_left().map_err(|e| InterpreterError::from_tape(ip, e))?,
                '+' => self.tape.increment(),
                '-' => self.tape.decrement(),
                '.' => self.renderer.render(self.tape.read(), sink).map_err(io_err(ip))?,
                ',' => {
                    sink.flush().map_err(io_err(ip))?;
                    let mut buf = [0u8; 1];
                    match input.read_exact(&mut buf) {
                        Ok(()) => self.tape.write(buf[0]),
                        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                            return Err(InterpreterError::InputExhausted { ip });
                        }
                        Err(source) => return Err(InterpreterError::IoError { ip, source }),
                    }
                }
                '[' => {
                    if self.tape.read() == 0 {
                        ip = find_matching_close(&self.code, ip)?;
                    }
                }
                ']' => {
                    if self.tape.read() != 0 {
                        ip = find_matching_open(&self.code, ip)?;
                    }
                }
                '#' => diagnostics::debug_report(&self.tape, sink).map_err(io_err(ip))?,
                '@' => diagnostics::snapshot(
                    &self.tape,
                    self.config.snapshot_start,
                    self.config.snapshot_end,
                    sink,
                )
                .map_err(io_err(ip))?,
                _ => {}
            }
            // A jump lands on the partner bracket; stepping past it resumes
            // after the loop or at the first body instruction.
            ip += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputMode;
    use crate::sink::{RecordingSink, SinkEvent};
    use crate::theme::Shade;

    fn small(memory_size: usize) -> RunConfig {
        RunConfig { memory_size, ..RunConfig::default() }
    }

    fn run_text(
        code: &str,
        memory_size: usize,
        input: &[u8],
    ) -> (Interpreter, RecordingSink, Result<(), InterpreterError>) {
        let mut bf = Interpreter::with_config(code, small(memory_size));
        let mut sink = RecordingSink::new();
        let mut input = input;
        let result = bf.run(&mut input, &mut sink);
        (bf, sink, result)
    }

    #[test]
    fn unknown_characters_are_ignored() {
        let (bf, _, result) = run_text("+a+ hello\n+", 10, b"");
        assert!(result.is_ok());
        assert_eq!(bf.tape().read(), 3);
    }

    #[test]
    fn plus_four_then_dot_prints_byte_four() {
        let mut bf = Interpreter::new("++++.");
        let mut sink = RecordingSink::new();
        bf.run(&mut io::empty(), &mut sink).unwrap();
        assert_eq!(sink.text(), "\u{4}");
        assert_eq!(bf.tape().len(), 30_000);
    }

    #[test]
    fn clear_loop_zeroes_the_cell() {
        let (bf, _, result) = run_text("+[-]", 10, b"");
        assert!(result.is_ok());
        assert_eq!(bf.tape().read(), 0);
        assert_eq!(bf.tape().pointer(), 0);
    }

    #[test]
    fn scan_right_stops_on_first_zero_cell() {
        let (bf, _, result) = run_text("+++>+++>+++<<[>]", 10, b"");
        assert!(result.is_ok());
        assert_eq!(bf.tape().pointer(), 3);
        assert_eq!(bf.tape().read(), 0);
    }

    #[test]
    fn lone_open_bracket_is_unmatched() {
        let (_, _, result) = run_text("[", 10, b"");
        assert!(matches!(
            result,
            Err(InterpreterError::UnmatchedBracket { ip: 0, missing: Bracket::Close })
        ));
    }

    #[test]
    fn stray_close_bracket_only_fails_when_taken() {
        let (_, _, result) = run_text("]", 10, b"");
        assert!(result.is_ok());

        let (_, _, result) = run_text("+]", 10, b"");
        assert!(matches!(
            result,
            Err(InterpreterError::UnmatchedBracket { ip: 1, missing: Bracket::Open })
        ));
    }

    #[test]
    fn left_of_zero_underflows() {
        let (_, _, result) = run_text("<", 10, b"");
        assert!(matches!(result, Err(InterpreterError::PointerUnderflow { ip: 0 })));
    }

    #[test]
    fn moving_right_memory_size_times_overflows_on_the_last() {
        let memory_size = 3;
        let code = ">".repeat(memory_size);
        let (bf, _, result) = run_text(&code, memory_size, b"");
        assert!(matches!(result, Err(InterpreterError::PointerOverflow { ip: 2, ptr: 2 })));
        assert_eq!(bf.tape().pointer(), 2);
    }

    #[test]
    fn default_tape_overflows_after_its_last_cell() {
        let code = ">".repeat(30_000);
        let mut bf = Interpreter::new(&code);
        let result = bf.run(&mut io::empty(), &mut RecordingSink::new());
        assert!(matches!(result, Err(InterpreterError::PointerOverflow { ip: 29_999, .. })));
    }

    #[test]
    fn wrapping_addition() {
        let code = "+".repeat(256);
        let (bf, _, result) = run_text(&code, 1, b"");
        assert!(result.is_ok());
        assert_eq!(bf.tape().read(), 0);
    }

    #[test]
    fn wrapping_subtraction() {
        let (bf, _, result) = run_text("-", 1, b"");
        assert!(result.is_ok());
        assert_eq!(bf.tape().read(), 255);

        let code = format!("+++{}", "-".repeat(256));
        let (bf, _, _) = run_text(&code, 1, b"");
        assert_eq!(bf.tape().read(), 3);
    }

    #[test]
    fn input_is_echoed() {
        let (_, sink, result) = run_text(",.,.", 10, b"Hi");
        assert!(result.is_ok());
        assert_eq!(sink.text(), "Hi");
    }

    #[test]
    fn exhausted_input_fails_after_earlier_output() {
        let (_, sink, result) = run_text(",.,.", 10, b"Z");
        assert!(matches!(result, Err(InterpreterError::InputExhausted { ip: 2 })));
        assert_eq!(sink.text(), "Z");
    }

    #[test]
    fn failing_reader_surfaces_io_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("boom"))
            }
        }
        let mut bf = Interpreter::new("+,");
        let result = bf.run(&mut Broken, &mut RecordingSink::new());
        match result {
            Err(InterpreterError::IoError { ip, source }) => {
                assert_eq!(ip, 1);
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("expected I/O error, got {other:?}"),
        }
    }

    #[test]
    fn nested_loops_multiply() {
        // 3 * 4 into cell 2, with an inner loop that rebuilds cell 1 each pass.
        let (bf, _, result) = run_text("+++[>++++[>+<-]<-]>>", 10, b"");
        assert!(result.is_ok());
        assert_eq!(bf.tape().read(), 12);
        assert_eq!(bf.tape().cells()[0], 0);
        assert_eq!(bf.tape().cells()[1], 0);
    }

    #[test]
    fn skipped_nested_loop_does_not_run_its_body() {
        let (bf, _, result) = run_text("[[+]+]+", 10, b"");
        assert!(result.is_ok());
        assert_eq!(bf.tape().read(), 1);
    }

    #[test]
    fn hello_world() {
        let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
        let mut bf = Interpreter::new(code);
        let mut sink = RecordingSink::new();
        bf.run(&mut io::empty(), &mut sink).unwrap();
        assert_eq!(sink.text(), "Hello World!\n");
    }

    #[test]
    fn hash_prints_debug_report_without_touching_state() {
        let (bf, sink, result) = run_text("+++>++#", 100, b"");
        assert!(result.is_ok());
        let text = sink.text();
        assert!(text.contains("debug information"));
        assert!(text.contains(" pointer location   1\n"));
        assert!(text.contains(" memory usage       2.00%\n"));
        assert!(text.contains(" non-zero cells     2\n"));
        assert_eq!(bf.tape().pointer(), 1);
        assert_eq!(bf.tape().read(), 2);
    }

    #[test]
    fn at_sign_uses_configured_snapshot_window() {
        let config = RunConfig {
            memory_size: 10,
            snapshot_start: 1,
            snapshot_end: 3,
            ..RunConfig::default()
        };
        let mut bf = Interpreter::with_config(">>@", config);
        let mut sink = RecordingSink::new();
        bf.run(&mut io::empty(), &mut sink).unwrap();
        let text = sink.text();
        assert!(text.contains("memory snapshot"));
        assert!(!text.contains("[00]"));
        for label in ["[01]", "[02]", "[03]", "[04]", "[05]"] {
            assert!(text.contains(label), "missing {label}");
        }
        assert!(!text.contains("[06]"));
    }

    #[test]
    fn image_mode_wraps_after_image_width_cells() {
        let config = RunConfig {
            output_mode: OutputMode::Image,
            image_width: 4,
            ..RunConfig::default()
        };
        let code = ".".repeat(5);
        let mut bf = Interpreter::with_config(&code, config);
        let mut sink = RecordingSink::new();
        bf.run(&mut io::empty(), &mut sink).unwrap();

        let zero = Shade::of(0);
        assert_eq!(
            sink.events,
            vec![
                SinkEvent::Cell(zero),
                SinkEvent::Cell(zero),
                SinkEvent::Cell(zero),
                SinkEvent::Cell(zero),
                SinkEvent::RowBreak,
                SinkEvent::Cell(zero),
            ]
        );
    }

    #[test]
    fn both_modes_leave_identical_tapes() {
        let code = "++[>+++++[>++++++<-]<-]>>.+.<,[->+<]>.";
        let text = RunConfig { memory_size: 16, ..RunConfig::default() };
        let image = RunConfig { output_mode: OutputMode::Image, ..text.clone() };

        let mut a = Interpreter::with_config(code, text);
        let mut b = Interpreter::with_config(code, image);
        a.run(&mut &b"\x05"[..], &mut RecordingSink::new()).unwrap();
        b.run(&mut &b"\x05"[..], &mut RecordingSink::new()).unwrap();

        assert_eq!(a.tape().cells(), b.tape().cells());
        assert_eq!(a.tape().pointer(), b.tape().pointer());
    }

    #[test]
    fn custom_renderer_replaces_the_mode_default() {
        struct Hex;
        impl Renderer for Hex {
            fn render(&mut self, value: u8, sink: &mut dyn OutputSink) -> io::Result<()> {
                sink.write_text(&format!("{value:02x} "))
            }
        }
        let mut bf = Interpreter::new(&format!("{}.", "+".repeat(17)));
        bf.set_renderer(Hex);
        let mut sink = RecordingSink::new();
        bf.run(&mut io::empty(), &mut sink).unwrap();
        assert_eq!(sink.text(), "11 ");
    }

    #[test]
    fn second_run_starts_from_a_zeroed_tape() {
        let mut bf = Interpreter::new("+>+.");
        let mut first = RecordingSink::new();
        bf.run(&mut io::empty(), &mut first).unwrap();
        let mut second = RecordingSink::new();
        bf.run(&mut io::empty(), &mut second).unwrap();

        assert_eq!(first.text(), "\u{1}");
        assert_eq!(second.text(), "\u{1}");
        assert_eq!(bf.tape().pointer(), 1);
        assert_eq!(&bf.tape().cells()[..2], &[1, 1]);
    }

    #[test]
    fn second_image_run_starts_a_new_row() {
        let config = RunConfig {
            output_mode: OutputMode::Image,
            image_width: 2,
            ..RunConfig::default()
        };
        let mut bf = Interpreter::with_config(".", config);
        bf.run(&mut io::empty(), &mut RecordingSink::new()).unwrap();
        assert!(bf.line_open());

        let mut sink = RecordingSink::new();
        bf.run(&mut io::empty(), &mut sink).unwrap();
        assert_eq!(sink.events, vec![SinkEvent::Cell(Shade::of(0))]);
    }

    #[test]
    fn full_image_row_closes_the_line() {
        let config = RunConfig {
            output_mode: OutputMode::Image,
            image_width: 2,
            ..RunConfig::default()
        };
        let mut bf = Interpreter::with_config("..", config);
        bf.run(&mut io::empty(), &mut RecordingSink::new()).unwrap();
        assert!(!bf.line_open());
    }
}
