//! A Brainfuck interpreter that paints.
//!
//! This crate runs Brainfuck programs on a fixed memory tape (default
//! 30,000 cells) with a single data pointer, and renders `.` either as text or
//! as a grid of colored cells.
//!
//! Features and behaviors:
//! - Memory tape initialized to 0; `+` and `-` wrap around.
//! - Strict pointer bounds: moving left from cell 0 or right past the end
//!   returns an error.
//! - Input `,` reads a single byte; running out of input is an error.
//! - Output `.` goes through a [`Renderer`]: text mode prints the byte as a
//!   character, image mode draws one cell colored by the byte's range.
//! - `#` prints a debug report and `@` prints a snapshot of the cells around
//!   the pointer.
//! - Loops are matched when they are entered or repeated; unmatched brackets
//!   are reported as errors at that moment.
//! - Any other character is ignored.
//!
//! Quick start:
//!
//! ```no_run
//! use bf_canvas::{Interpreter, TerminalSink};
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let mut bf = Interpreter::new(code);
//! let mut sink = TerminalSink::new(std::io::stdout(), true);
//! bf.run(&mut std::io::stdin(), &mut sink).expect("program should run");
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod render;
pub mod scanner;
pub mod sink;
pub mod source;
pub mod tape;
pub mod theme;

pub use config::{ConfigError, OutputMode, RunConfig};
pub use engine::{Interpreter, InterpreterError};
pub use render::{ImageRenderer, Renderer, TextRenderer};
pub use scanner::Bracket;
pub use sink::{OutputSink, RecordingSink, TerminalSink};
pub use tape::{MemoryTape, MemoryUsage};
