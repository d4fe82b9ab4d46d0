//! Turning command-line input into program text.

use std::fs;
use std::path::{Path, PathBuf};

/// Characters the interpreter acts on.
pub const INSTRUCTIONS: [char; 10] = ['>', '<', '+', '-', '.', ',', '[', ']', '#', '@'];

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read code file {path} as UTF-8: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid input: provide Brainfuck code or a file with a .bf extension")]
    NotAProgram,
}

/// Where the program text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramSource {
    File(PathBuf),
    Literal(String),
}

impl ProgramSource {
    /// Classify positional arguments.
    ///
    /// A single argument ending in `.bf` is a file; otherwise the arguments
    /// are joined into code, which must begin with an instruction.
    pub fn detect(args: &[String]) -> Result<Self, SourceError> {
        if let [single] = args {
            if is_bf_file(single) {
                return Ok(ProgramSource::File(PathBuf::from(single)));
            }
        }

        let code = args.concat();
        if starts_with_instruction(&code) {
            Ok(ProgramSource::Literal(code))
        } else {
            Err(SourceError::NotAProgram)
        }
    }

    pub fn load(self) -> Result<String, SourceError> {
        match self {
            ProgramSource::Literal(code) => Ok(code),
            ProgramSource::File(path) => read_program(&path),
        }
    }
}

pub fn read_program(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn is_bf_file(arg: &str) -> bool {
    arg.len() > 3 && arg.ends_with(".bf")
}

fn starts_with_instruction(code: &str) -> bool {
    code.chars().next().is_some_and(|c| INSTRUCTIONS.contains(&c))
}
