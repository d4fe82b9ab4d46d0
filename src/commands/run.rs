use clap::Args;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use crate::cli_util::{print_interpreter_error, use_color};
use crate::config::{self, ConfigLayer, OutputMode};
use crate::sink::{OutputSink, TerminalSink};
use crate::source::ProgramSource;
use crate::Interpreter;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Read Brainfuck code from PATH instead of positional "<input>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Tape size in cells (fallback BF_MEMORY; default 30000)
    #[arg(short = 'm', long = "memory", value_name = "SIZE")]
    pub memory: Option<usize>,

    /// Cells shown before the pointer by '@' (fallback BF_SNAPX; default 2)
    #[arg(long = "snapx", value_name = "N")]
    pub snapx: Option<usize>,

    /// Cells shown after the pointer by '@' (fallback BF_SNAPY; default 2)
    #[arg(long = "snapy", value_name = "N")]
    pub snapy: Option<usize>,

    /// Render '.' as colored cells instead of characters
    #[arg(short = 'i', long = "image", conflicts_with = "text")]
    pub image: bool,

    /// Render '.' as characters (overrides BF_OUTPUT_MODE and the config file)
    #[arg(long = "text")]
    pub text: bool,

    /// Cells per row in image mode (fallback BF_IMAGE_WIDTH; default 16)
    #[arg(short = 'w', long = "width", value_name = "N")]
    pub width: Option<usize>,

    /// Always emit ANSI colors
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Never emit ANSI colors
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// A .bf file, or Brainfuck code (parts are concatenated)
    #[arg(value_name = "input", trailing_var_arg = true, allow_hyphen_values = true)]
    pub input: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

impl RunArgs {
    fn config_flags(&self) -> ConfigLayer {
        let output_mode = if self.image {
            Some(OutputMode::Image)
        } else if self.text {
            Some(OutputMode::Text)
        } else {
            None
        };
        ConfigLayer {
            memory_size: self.memory,
            snapshot_start: self.snapx,
            snapshot_end: self.snapy,
            image_width: self.width,
            output_mode,
        }
    }

    fn color_flag(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    if args.file.is_none() && args.input.is_empty() {
        usage_and_exit(program, 2);
    }

    if args.file.is_some() && !args.input.is_empty() {
        eprintln!("{program}: cannot use positional input together with --file");
        usage_and_exit(program, 2);
    }

    // Resolve settings: flags -> env -> config file -> defaults
    let run_config = match config::resolve(args.config_flags()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            return 2;
        }
    };

    let source = match &args.file {
        Some(path) => ProgramSource::File(PathBuf::from(path)),
        None => match ProgramSource::detect(&args.input) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{program}: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        },
    };

    let code = match source.load() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    let color = args.color_flag();
    let stdout = io::stdout();
    let color_out = use_color(color, stdout.is_terminal());
    let mut sink = TerminalSink::new(stdout.lock(), color_out);

    let mut bf = Interpreter::with_config(&code, run_config);
    let result = bf.run(&mut io::stdin().lock(), &mut sink);

    // For readability, ensure output ends with a newline
    if bf.line_open() {
        let _ = sink.write_text("\n");
    }
    let _ = sink.flush();

    match result {
        Ok(()) => 0,
        Err(err) => {
            print_interpreter_error(Some(program), &code, &err, color);
            1
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [OPTIONS] "<code>"...
  {0} run [OPTIONS] <program.bf>
  {0} run [OPTIONS] --file <PATH>

Options:
  --file,   -f <PATH>  Read Brainfuck code from PATH instead of positional input
  --memory, -m <SIZE>  Set the memory size (default: 30000)
  --snapx      <N>     Cells shown before the pointer by '@' (default: 2)
  --snapy      <N>     Cells shown after the pointer by '@' (default: 2)
  --image,  -i         Render '.' as colored cells
  --text               Render '.' as characters (default)
  --width,  -w <N>     Cells per row in image mode (default: 16)
  --color / --no-color Force ANSI colors on or off
  --help,   -h         Show this help

Notes:
- Options must come before <input>; everything from the first input on is program text.
- A single input ending in .bf is read as a file; anything else must start with an instruction.
- Input (`,`) reads a single byte from stdin; running out of input is an error.
- Settings fall back to BF_MEMORY, BF_SNAPX, BF_SNAPY, BF_IMAGE_WIDTH, BF_OUTPUT_MODE,
  then to the [defaults] section of bf.toml in your config directory.

Examples:
- Print a debug report after some arithmetic:
    {0} run "+++>++#"
- Paint every byte value from 1 to 255, 32 cells per row:
    {0} run --image -w 32 "+[.+]"
- Read bytes from a file as stdin (`,` will consume file input):
    {0} run ",.,.,." < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
