use bf_canvas::commands::run::{self, RunArgs};
use clap::{Parser, Subcommand};
use std::env;
use std::io::{self, Write};

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [OPTIONS] "<code>"...   # Run Brainfuck code (args are concatenated)
  {0} run [OPTIONS] <program.bf>  # Run Brainfuck code loaded from a .bf file
  {0} run --image [-w N] <input>  # Render output as a grid of colored cells

Commands:
  >   increment the data pointer
  <   decrement the data pointer
  +   increment the byte at the data pointer
  -   decrement the byte at the data pointer
  .   output the byte at the data pointer
  ,   accept one byte of input
  [   jump forward past the matching ] if the byte at the pointer is 0
  ]   jump back to the matching [ if the byte at the pointer is nonzero
  #   print debug information
  @   print a memory snapshot

Run "{0} run --help" for the list of options.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bf", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Run(RunArgs),
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bf"));

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        print_top_usage_and_exit(&program, if cli.help { 0 } else { 2 });
    };
    if cli.help {
        print_top_usage_and_exit(&program, 0);
    }

    let code = match command {
        Command::Run(args) => run::run(&program, args),
    };

    std::process::exit(code);
}
