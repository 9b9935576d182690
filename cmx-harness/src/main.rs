//! CMX CLI binary.
//!
//! Entry point for the `cmx` command-line tool.

use std::process::ExitCode;

use clap::Parser;
use cmx_clock::SystemClock;
use cmx_fs::RealFilesystem;
use cmx_harness::exit::{codes, exit_code};
use cmx_harness::{
    execute_run, execute_validate, Cli, Command, CommandError, CommandToolRunner, ConsoleLogger,
    Verbosity,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run(args) => run_run(args),
        Command::Validate(args) => run_validate(args),
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(exit_code(&e) as u8)
        }
    }
}

/// Run the matrix run command.
fn run_run(args: cmx_harness::RunArgs) -> Result<i32, CommandError> {
    let runner = CommandToolRunner;
    let fs = RealFilesystem;
    let clock = SystemClock;
    let logger = ConsoleLogger::new(Verbosity::from_count(args.verbose));

    execute_run(&args, &runner, &fs, &clock, &logger)?;

    Ok(codes::SUCCESS)
}

/// Run the single-artifact validate command.
fn run_validate(args: cmx_harness::ValidateArgs) -> Result<i32, CommandError> {
    let fs = RealFilesystem;
    let logger = ConsoleLogger::new(Verbosity::from_count(args.verbose));

    let summary = execute_validate(&args, &fs, &logger)?;

    if summary.valid {
        Ok(codes::SUCCESS)
    } else {
        Ok(codes::INVALID_OUTPUT)
    }
}
