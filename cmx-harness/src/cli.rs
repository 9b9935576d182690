//! CLI argument parsing for CMX.
//!
//! Provides the command-line interface for the unified `cmx` binary
//! with run and validate subcommands.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use glob::Pattern;
use thiserror::Error;

use cmx_schema::{Format, FORMAT_ORDER};

/// Default directory searched for fixture files.
pub const DEFAULT_FIXTURE_DIR: &str = "tests/generated";

/// Default directory for per-case artifacts and the final report.
pub const DEFAULT_OUTPUT_DIR: &str = "tests/results";

/// Default glob pattern matched against fixture file names.
pub const DEFAULT_FIXTURE_PATTERN: &str = "*.json";

/// Errors from CLI argument validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("invalid fixture pattern '{0}'")]
    InvalidPattern(String),
}

/// CMX - Conformance matrix harness for command-line codec tools.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "cmx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the full fixture x format matrix against a tool binary
    Run(RunArgs),
    /// Validate a single captured output file against a format
    Validate(ValidateArgs),
}

/// Arguments for the run command.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// Path to the tool binary under test (required).
    #[arg(long)]
    pub tool: PathBuf,

    /// Directory containing fixture input files.
    #[arg(long = "fixture-dir", default_value = DEFAULT_FIXTURE_DIR)]
    pub fixture_dir: PathBuf,

    /// Output directory for artifacts and the final report.
    #[arg(long = "out-dir", default_value = DEFAULT_OUTPUT_DIR)]
    pub out_dir: PathBuf,

    /// Glob pattern for fixture file names.
    #[arg(long, default_value = DEFAULT_FIXTURE_PATTERN)]
    pub pattern: String,

    /// Restrict the matrix to these formats (repeatable, default: all).
    #[arg(long = "format", value_parser = parse_format, action = ArgAction::Append)]
    pub formats: Vec<Format>,

    /// Increase verbosity (-v for verbose, -vv for debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl RunArgs {
    /// Validate the arguments.
    pub fn validate(&self) -> Result<(), CliError> {
        self.compiled_pattern().map(|_| ())
    }

    /// Compile the fixture pattern.
    pub fn compiled_pattern(&self) -> Result<Pattern, CliError> {
        Pattern::new(&self.pattern).map_err(|_| CliError::InvalidPattern(self.pattern.clone()))
    }

    /// Formats to run, in canonical matrix order with duplicates removed.
    pub fn effective_formats(&self) -> Vec<Format> {
        if self.formats.is_empty() {
            return FORMAT_ORDER.to_vec();
        }
        FORMAT_ORDER
            .into_iter()
            .filter(|f| self.formats.contains(f))
            .collect()
    }
}

/// Arguments for the validate command.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to the captured output file.
    #[arg(long)]
    pub file: PathBuf,

    /// Format to validate against.
    #[arg(long, value_parser = parse_format)]
    pub format: Format,

    /// Increase verbosity (-v for verbose, -vv for debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a format label for clap.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse::<Format>().map_err(|e| e.to_string())
}
