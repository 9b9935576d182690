//! CMX conformance harness.
//!
//! Drives a command-line codec tool across the cross product of input
//! fixtures and output formats, validates each captured output against
//! its declared format, and persists per-case artifacts plus a final
//! structured report.

pub mod cli;
pub mod commands;
pub mod discovery;
pub mod executor;
pub mod exit;
pub mod io;
pub mod logger;
pub mod validator;

pub use cli::{
    Cli, CliError, Command, RunArgs, ValidateArgs, DEFAULT_FIXTURE_DIR, DEFAULT_FIXTURE_PATTERN,
    DEFAULT_OUTPUT_DIR,
};
pub use commands::{execute_run, execute_validate, CommandError, RunSummary, ValidateSummary};
pub use discovery::{discover_fixtures, Fixture};
pub use executor::{
    CaseExecutor, CommandToolRunner, ExecutionResult, MockToolRunner, RawOutput, SpawnError,
    ToolRunner,
};
pub use logger::{ConsoleLogger, Logger, MockLogger, NullLogger, Verbosity};
pub use validator::{validate, ValidationVerdict};
