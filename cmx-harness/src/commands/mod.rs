//! Command orchestration for CLI subcommands.
//!
//! Provides execute functions for:
//! - `run` - Drive the full fixture x format matrix
//! - `validate` - Check one captured output against a format

pub mod run;
pub mod validate;

pub use run::{execute_run, RunSummary};
pub use validate::{execute_validate, ValidateSummary};

use crate::cli::CliError;
use crate::io::ReportWriterError;
use cmx_fs::FsError;
use thiserror::Error;

/// Errors from command execution.
///
/// Only preconditions and the final report write surface here; every
/// failure scoped to a single (fixture, format) pair becomes data in
/// its CaseRecord and never aborts the matrix.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] CliError),

    #[error("tool binary not found: {0}")]
    ToolMissing(String),

    #[error("filesystem error: {0}")]
    Filesystem(#[from] FsError),

    #[error("report error: {0}")]
    Report(#[from] ReportWriterError),
}

/// Result of command execution.
pub type CommandResult<T> = Result<T, CommandError>;
