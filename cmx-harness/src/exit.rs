//! Exit codes for the CMX CLI.
//!
//! Following Unix conventions for exit codes.

use crate::commands::CommandError;

/// Exit code constants.
pub mod codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Invalid arguments.
    pub const INVALID_ARGS: i32 = 1;
    /// IO error.
    pub const IO_ERROR: i32 = 2;
    /// Tool binary under test not found.
    pub const TOOL_MISSING: i32 = 3;
    /// Final report could not be written.
    pub const REPORT_ERROR: i32 = 4;
    /// Single-artifact validation verdict was invalid.
    pub const INVALID_OUTPUT: i32 = 5;
}

/// Map a CommandError to an exit code.
pub fn exit_code(error: &CommandError) -> i32 {
    match error {
        CommandError::InvalidArgument(_) => codes::INVALID_ARGS,
        CommandError::ToolMissing(_) => codes::TOOL_MISSING,
        CommandError::Filesystem(_) => codes::IO_ERROR,
        CommandError::Report(_) => codes::REPORT_ERROR,
    }
}
