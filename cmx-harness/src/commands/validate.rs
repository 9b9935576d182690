//! Validate command orchestration.
//!
//! Runs the output validator on a single existing artifact, outside a
//! matrix run. Useful for inspecting one captured output by hand.

use cmx_fs::Filesystem;
use cmx_schema::Format;

use crate::cli::ValidateArgs;
use crate::logger::Logger;
use crate::validator::validate;

use super::CommandResult;

/// Result of validate command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateSummary {
    pub format: Format,
    pub valid: bool,
    pub message: String,
}

/// Execute the validate command.
///
/// An invalid artifact is not a command error; the caller maps the
/// verdict to the process exit code.
pub fn execute_validate<F, L>(
    args: &ValidateArgs,
    fs: &F,
    logger: &L,
) -> CommandResult<ValidateSummary>
where
    F: Filesystem,
    L: Logger,
{
    let verdict = validate(fs, &args.file, args.format);

    let status = if verdict.valid { "valid" } else { "invalid" };
    logger.info(&format!(
        "{}: {} ({}) - {}",
        args.file.display(),
        status,
        args.format,
        verdict.message
    ));

    Ok(ValidateSummary {
        format: args.format,
        valid: verdict.valid,
        message: verdict.message,
    })
}
