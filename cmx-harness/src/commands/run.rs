//! Run command orchestration.
//!
//! Drives the full fixture x format matrix: execute, validate, record,
//! then persist the aggregate report. Each pair runs to completion
//! before the next begins; pair failures are recorded as data and
//! never abort the matrix.

use std::path::PathBuf;

use cmx_clock::Clock;
use cmx_fs::Filesystem;
use cmx_schema::{CaseRecord, Report};

use crate::cli::RunArgs;
use crate::discovery::discover_fixtures;
use crate::executor::{CaseExecutor, ToolRunner};
use crate::io::ReportWriter;
use crate::logger::Logger;
use crate::validator::{validate, ValidationVerdict};

use super::{CommandError, CommandResult};

/// Result of run command execution.
#[derive(Debug)]
pub struct RunSummary {
    /// Number of fixtures discovered.
    pub fixture_count: usize,
    /// Total (fixture, format) pairs executed.
    pub total: usize,
    /// Pairs whose child process exited with status zero.
    pub success_count: usize,
    /// Pairs that also passed format validation.
    pub valid_count: usize,
    /// Path of the persisted report.
    pub report_path: PathBuf,
}

/// Execute the run command.
///
/// Fatal errors are limited to preconditions (tool binary missing,
/// output directory not creatable, bad pattern) and the final report
/// write. Zero fixtures is a warning: the matrix is skipped and an
/// empty report is still written.
pub fn execute_run<R, F, C, L>(
    args: &RunArgs,
    runner: &R,
    fs: &F,
    clock: &C,
    logger: &L,
) -> CommandResult<RunSummary>
where
    R: ToolRunner,
    F: Filesystem,
    C: Clock,
    L: Logger,
{
    let pattern = args.compiled_pattern()?;

    if !fs.exists(&args.tool) {
        return Err(CommandError::ToolMissing(args.tool.display().to_string()));
    }

    fs.create_dir_all(&args.out_dir)?;

    let fixtures = discover_fixtures(fs, &args.fixture_dir, &pattern)?;
    let formats = args.effective_formats();

    let mut report = Report::new();

    if fixtures.is_empty() {
        logger.warn(&format!(
            "no fixtures matching '{}' found in {}",
            args.pattern,
            args.fixture_dir.display()
        ));
    } else {
        logger.info(&format!(
            "Running {} cases ({} fixtures x {} formats)",
            fixtures.len() * formats.len(),
            fixtures.len(),
            formats.len()
        ));

        let executor = CaseExecutor::new(runner, fs, clock, &args.out_dir);

        for fixture in &fixtures {
            logger.info(&format!("Testing {}:", fixture.id));

            for &format in &formats {
                let execution = executor.execute(&args.tool, fixture, format);

                // A failed execution is never validated; the synthetic
                // verdict keeps `valid == false` for every failure.
                let verdict = if execution.success {
                    validate(fs, &execution.stdout_path, format)
                } else {
                    ValidationVerdict::execution_failed()
                };

                log_case(logger, format.label(), &execution, &verdict);

                report.record(CaseRecord {
                    test_name: fixture.id.clone(),
                    format,
                    success: execution.success,
                    valid: verdict.valid,
                    time: execution.elapsed_secs,
                    message: verdict.message,
                });
            }
        }
    }

    let writer = ReportWriter::new(fs, &args.out_dir);
    let report_path = writer.write(&report)?;

    log_summary(logger, &report, &report_path);

    Ok(RunSummary {
        fixture_count: fixtures.len(),
        total: report.total,
        success_count: report.success,
        valid_count: report.valid_count(),
        report_path,
    })
}

/// Stream one progress line per completed pair.
fn log_case<L: Logger>(
    logger: &L,
    label: &str,
    execution: &crate::executor::ExecutionResult,
    verdict: &ValidationVerdict,
) {
    let status = if !execution.success {
        "FAIL"
    } else if verdict.valid {
        "OK"
    } else {
        "INVALID"
    };

    logger.info(&format!(
        "  {}: {} ({:.3}s) - {}",
        label, status, execution.elapsed_secs, verdict.message
    ));

    if !execution.success {
        for line in execution.stderr_text.lines() {
            if !line.trim().is_empty() {
                logger.verbose(&format!("    {}", line));
            }
        }
    }
}

fn log_summary<L: Logger>(logger: &L, report: &Report, report_path: &std::path::Path) {
    logger.info("");
    logger.info("Test report:");
    logger.info(&format!("  Total cases: {}", report.total));
    logger.info(&format!(
        "  Executed successfully: {} ({:.1}%)",
        report.success,
        percentage(report.success, report.total)
    ));
    logger.info(&format!(
        "  Valid output: {} ({:.1}%)",
        report.valid_count(),
        percentage(report.valid_count(), report.total)
    ));
    logger.info(&format!("  Report saved to: {}", report_path.display()));
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
