//! Case executor.
//!
//! Invokes the tool under test with one (fixture, format) pair,
//! captures stdout/stderr as raw bytes, writes per-case artifacts and
//! measures wall-clock duration. Process spawning sits behind the
//! `ToolRunner` trait so the matrix is testable without child
//! processes.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use cmx_clock::{elapsed_secs, Clock};
use cmx_fs::Filesystem;
use cmx_schema::Format;

use crate::discovery::Fixture;

/// Error from failing to spawn the tool under test.
#[derive(Debug, Error)]
#[error("failed to spawn {tool}: {source}")]
pub struct SpawnError {
    pub tool: String,
    #[source]
    pub source: io::Error,
}

/// Raw captured output of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    /// True iff the child exited with status zero.
    pub exit_ok: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Trait for invoking the tool under test.
pub trait ToolRunner: Send + Sync {
    /// Run `<tool> <fixture> <format-label>` to completion and capture
    /// both output streams as raw bytes.
    fn run(&self, tool: &Path, fixture: &Path, format: Format) -> Result<RawOutput, SpawnError>;
}

/// Real runner using a child process per invocation.
///
/// The wait on the child is unbounded; no timeout is enforced.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandToolRunner;

impl ToolRunner for CommandToolRunner {
    fn run(&self, tool: &Path, fixture: &Path, format: Format) -> Result<RawOutput, SpawnError> {
        let output = Command::new(tool)
            .arg(fixture)
            .arg(format.label())
            .output()
            .map_err(|source| SpawnError {
                tool: tool.display().to_string(),
                source,
            })?;

        Ok(RawOutput {
            exit_ok: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Scripted response for the mock runner.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this output.
    Output(RawOutput),
    /// Fail as if the binary could not be spawned.
    SpawnFailure,
}

/// Mock runner for testing with scripted per-case responses.
///
/// Responses are keyed by (fixture file name, format). Unscripted
/// cases get a successful empty-output response.
#[derive(Debug, Clone, Default)]
pub struct MockToolRunner {
    responses: Arc<RwLock<HashMap<(String, Format), MockResponse>>>,
    invocations: Arc<RwLock<Vec<(PathBuf, Format)>>>,
}

impl MockToolRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an exit-zero invocation producing `stdout`.
    pub fn respond(&self, fixture_file: &str, format: Format, stdout: &[u8]) {
        self.script(
            fixture_file,
            format,
            MockResponse::Output(RawOutput {
                exit_ok: true,
                stdout: stdout.to_vec(),
                stderr: Vec::new(),
            }),
        );
    }

    /// Script a nonzero-exit invocation writing `stderr` diagnostics.
    pub fn respond_failure(&self, fixture_file: &str, format: Format, stderr: &[u8]) {
        self.script(
            fixture_file,
            format,
            MockResponse::Output(RawOutput {
                exit_ok: false,
                stdout: Vec::new(),
                stderr: stderr.to_vec(),
            }),
        );
    }

    /// Script a spawn failure.
    pub fn respond_spawn_failure(&self, fixture_file: &str, format: Format) {
        self.script(fixture_file, format, MockResponse::SpawnFailure);
    }

    /// Script an arbitrary response.
    pub fn script(&self, fixture_file: &str, format: Format, response: MockResponse) {
        self.responses
            .write()
            .unwrap()
            .insert((fixture_file.to_string(), format), response);
    }

    /// All (fixture path, format) invocations in call order.
    pub fn invocations(&self) -> Vec<(PathBuf, Format)> {
        self.invocations.read().unwrap().clone()
    }
}

impl ToolRunner for MockToolRunner {
    fn run(&self, tool: &Path, fixture: &Path, format: Format) -> Result<RawOutput, SpawnError> {
        self.invocations
            .write()
            .unwrap()
            .push((fixture.to_path_buf(), format));

        let file_name = fixture
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        match self.responses.read().unwrap().get(&(file_name, format)) {
            Some(MockResponse::Output(output)) => Ok(output.clone()),
            Some(MockResponse::SpawnFailure) => Err(SpawnError {
                tool: tool.display().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
            }),
            None => Ok(RawOutput {
                exit_ok: true,
                stdout: Vec::new(),
                stderr: Vec::new(),
            }),
        }
    }
}

/// Outcome of executing one (fixture, format) pair.
///
/// Produced exactly once per pair and never mutated afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// True iff the child exited with status zero and artifacts were
    /// written.
    pub success: bool,
    /// Wall-clock seconds bracketing spawn through exit.
    pub elapsed_secs: f64,
    pub stdout_path: PathBuf,
    pub stderr_path: PathBuf,
    /// Captured stderr decoded lossily, or the local diagnostic when
    /// the case failed before producing output.
    pub stderr_text: String,
}

/// Executes single cases and persists their artifacts.
pub struct CaseExecutor<'a, R: ToolRunner, F: Filesystem, C: Clock> {
    runner: &'a R,
    fs: &'a F,
    clock: &'a C,
    out_dir: &'a Path,
}

impl<'a, R: ToolRunner, F: Filesystem, C: Clock> CaseExecutor<'a, R, F, C> {
    pub fn new(runner: &'a R, fs: &'a F, clock: &'a C, out_dir: &'a Path) -> Self {
        Self {
            runner,
            fs,
            clock,
            out_dir,
        }
    }

    /// Path of the stdout artifact for a pair.
    pub fn stdout_path(&self, fixture_id: &str, format: Format) -> PathBuf {
        self.out_dir
            .join(format!("{}_{}.out", fixture_id, format.label()))
    }

    /// Path of the stderr artifact for a pair.
    pub fn stderr_path(&self, fixture_id: &str, format: Format) -> PathBuf {
        self.out_dir
            .join(format!("{}_{}.out.stderr", fixture_id, format.label()))
    }

    /// Execute one (fixture, format) pair.
    ///
    /// Never returns an error: every failure mode scoped to the pair
    /// (nonzero exit, spawn failure, artifact write failure) is folded
    /// into the returned result so the matrix continues.
    pub fn execute(&self, tool: &Path, fixture: &Fixture, format: Format) -> ExecutionResult {
        let stdout_path = self.stdout_path(&fixture.id, format);
        let stderr_path = self.stderr_path(&fixture.id, format);

        let start_ms = self.clock.now_unix_ms();
        let outcome = self.runner.run(tool, &fixture.path, format);
        let elapsed = elapsed_secs(start_ms, self.clock.now_unix_ms());

        match outcome {
            Ok(raw) => {
                let mut success = raw.exit_ok;
                let mut stderr_text = String::from_utf8_lossy(&raw.stderr).into_owned();

                // Capture is uniform across formats: stdout bytes go to
                // the artifact verbatim, binary included.
                if let Err(e) = self.fs.write_atomic(&stdout_path, &raw.stdout) {
                    success = false;
                    stderr_text = format!("failed to write stdout artifact: {}", e);
                }

                // The stderr artifact is written regardless of success
                // to preserve the diagnostic trail.
                if let Err(e) = self.fs.write_atomic(&stderr_path, &raw.stderr) {
                    success = false;
                    stderr_text = format!("failed to write stderr artifact: {}", e);
                }

                ExecutionResult {
                    success,
                    elapsed_secs: elapsed,
                    stdout_path,
                    stderr_path,
                    stderr_text,
                }
            }
            Err(e) => {
                // Spawn failure is fatal for this pair only; the
                // diagnostic goes through the stderr artifact channel.
                let message = e.to_string();
                let _ = self.fs.write_atomic(&stderr_path, message.as_bytes());

                ExecutionResult {
                    success: false,
                    elapsed_secs: elapsed,
                    stdout_path,
                    stderr_path,
                    stderr_text: message,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmx_clock::{AdvancingClock, MockClock};
    use cmx_fs::MockFilesystem;

    fn fixture(name: &str) -> Fixture {
        Fixture {
            id: name.to_string(),
            path: PathBuf::from(format!("/fixtures/{}.json", name)),
        }
    }

    // ===========================================
    // Artifact Path Tests
    // ===========================================

    #[test]
    fn test_artifact_paths_unique_per_pair() {
        let runner = MockToolRunner::new();
        let fs = MockFilesystem::new();
        let clock = MockClock::new(0);
        let executor = CaseExecutor::new(&runner, &fs, &clock, Path::new("/out"));

        assert_eq!(
            executor.stdout_path("sample", Format::Hex),
            PathBuf::from("/out/sample_hex.out")
        );
        assert_eq!(
            executor.stderr_path("sample", Format::Hex),
            PathBuf::from("/out/sample_hex.out.stderr")
        );
        assert_ne!(
            executor.stdout_path("sample", Format::Hex),
            executor.stdout_path("sample", Format::Json)
        );
    }

    // ===========================================
    // Execution Tests
    // ===========================================

    #[test]
    fn test_execute_success_writes_both_artifacts() {
        let runner = MockToolRunner::new();
        runner.respond("sample.json", Format::Hex, b"0a1b2c3d");
        let fs = MockFilesystem::new();
        let clock = MockClock::new(1000);
        let executor = CaseExecutor::new(&runner, &fs, &clock, Path::new("/out"));

        let result = executor.execute(Path::new("/bin/codec"), &fixture("sample"), Format::Hex);

        assert!(result.success);
        assert_eq!(
            fs.get_file(Path::new("/out/sample_hex.out")).unwrap(),
            b"0a1b2c3d"
        );
        // Empty stderr still produces an artifact.
        assert_eq!(
            fs.get_file(Path::new("/out/sample_hex.out.stderr")).unwrap(),
            b""
        );
    }

    #[test]
    fn test_execute_binary_stdout_is_verbatim() {
        let runner = MockToolRunner::new();
        let payload = [0u8, 159, 146, 150, 255];
        runner.respond("sample.json", Format::Binary, &payload);
        let fs = MockFilesystem::new();
        let clock = MockClock::new(0);
        let executor = CaseExecutor::new(&runner, &fs, &clock, Path::new("/out"));

        let result =
            executor.execute(Path::new("/bin/codec"), &fixture("sample"), Format::Binary);

        assert!(result.success);
        assert_eq!(
            fs.get_file(&result.stdout_path).unwrap(),
            payload.to_vec()
        );
    }

    #[test]
    fn test_execute_nonzero_exit_is_failure_with_stderr() {
        let runner = MockToolRunner::new();
        runner.respond_failure("broken.json", Format::Binary, b"decode error: bad block\n");
        let fs = MockFilesystem::new();
        let clock = MockClock::new(0);
        let executor = CaseExecutor::new(&runner, &fs, &clock, Path::new("/out"));

        let result =
            executor.execute(Path::new("/bin/codec"), &fixture("broken"), Format::Binary);

        assert!(!result.success);
        assert!(result.stderr_text.contains("decode error"));
        // Stderr artifact preserved for diagnostics.
        assert_eq!(
            fs.get_file(&result.stderr_path).unwrap(),
            b"decode error: bad block\n"
        );
    }

    #[test]
    fn test_execute_spawn_failure_is_failure_for_pair_only() {
        let runner = MockToolRunner::new();
        runner.respond_spawn_failure("sample.json", Format::Json);
        let fs = MockFilesystem::new();
        let clock = MockClock::new(0);
        let executor = CaseExecutor::new(&runner, &fs, &clock, Path::new("/out"));

        let result = executor.execute(Path::new("/bin/codec"), &fixture("sample"), Format::Json);

        assert!(!result.success);
        assert!(result.stderr_text.contains("failed to spawn"));
        // No stdout artifact, but the stderr artifact carries the message.
        assert!(fs.get_file(&result.stdout_path).is_none());
        let stderr = fs.get_file(&result.stderr_path).unwrap();
        assert!(String::from_utf8_lossy(&stderr).contains("failed to spawn"));
    }

    #[test]
    fn test_execute_measures_elapsed_time() {
        let runner = MockToolRunner::new();
        let fs = MockFilesystem::new();
        // Each clock reading advances 125ms: spawn..exit brackets one step.
        let clock = AdvancingClock::new(1000, 125);
        let executor = CaseExecutor::new(&runner, &fs, &clock, Path::new("/out"));

        let result = executor.execute(Path::new("/bin/codec"), &fixture("sample"), Format::Json);

        assert_eq!(result.elapsed_secs, 0.125);
    }

    #[test]
    fn test_execute_artifact_write_failure_fails_pair() {
        let runner = MockToolRunner::new();
        runner.respond("sample.json", Format::Json, b"{}");
        let fs = MockFilesystem::new();
        fs.fail_writes_to(PathBuf::from("/out/sample_json.out"));
        let clock = MockClock::new(0);
        let executor = CaseExecutor::new(&runner, &fs, &clock, Path::new("/out"));

        let result = executor.execute(Path::new("/bin/codec"), &fixture("sample"), Format::Json);

        assert!(!result.success);
        assert!(result.stderr_text.contains("failed to write stdout artifact"));
    }

    #[test]
    fn test_mock_runner_records_invocations() {
        let runner = MockToolRunner::new();
        let fs = MockFilesystem::new();
        let clock = MockClock::new(0);
        let executor = CaseExecutor::new(&runner, &fs, &clock, Path::new("/out"));

        executor.execute(Path::new("/bin/codec"), &fixture("a"), Format::Json);
        executor.execute(Path::new("/bin/codec"), &fixture("a"), Format::Hex);

        let invocations = runner.invocations();
        assert_eq!(invocations.len(), 2);
        assert_eq!(invocations[0].1, Format::Json);
        assert_eq!(invocations[1].1, Format::Hex);
    }
}
