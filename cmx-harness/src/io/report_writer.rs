//! Report writer for the final aggregate artifact.
//!
//! Writes `test_report.json` to the output directory: the only
//! run-fatal IO after the matrix has started.

use std::path::{Path, PathBuf};

use thiserror::Error;

use cmx_fs::{Filesystem, FsError};
use cmx_schema::Report;

/// File name of the final report artifact.
pub const REPORT_FILE_NAME: &str = "test_report.json";

/// Errors from report writing.
#[derive(Debug, Error)]
pub enum ReportWriterError {
    #[error("failed to write {file}: {source}")]
    Write {
        file: String,
        #[source]
        source: FsError,
    },
}

/// Writer for the final report artifact.
pub struct ReportWriter<'a, F: Filesystem> {
    fs: &'a F,
    out_dir: &'a Path,
}

impl<'a, F: Filesystem> ReportWriter<'a, F> {
    /// Create a new report writer.
    pub fn new(fs: &'a F, out_dir: &'a Path) -> Self {
        Self { fs, out_dir }
    }

    /// Get the path for the report artifact.
    pub fn report_path(&self) -> PathBuf {
        self.out_dir.join(REPORT_FILE_NAME)
    }

    /// Write the report as pretty-printed JSON.
    pub fn write(&self, report: &Report) -> Result<PathBuf, ReportWriterError> {
        let path = self.report_path();
        self.fs
            .write_atomic(&path, report.to_json().as_bytes())
            .map_err(|e| ReportWriterError::Write {
                file: REPORT_FILE_NAME.to_string(),
                source: e,
            })?;
        Ok(path)
    }
}
