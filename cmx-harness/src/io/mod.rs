//! IO helpers for the harness.

pub mod report_writer;

pub use report_writer::{ReportWriter, ReportWriterError, REPORT_FILE_NAME};
