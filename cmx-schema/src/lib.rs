//! CMX Report Schema
//!
//! Defines the output format set and the structured report written by
//! the conformance harness.

mod report;

pub use report::{CaseRecord, Format, FormatParseError, Report, FORMAT_ORDER};
