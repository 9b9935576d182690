//! Format, CaseRecord and Report types for CMX.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical matrix order for formats.
///
/// The matrix runner enumerates formats in this order for every
/// fixture, so report ordering is stable across runs.
pub const FORMAT_ORDER: [Format; 4] = [Format::Json, Format::Human, Format::Hex, Format::Binary];

/// Output encoding the tool under test can produce.
///
/// Closed set: an unrecognized label is a configuration error at CLI
/// parse time, never a runtime case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Human,
    Hex,
    Binary,
}

/// Error from parsing a format label.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown format '{0}', expected one of: json, human, hex, binary")]
pub struct FormatParseError(pub String);

impl Format {
    /// The label passed to the tool under test as its second argument.
    pub fn label(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Human => "human",
            Format::Hex => "hex",
            Format::Binary => "binary",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Format {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "human" => Ok(Format::Human),
            "hex" => Ok(Format::Hex),
            "binary" => Ok(Format::Binary),
            other => Err(FormatParseError(other.to_string())),
        }
    }
}

/// Flattened result of one (fixture, format) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Fixture identifier (file name with extension stripped).
    pub test_name: String,
    pub format: Format,
    /// True iff the child process exited with status zero.
    pub success: bool,
    /// True iff the captured output conformed to the declared format.
    /// Always false when `success` is false.
    pub valid: bool,
    /// Wall-clock seconds bracketing the child process lifetime.
    pub time: f64,
    pub message: String,
}

/// Aggregate report over the full fixture × format matrix.
///
/// `success` counts execution successes (exit status zero),
/// independent of the validation verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub total: usize,
    pub success: usize,
    pub results: Vec<CaseRecord>,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, updating the counters.
    pub fn record(&mut self, record: CaseRecord) {
        self.total += 1;
        if record.success {
            self.success += 1;
        }
        self.results.push(record);
    }

    /// Count of records that both executed and validated.
    pub fn valid_count(&self) -> usize {
        self.results.iter().filter(|r| r.valid).count()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("Report serialization should never fail")
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
