//! Output validator.
//!
//! Format-specific conformance checks on captured stdout artifacts.
//! Validation failure is ordinary data: this module never returns an
//! error, it returns a verdict.

use std::path::Path;

use cmx_fs::Filesystem;
use cmx_schema::Format;

/// Verdict on one captured output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub valid: bool,
    pub message: String,
}

impl ValidationVerdict {
    fn valid(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }

    /// Synthetic verdict recorded when execution failed and the
    /// validator was never invoked.
    pub fn execution_failed() -> Self {
        Self::invalid("execution failed")
    }
}

/// Validate a captured stdout artifact against its declared format.
///
/// Invoked only for successful executions. A missing artifact is a
/// validation failure, not a crash.
pub fn validate<F: Filesystem>(fs: &F, artifact: &Path, format: Format) -> ValidationVerdict {
    let bytes = match fs.read_bytes(artifact) {
        Ok(bytes) => bytes,
        Err(_) => {
            return ValidationVerdict::invalid(format!(
                "output artifact not found: {}",
                artifact.display()
            ))
        }
    };

    match format {
        // `human` is a presentation variant of the same structured
        // document, so both formats share the well-formedness rule.
        Format::Json | Format::Human => validate_json(&bytes),
        Format::Hex => validate_hex(&bytes),
        Format::Binary => validate_binary(&bytes),
    }
}

fn validate_json(bytes: &[u8]) -> ValidationVerdict {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(_) => ValidationVerdict::valid("well-formed JSON document"),
        Err(e) => ValidationVerdict::invalid(format!("malformed JSON: {}", e)),
    }
}

fn validate_hex(bytes: &[u8]) -> ValidationVerdict {
    // Invalid UTF-8 is replaced, not fatal; the replacement character
    // is not a hex digit, so undecodable content fails the check.
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();

    if trimmed.is_empty() {
        // All-whitespace output is valid hex of length zero.
        return ValidationVerdict::valid("empty hex output (0 digits)");
    }

    if trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        ValidationVerdict::valid(format!("valid hex ({} digits)", trimmed.len()))
    } else {
        ValidationVerdict::invalid("contains non-hex characters")
    }
}

fn validate_binary(bytes: &[u8]) -> ValidationVerdict {
    if bytes.is_empty() {
        ValidationVerdict::invalid("binary output is empty (0 bytes)")
    } else {
        ValidationVerdict::valid(format!("binary content of {} bytes", bytes.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmx_fs::MockFilesystem;
    use std::path::PathBuf;

    fn fs_with(path: &str, content: &[u8]) -> MockFilesystem {
        let fs = MockFilesystem::new();
        fs.add_file(PathBuf::from(path), content.to_vec());
        fs
    }

    // ===========================================
    // JSON / Human Tests
    // ===========================================

    #[test]
    fn test_json_object_is_valid() {
        let fs = fs_with("/out/a.out", br#"{"n":1}"#);
        let verdict = validate(&fs, Path::new("/out/a.out"), Format::Json);
        assert!(verdict.valid);
    }

    #[test]
    fn test_json_array_and_scalar_are_valid() {
        let fs = fs_with("/out/arr.out", b"[1,2,3]");
        assert!(validate(&fs, Path::new("/out/arr.out"), Format::Json).valid);

        let fs = fs_with("/out/scalar.out", b"\"x\"");
        assert!(validate(&fs, Path::new("/out/scalar.out"), Format::Json).valid);
    }

    #[test]
    fn test_json_truncated_is_invalid() {
        let fs = fs_with("/out/a.out", br#"{"a":"#);
        let verdict = validate(&fs, Path::new("/out/a.out"), Format::Json);
        assert!(!verdict.valid);
        assert!(verdict.message.contains("malformed JSON"));
    }

    #[test]
    fn test_human_shares_json_rule() {
        let fs = fs_with("/out/a.out", b"{\n  \"n\": 1\n}\n");
        assert!(validate(&fs, Path::new("/out/a.out"), Format::Human).valid);

        let fs = fs_with("/out/b.out", b"not json at all");
        assert!(!validate(&fs, Path::new("/out/b.out"), Format::Human).valid);
    }

    // ===========================================
    // Hex Tests
    // ===========================================

    #[test]
    fn test_hex_digits_are_valid() {
        let fs = fs_with("/out/a.out", b"0a1b2c3d");
        let verdict = validate(&fs, Path::new("/out/a.out"), Format::Hex);
        assert!(verdict.valid);
        assert!(verdict.message.contains("8 digits"));
    }

    #[test]
    fn test_hex_mixed_case_is_valid() {
        let fs = fs_with("/out/a.out", b"DeadBEEF0123");
        assert!(validate(&fs, Path::new("/out/a.out"), Format::Hex).valid);
    }

    #[test]
    fn test_hex_trailing_newline_is_trimmed() {
        let fs = fs_with("/out/a.out", b"0a1b2c3d\n");
        assert!(validate(&fs, Path::new("/out/a.out"), Format::Hex).valid);
    }

    #[test]
    fn test_hex_non_hex_characters_are_invalid() {
        let fs = fs_with("/out/a.out", b"0a1bzz");
        let verdict = validate(&fs, Path::new("/out/a.out"), Format::Hex);
        assert!(!verdict.valid);
        assert!(verdict.message.contains("non-hex"));
    }

    #[test]
    fn test_hex_empty_output_is_valid_zero_digits() {
        // Deliberate edge case: vacuous truth over zero characters.
        let fs = fs_with("/out/a.out", b"");
        let verdict = validate(&fs, Path::new("/out/a.out"), Format::Hex);
        assert!(verdict.valid);
        assert!(verdict.message.contains("empty hex"));
    }

    #[test]
    fn test_hex_whitespace_only_is_valid() {
        let fs = fs_with("/out/a.out", b"  \n\t ");
        assert!(validate(&fs, Path::new("/out/a.out"), Format::Hex).valid);
    }

    #[test]
    fn test_hex_invalid_utf8_is_invalid() {
        // Replacement characters are not hex digits.
        let fs = fs_with("/out/a.out", &[0xff, 0xfe, 0x30]);
        assert!(!validate(&fs, Path::new("/out/a.out"), Format::Hex).valid);
    }

    // ===========================================
    // Binary Tests
    // ===========================================

    #[test]
    fn test_binary_nonempty_is_valid_with_count() {
        let fs = fs_with("/out/a.out", &[1, 2, 3, 4, 5]);
        let verdict = validate(&fs, Path::new("/out/a.out"), Format::Binary);
        assert!(verdict.valid);
        assert!(verdict.message.contains("5 bytes"));
    }

    #[test]
    fn test_binary_empty_is_invalid() {
        let fs = fs_with("/out/a.out", b"");
        let verdict = validate(&fs, Path::new("/out/a.out"), Format::Binary);
        assert!(!verdict.valid);
        assert!(verdict.message.contains("0 bytes"));
    }

    #[test]
    fn test_binary_content_is_not_inspected() {
        // Any nonzero length passes, regardless of content.
        let fs = fs_with("/out/a.out", &[0u8]);
        assert!(validate(&fs, Path::new("/out/a.out"), Format::Binary).valid);
    }

    // ===========================================
    // Shared Edge Cases
    // ===========================================

    #[test]
    fn test_missing_artifact_is_validation_failure() {
        let fs = MockFilesystem::new();
        for format in cmx_schema::FORMAT_ORDER {
            let verdict = validate(&fs, Path::new("/out/gone.out"), format);
            assert!(!verdict.valid);
            assert!(verdict.message.contains("not found"));
        }
    }

    #[test]
    fn test_execution_failed_verdict() {
        let verdict = ValidationVerdict::execution_failed();
        assert!(!verdict.valid);
        assert_eq!(verdict.message, "execution failed");
    }
}
