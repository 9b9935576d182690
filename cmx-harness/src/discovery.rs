//! Fixture discovery.
//!
//! Locates candidate input files in a directory by glob pattern and
//! derives stable fixture identifiers from their names.

use std::path::{Path, PathBuf};

use glob::Pattern;

use cmx_fs::{Filesystem, FsError};

/// One input file driving a column of the test matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Identifier derived from the file name, extension stripped.
    pub id: String,
    pub path: PathBuf,
}

/// Discover fixture files in `dir` matching `pattern`.
///
/// Results are ordered lexicographically by path so the matrix order
/// is stable across runs. An absent or empty directory yields an empty
/// list; the caller decides whether that warrants a warning.
pub fn discover_fixtures<F: Filesystem>(
    fs: &F,
    dir: &Path,
    pattern: &Pattern,
) -> Result<Vec<Fixture>, FsError> {
    let files = fs.list_matching(dir, pattern)?;

    Ok(files
        .into_iter()
        .map(|path| Fixture {
            id: fixture_id(&path),
            path,
        })
        .collect())
}

/// Derive a fixture identifier from its file name.
fn fixture_id(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("fixture")
        .to_string()
}
