//! Input file discovery

use std::path::PathBuf;

use glob::{MatchOptions, PatternError};

use crate::is_processed;

/// Expand `pattern` into the files still waiting to be loaded
///
/// Results are sorted by path. Dot-files are never returned, even when the
/// pattern names them explicitly, and neither are directories. Entries that
/// cannot be read are logged and skipped.
pub fn discover_files(pattern: &str) -> Result<Vec<PathBuf>, PatternError> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(pattern, options)? {
        match entry {
            Ok(path) if is_processed(&path) || path.is_dir() => {}
            Ok(path) => files.push(path),
            Err(e) => {
                tracing::warn!(
                    path = %e.path().display(),
                    error = %e.error(),
                    "skipping unreadable path"
                );
            }
        }
    }

    files.sort();
    Ok(files)
}
