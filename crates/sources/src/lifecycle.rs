//! Processed-file marking
//!
//! A loaded file is renamed in place with a leading dot so later runs skip
//! it. The rename happens whatever the run's verdict was.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::FileError;

/// Whether the file name starts with `.`
pub fn is_processed(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().starts_with(b"."))
}

/// `dir/name` → `dir/.name`, or `None` when the path has no file name
pub fn processed_path(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let mut dotted = OsString::with_capacity(name.len() + 1);
    dotted.push(".");
    dotted.push(name);
    Some(path.with_file_name(dotted))
}

/// Rename a file to its processed name and return the new path
pub fn mark_processed(path: impl AsRef<Path>) -> Result<PathBuf, FileError> {
    let from = path.as_ref();
    let to = processed_path(from).ok_or_else(|| FileError::Rename {
        from: from.to_path_buf(),
        to: from.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;

    std::fs::rename(from, &to).map_err(|source| FileError::Rename {
        from: from.to_path_buf(),
        to: to.clone(),
        source,
    })?;

    tracing::debug!(from = %from.display(), to = %to.display(), "marked file processed");
    Ok(to)
}
