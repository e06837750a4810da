//! File error types

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that abort processing of one input file
#[derive(Debug, Error)]
pub enum FileError {
    /// File could not be opened
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Gzip header or stream is invalid, or a read failed mid-stream
    #[error("failed to decompress {}: {source}", path.display())]
    Decompress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Marking the file as processed failed
    #[error("failed to rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    #[inline]
    pub fn open(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Open {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    #[inline]
    pub fn decompress(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Decompress {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Path of the input file this error is about
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Decompress { path, .. } => path,
            Self::Rename { from, .. } => from,
        }
    }
}
