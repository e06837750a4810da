//! Gzip line reader

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::FileError;

/// Decompressed read buffer size
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Spaces and line terminators; tabs separate fields and are kept
#[inline]
fn is_line_padding(c: char) -> bool {
    matches!(c, ' ' | '\r' | '\n')
}

/// Streams trimmed, non-blank lines from a gzip file
///
/// Only spaces and line terminators are trimmed, so empty leading or
/// trailing fields survive.
///
/// Concatenated gzip members are read as one stream. Bytes that are not
/// valid UTF-8 are replaced, so a corrupt line still reaches the parser
/// and is counted there. The first read error is yielded once and ends
/// the stream.
pub struct GzipLines {
    path: PathBuf,
    reader: BufReader<MultiGzDecoder<File>>,
    buf: Vec<u8>,
    finished: bool,
}

impl GzipLines {
    /// Open a file and validate its gzip header
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| FileError::open(&path, e))?;

        let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, MultiGzDecoder::new(file));
        // Forces the header to be parsed now instead of on the first line
        reader
            .fill_buf()
            .map_err(|e| FileError::decompress(&path, e))?;

        Ok(Self {
            path,
            reader,
            buf: Vec::with_capacity(256),
            finished: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for GzipLines {
    type Item = Result<String, FileError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.finished = true,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&self.buf);
                    let line = line.trim_matches(is_line_padding);
                    if !line.is_empty() {
                        return Some(Ok(line.to_string()));
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(FileError::decompress(&self.path, e)));
                }
            }
        }
        None
    }
}

impl std::fmt::Debug for GzipLines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GzipLines")
            .field("path", &self.path)
            .field("finished", &self.finished)
            .finish()
    }
}
