//! memc-load Sources - Input log files
//!
//! Everything that touches input files lives here:
//!
//! - **Discovery** - `discover_files` expands a glob into a sorted file list,
//!   skipping dot-files (already processed)
//! - **Reading** - `GzipLines` streams trimmed, non-blank lines out of a
//!   (possibly multi-member) gzip file
//! - **Lifecycle** - `mark_processed` renames `dir/name` to `dir/.name`
//!
//! All I/O here is blocking; the pipeline runs it on a blocking thread.
//!
//! # Example
//!
//! ```no_run
//! use memc_sources::{GzipLines, discover_files, mark_processed};
//!
//! for path in discover_files("/data/appsinstalled/*.tsv.gz")? {
//!     for line in GzipLines::open(&path)? {
//!         println!("{}", line?);
//!     }
//!     mark_processed(&path)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod discovery;
mod error;
mod gzip;
mod lifecycle;

pub use discovery::discover_files;
pub use error::FileError;
pub use gzip::GzipLines;
pub use lifecycle::{is_processed, mark_processed, processed_path};
