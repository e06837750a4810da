//! memc-load Protocol - Records, parsing and the value codec
//!
//! This crate provides the types that flow through the pipeline:
//! - `AppsInstalled` - One parsed log line (device + installed apps)
//! - `parse_line` - Tab-separated line parser with a named app id policy
//! - `codec` - Protobuf `UserApps` encoding of record values
//! - `Payload` - Keyed, encoded record handed to sinks
//!
//! # Example
//!
//! ```
//! use memc_protocol::{Payload, codec, parse_line};
//!
//! let record = parse_line("idfa\t1rfw452y52g2gq4g\t55.55\t42.42\t1423,43").unwrap();
//! let payload = Payload::from_record(&record);
//! assert_eq!(payload.key, "idfa:1rfw452y52g2gq4g");
//!
//! let value = codec::decode_value(&payload.value).unwrap();
//! assert_eq!(value.apps, vec![1423, 43]);
//! ```

pub mod codec;
mod error;
mod payload;
mod record;

pub use codec::UserApps;
pub use error::{CodecError, ParseError};
pub use payload::{Payload, storage_key};
pub use record::{AppIdPolicy, AppsInstalled, parse_line, parse_line_with};

// Re-export bytes for convenience
pub use bytes::Bytes;

/// Number of tab-separated fields a record line must have
pub const FIELD_COUNT: usize = 5;
