//! Keyed payload handed from ingestion workers to sink workers

use bytes::Bytes;

use crate::codec;
use crate::record::AppsInstalled;

/// Storage key for a device: `category:id`
///
/// Colons inside either part are not escaped.
#[inline]
pub fn storage_key(category: &str, id: &str) -> String {
    let mut key = String::with_capacity(category.len() + id.len() + 1);
    key.push_str(category);
    key.push(':');
    key.push_str(id);
    key
}

/// Encoded record ready for a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Storage key (`category:id`)
    pub key: String,
    /// Encoded `UserApps` message
    pub value: Bytes,
}

impl Payload {
    /// Encode a record into a payload
    pub fn from_record(record: &AppsInstalled) -> Self {
        Self {
            key: record.key(),
            value: codec::encode(record),
        }
    }

    /// Size of the encoded value in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the encoded value is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
