//! Binary codec for stored values
//!
//! Values are protobuf `UserApps` messages, compatible with the schema
//! consumers already read:
//!
//! ```text
//! message UserApps {
//!     repeated uint32 apps = 1;
//!     optional double lat = 2;
//!     optional double lon = 3;
//! }
//! ```
//!
//! The category and device id live in the key, not the value.

use bytes::Bytes;
use prost::Message;

use crate::error::CodecError;
use crate::record::AppsInstalled;

/// Wire message stored under each device key
#[derive(Clone, PartialEq, prost::Message)]
pub struct UserApps {
    #[prost(uint32, repeated, packed = "false", tag = "1")]
    pub apps: Vec<u32>,
    #[prost(double, optional, tag = "2")]
    pub lat: Option<f64>,
    #[prost(double, optional, tag = "3")]
    pub lon: Option<f64>,
}

impl From<&AppsInstalled> for UserApps {
    fn from(record: &AppsInstalled) -> Self {
        Self {
            apps: record.app_ids.clone(),
            lat: Some(record.latitude),
            lon: Some(record.longitude),
        }
    }
}

/// Encode a record's value
///
/// Encoding into a `Vec` cannot fail.
pub fn encode(record: &AppsInstalled) -> Bytes {
    Bytes::from(UserApps::from(record).encode_to_vec())
}

/// Decode a stored value
pub fn decode_value(bytes: &[u8]) -> Result<UserApps, CodecError> {
    Ok(UserApps::decode(bytes)?)
}

/// Rebuild a full record from its storage key and value
///
/// The key is split at its first `:`. Ids that contain a colon survive,
/// categories that contain one do not (keys are not escaped).
pub fn decode(key: &str, bytes: &[u8]) -> Result<AppsInstalled, CodecError> {
    let (category, id) = key
        .split_once(':')
        .ok_or_else(|| CodecError::MalformedKey(key.to_string()))?;
    let value = decode_value(bytes)?;

    Ok(AppsInstalled {
        category: category.to_string(),
        id: id.to_string(),
        latitude: value.lat.unwrap_or_default(),
        longitude: value.lon.unwrap_or_default(),
        app_ids: value.apps,
    })
}
