//! Installed-apps record and line parser
//!
//! Each input line carries five tab-separated fields:
//!
//! ```text
//! <category>\t<device id>\t<latitude>\t<longitude>\t<app id>,<app id>,...
//! ```

use std::fmt;

use crate::error::ParseError;

/// How app id tokens that are not valid `u32` values are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppIdPolicy {
    /// Invalid tokens become `0` in place
    ///
    /// Empty, non-numeric, negative and overflowing tokens are all coerced.
    /// This mirrors how existing producers' files have always been loaded.
    #[default]
    Lenient,

    /// Invalid tokens fail the whole line with `ParseError::BadAppId`
    Strict,
}

/// A device and the apps installed on it
#[derive(Debug, Clone, PartialEq)]
pub struct AppsInstalled {
    /// Device/platform type; selects the partition
    pub category: String,
    /// Opaque device identifier
    pub id: String,
    /// Latitude, always finite
    pub latitude: f64,
    /// Longitude, always finite
    pub longitude: f64,
    /// Installed app ids, in line order
    pub app_ids: Vec<u32>,
}

impl AppsInstalled {
    /// Storage key for this record (`category:id`)
    #[inline]
    pub fn key(&self) -> String {
        crate::storage_key(&self.category, &self.id)
    }
}

impl fmt::Display for AppsInstalled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} lat={} lon={} apps={:?}",
            self.category, self.id, self.latitude, self.longitude, self.app_ids
        )
    }
}

/// Parse a line with the lenient app id policy
///
/// This is the parser the pipeline uses.
#[inline]
pub fn parse_line(line: &str) -> Result<AppsInstalled, ParseError> {
    parse_line_with(line, AppIdPolicy::Lenient)
}

/// Parse a line with an explicit app id policy
pub fn parse_line_with(line: &str, policy: AppIdPolicy) -> Result<AppsInstalled, ParseError> {
    let mut fields = line.split('\t');
    let mut parts: [&str; crate::FIELD_COUNT] = [""; crate::FIELD_COUNT];
    for (i, slot) in parts.iter_mut().enumerate() {
        *slot = fields.next().ok_or_else(|| ParseError::malformed(i))?;
    }
    let [category, id, lat, lon, apps] = parts;

    if category.is_empty() {
        return Err(ParseError::missing_identity("category"));
    }
    if id.is_empty() {
        return Err(ParseError::missing_identity("id"));
    }

    let latitude = parse_coordinate("latitude", lat)?;
    let longitude = parse_coordinate("longitude", lon)?;
    let app_ids = parse_app_ids(apps, policy)?;

    Ok(AppsInstalled {
        category: category.to_string(),
        id: id.to_string(),
        latitude,
        longitude,
        app_ids,
    })
}

fn parse_coordinate(field: &'static str, raw: &str) -> Result<f64, ParseError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::bad_coordinate(field, raw)),
    }
}

fn parse_app_ids(raw: &str, policy: AppIdPolicy) -> Result<Vec<u32>, ParseError> {
    raw.split(',')
        .enumerate()
        .map(|(position, token)| match (token.parse::<u32>(), policy) {
            (Ok(v), _) => Ok(v),
            (Err(_), AppIdPolicy::Lenient) => Ok(0),
            (Err(_), AppIdPolicy::Strict) => Err(ParseError::BadAppId {
                position,
                token: token.to_string(),
            }),
        })
        .collect()
}

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;
