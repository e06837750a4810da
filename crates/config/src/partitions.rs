//! Category → memcached address map

use std::collections::BTreeMap;

use memc_routing::{PartitionTable, PartitionTableBuilder};
use serde::Deserialize;

use crate::Result;

/// Partition map
///
/// A `[partitions]` section replaces the defaults entirely; it is not
/// merged with them.
///
/// ```toml
/// [partitions]
/// idfa = "127.0.0.1:33013"
/// gaid = "127.0.0.1:33014"
/// adid = "127.0.0.1:33015"
/// dvid = "127.0.0.1:33016"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PartitionsConfig(BTreeMap<String, String>);

impl Default for PartitionsConfig {
    fn default() -> Self {
        Self(
            [
                ("idfa", "127.0.0.1:33013"),
                ("gaid", "127.0.0.1:33014"),
                ("adid", "127.0.0.1:33015"),
                ("dvid", "127.0.0.1:33016"),
            ]
            .into_iter()
            .map(|(category, address)| (category.to_string(), address.to_string()))
            .collect(),
        )
    }
}

impl PartitionsConfig {
    /// Point a category at an address, adding it if missing
    pub fn set(&mut self, category: impl Into<String>, address: impl Into<String>) {
        self.0.insert(category.into(), address.into());
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.0.get(category).map(String::as_str)
    }

    /// Iterate `(category, address)` sorted by category
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(c, a)| (c.as_str(), a.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compile into the runtime partition registry
    pub fn to_table(&self) -> Result<PartitionTable> {
        let mut builder = PartitionTableBuilder::new();
        for (category, address) in self.iter() {
            builder.register(category, address)?;
        }
        Ok(builder.build())
    }
}
