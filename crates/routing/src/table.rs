//! Partition table: category → memcached address
//!
//! Compiled once at startup. Lookups are a single `HashMap` probe returning
//! a `Copy` id, so the ingest hot path never clones strings.

use std::collections::HashMap;

use crate::{PartitionId, Result, RoutingError};

/// Check that an address is `host:port` with a non-empty host and a u16 port
pub fn is_valid_address(address: &str) -> bool {
    match address.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}

/// One registered partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub id: PartitionId,
    pub category: String,
    pub address: String,
}

/// Immutable category → partition registry
#[derive(Debug, Clone, Default)]
pub struct PartitionTable {
    ids: HashMap<String, PartitionId>,
    partitions: Vec<Partition>,
}

impl PartitionTable {
    /// Find the partition for a category (exact, case-sensitive match)
    #[inline]
    pub fn lookup(&self, category: &str) -> Result<PartitionId> {
        self.ids
            .get(category)
            .copied()
            .ok_or_else(|| RoutingError::unknown_category(category))
    }

    /// Get a partition by id
    #[inline]
    pub fn partition(&self, id: PartitionId) -> Option<&Partition> {
        self.partitions.get(id.as_usize())
    }

    /// Iterate partitions in id order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

/// Builder that validates registrations before freezing the table
#[derive(Debug, Default)]
pub struct PartitionTableBuilder {
    table: PartitionTable,
}

impl PartitionTableBuilder {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category served at `address`
    ///
    /// # Errors
    ///
    /// Fails on an empty or duplicate category, a malformed address, or
    /// when the id space is exhausted.
    pub fn register(
        &mut self,
        category: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<PartitionId> {
        let category = category.into();
        let address = address.into();

        if category.is_empty() {
            return Err(RoutingError::EmptyCategory);
        }
        if self.table.ids.contains_key(&category) {
            return Err(RoutingError::duplicate_category(category));
        }
        if !is_valid_address(&address) {
            return Err(RoutingError::invalid_address(category, address));
        }

        let index = u16::try_from(self.table.partitions.len()).map_err(|_| {
            RoutingError::TooManyPartitions {
                max: PartitionId::MAX as usize,
            }
        })?;
        let id = PartitionId::new(index);

        self.table.ids.insert(category.clone(), id);
        self.table.partitions.push(Partition {
            id,
            category,
            address,
        });
        Ok(id)
    }

    /// Freeze the table
    #[must_use]
    pub fn build(self) -> PartitionTable {
        self.table
    }
}

impl PartitionTable {
    /// Build a table from `(category, address)` pairs in iteration order
    pub fn from_pairs<I, C, A>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, A)>,
        C: Into<String>,
        A: Into<String>,
    {
        let mut builder = PartitionTableBuilder::new();
        for (category, address) in pairs {
            builder.register(category, address)?;
        }
        Ok(builder.build())
    }
}
