//! memc-load Routing - Category to partition registry
//!
//! Every device category (`idfa`, `gaid`, ...) is served by exactly one
//! memcached instance. The `PartitionTable` is compiled once at startup from
//! configuration and never changes during a run.
//!
//! # Design
//!
//! - `PartitionId` is a dense `Copy` index assigned in registration order
//! - `lookup()` maps a category to its id with a single hash lookup
//! - Callers index their own per-partition state (queues, workers) by id
//!
//! # Example
//!
//! ```
//! use memc_routing::{PartitionId, PartitionTableBuilder};
//!
//! let mut builder = PartitionTableBuilder::new();
//! builder.register("idfa", "127.0.0.1:33013").unwrap();
//! builder.register("gaid", "127.0.0.1:33014").unwrap();
//! let table = builder.build();
//!
//! assert_eq!(table.lookup("gaid").unwrap(), PartitionId::new(1));
//! assert!(table.lookup("unknown_type").is_err());
//! ```

mod error;
mod partition_id;
mod table;

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

pub use error::{Result, RoutingError};
pub use partition_id::PartitionId;
pub use table::{Partition, PartitionTable, PartitionTableBuilder, is_valid_address};
