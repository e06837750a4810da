//! memc-load Sinks - Key-value store clients
//!
//! Each partition's sink worker owns one `SinkClient` and feeds it every
//! payload routed to that partition.
//!
//! ```text
//! [Partition Queue] --Payload--> [Sink Worker] --set(key, value)--> [memcached]
//! ```
//!
//! # Available Clients
//!
//! | Client | Connector | Purpose |
//! |--------|-----------|---------|
//! | `memcache` | `MemcacheConnector` | memcached text protocol over TCP |
//! | `dry_run` | `DryRunConnector` | Log-only, never touches the network |
//!
//! Clients are created through a `SinkConnector` so tests can substitute
//! their own.

/// memcached client
pub mod memcache;

/// Log-only client for dry runs
pub mod dry_run;

/// Shared utilities (rate-limited logging)
pub mod util;

mod client;
mod common;

pub use client::{DryRunConnector, MemcacheConnector, SinkClient, SinkConnector};
pub use common::{MAX_KEY_LENGTH, SinkError, SinkOptions, validate_key};
pub use dry_run::DryRunClient;
pub use memcache::MemcacheClient;
pub use util::RateLimitedLogger;
