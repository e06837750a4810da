//! Router tests

use std::sync::Arc;

use memc_protocol::{Bytes, Payload};
use memc_routing::{PartitionId, PartitionTable, RoutingError};
use tokio::sync::mpsc;

use crate::{PartitionHandle, PartitionRouter};

fn default_table() -> Arc<PartitionTable> {
    Arc::new(
        PartitionTable::from_pairs([
            ("idfa", "127.0.0.1:33013"),
            ("gaid", "127.0.0.1:33014"),
            ("adid", "127.0.0.1:33015"),
            ("dvid", "127.0.0.1:33016"),
        ])
        .unwrap(),
    )
}

fn payload(key: &str) -> Payload {
    Payload {
        key: key.into(),
        value: Bytes::from_static(b"value"),
    }
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_router_has_no_handles() {
    let router = PartitionRouter::new(default_table());
    assert_eq!(router.partition_count(), 0);
    assert!(router.route("idfa").is_err());
}

#[test]
fn test_with_channels_registers_every_partition() {
    let (router, receivers) = PartitionRouter::with_channels(default_table(), 10);

    assert_eq!(router.partition_count(), 4);
    assert_eq!(receivers.len(), 4);

    let categories: Vec<_> = receivers.iter().map(|(p, _)| p.category.as_str()).collect();
    assert_eq!(categories, vec!["idfa", "gaid", "adid", "dvid"]);
}

#[test]
fn test_zero_queue_size_is_clamped() {
    let (router, _receivers) = PartitionRouter::with_channels(default_table(), 0);
    assert_eq!(router.route("idfa").unwrap().max_capacity(), 1);
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn test_route_delivers_to_matching_queue() {
    let (router, mut receivers) = PartitionRouter::with_channels(default_table(), 10);

    router.route("gaid").unwrap().send(payload("gaid:1")).await.unwrap();
    router.route("dvid").unwrap().send(payload("dvid:2")).await.unwrap();

    let (gaid, gaid_rx) = &mut receivers[1];
    assert_eq!(gaid.category, "gaid");
    assert_eq!(gaid_rx.recv().await.unwrap().key, "gaid:1");

    let (_, dvid_rx) = &mut receivers[3];
    assert_eq!(dvid_rx.recv().await.unwrap().key, "dvid:2");

    let (_, idfa_rx) = &mut receivers[0];
    assert!(idfa_rx.try_recv().is_err());
}

#[test]
fn test_route_unknown_category() {
    let (router, _receivers) = PartitionRouter::with_channels(default_table(), 10);

    let err = router.route("unknown_type").unwrap_err();
    assert_eq!(err, RoutingError::unknown_category("unknown_type"));
}

#[test]
fn test_route_is_case_sensitive() {
    let (router, _receivers) = PartitionRouter::with_channels(default_table(), 10);
    assert!(router.route("IDFA").is_err());
}

#[test]
fn test_route_without_registered_handle() {
    let mut router = PartitionRouter::new(default_table());
    let (tx, _rx) = mpsc::channel(1);
    router.register(PartitionHandle::new(PartitionId::new(0), "idfa", tx));

    assert!(router.route("idfa").is_ok());
    assert_eq!(
        router.route("gaid").unwrap_err(),
        RoutingError::unknown_category("gaid")
    );
}

#[test]
fn test_register_replaces_handle() {
    let mut router = PartitionRouter::new(default_table());
    let (tx1, _rx1) = mpsc::channel(1);
    let (tx2, _rx2) = mpsc::channel(8);

    router.register(PartitionHandle::new(PartitionId::new(0), "idfa", tx1));
    router.register(PartitionHandle::new(PartitionId::new(0), "idfa", tx2));

    assert_eq!(router.partition_count(), 1);
    assert_eq!(router.route("idfa").unwrap().max_capacity(), 8);
}

// ============================================================================
// Shutdown
// ============================================================================

#[tokio::test]
async fn test_dropping_router_closes_queues() {
    let (router, mut receivers) = PartitionRouter::with_channels(default_table(), 10);
    router.route("adid").unwrap().send(payload("adid:1")).await.unwrap();
    drop(router);

    let (_, adid_rx) = &mut receivers[2];
    assert_eq!(adid_rx.recv().await.unwrap().key, "adid:1");
    assert!(adid_rx.recv().await.is_none());
}

#[tokio::test]
async fn test_queue_closed_after_receiver_dropped() {
    let (router, mut receivers) = PartitionRouter::with_channels(default_table(), 10);
    receivers.remove(0);

    let handle = router.route("idfa").unwrap();
    assert!(handle.is_closed());
    assert!(handle.send(payload("idfa:1")).await.is_err());
}

#[test]
fn test_router_debug() {
    let (router, _receivers) = PartitionRouter::with_channels(default_table(), 10);
    let debug = format!("{:?}", router);
    assert!(debug.contains("partition_count: 4"));
}
