//! Tests for PartitionTable

use crate::{PartitionId, PartitionTable, PartitionTableBuilder, RoutingError, is_valid_address};

fn default_table() -> PartitionTable {
    PartitionTable::from_pairs([
        ("idfa", "127.0.0.1:33013"),
        ("gaid", "127.0.0.1:33014"),
        ("adid", "127.0.0.1:33015"),
        ("dvid", "127.0.0.1:33016"),
    ])
    .unwrap()
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn test_lookup_known_categories() {
    let table = default_table();

    assert_eq!(table.len(), 4);
    assert_eq!(table.lookup("idfa").unwrap(), PartitionId::new(0));
    assert_eq!(table.lookup("dvid").unwrap(), PartitionId::new(3));
}

#[test]
fn test_lookup_unknown_category() {
    let table = default_table();
    let err = table.lookup("unknown_type").unwrap_err();
    assert_eq!(err, RoutingError::unknown_category("unknown_type"));
}

#[test]
fn test_lookup_is_case_sensitive() {
    let table = default_table();
    assert!(table.lookup("IDFA").is_err());
    assert!(table.lookup("idfa ").is_err());
}

#[test]
fn test_partition_by_id() {
    let table = default_table();
    let id = table.lookup("gaid").unwrap();
    let partition = table.partition(id).unwrap();

    assert_eq!(partition.id, id);
    assert_eq!(partition.category, "gaid");
    assert_eq!(partition.address, "127.0.0.1:33014");
    assert!(table.partition(PartitionId::new(99)).is_none());
}

#[test]
fn test_iter_in_registration_order() {
    let table = default_table();
    let categories: Vec<&str> = table.iter().map(|p| p.category.as_str()).collect();
    assert_eq!(categories, ["idfa", "gaid", "adid", "dvid"]);
}

#[test]
fn test_empty_table() {
    let table = PartitionTableBuilder::new().build();
    assert!(table.is_empty());
    assert!(table.lookup("idfa").is_err());
}

// =============================================================================
// Builder validation
// =============================================================================

#[test]
fn test_register_duplicate_category() {
    let mut builder = PartitionTableBuilder::new();
    builder.register("idfa", "127.0.0.1:1").unwrap();
    let err = builder.register("idfa", "127.0.0.1:2").unwrap_err();
    assert_eq!(err, RoutingError::duplicate_category("idfa"));
}

#[test]
fn test_register_empty_category() {
    let mut builder = PartitionTableBuilder::new();
    assert_eq!(
        builder.register("", "127.0.0.1:1").unwrap_err(),
        RoutingError::EmptyCategory
    );
}

#[test]
fn test_register_invalid_address() {
    let mut builder = PartitionTableBuilder::new();
    for bad in ["localhost", ":11211", "host:", "host:99999", "host:port"] {
        let err = builder.register("idfa", bad).unwrap_err();
        assert!(
            matches!(err, RoutingError::InvalidAddress { .. }),
            "accepted {bad}"
        );
    }
}

#[test]
fn test_failed_register_leaves_table_unchanged() {
    let mut builder = PartitionTableBuilder::new();
    builder.register("idfa", "127.0.0.1:1").unwrap();
    let _ = builder.register("gaid", "nope");
    let id = builder.register("adid", "127.0.0.1:3").unwrap();

    assert_eq!(id, PartitionId::new(1));
    assert_eq!(builder.build().len(), 2);
}

#[test]
fn test_valid_addresses() {
    assert!(is_valid_address("127.0.0.1:33013"));
    assert!(is_valid_address("memcache.internal:11211"));
    assert!(is_valid_address("[::1]:11211"));
    assert!(!is_valid_address("127.0.0.1"));
}
