//! Tests for incremental module

use super::timestamp::{parse, reformat_str};
use super::*;
use crate::error::Error;
use crate::pagination::RequestDescriptor;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
        .unwrap()
        .fixed_offset()
}

// ============================================================================
// Timestamp Tests
// ============================================================================

#[test]
fn test_validate_default_format() {
    let ts = utc(2024, 1, 1, 0, 0, 0);
    assert!(validate(&ts, STATE_FORMAT).is_ok());
    assert!(validate(&ts, WIRE_FORMAT).is_ok());
}

#[test]
fn test_validate_rejects_partial_format() {
    // A date-only format cannot be parsed back into a timestamp
    let ts = utc(2024, 1, 1, 0, 0, 0);
    let err = validate(&ts, "%Y-%m-%d").unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn test_validate_rejects_invalid_specifier() {
    let ts = utc(2024, 1, 1, 0, 0, 0);
    let err = validate(&ts, "%Y-%Q").unwrap_err();
    match err {
        Error::Validation { expected, .. } => assert_eq!(expected, "%Y-%Q"),
        other => panic!("Expected Validation, got {other:?}"),
    }
}

#[test]
fn test_reformat_state_to_wire() {
    let ts = utc(2024, 3, 5, 10, 20, 30);
    let wire = reformat(&ts, STATE_FORMAT, WIRE_FORMAT).unwrap();
    assert_eq!(wire, "2024-03-05T10:20:30.000Z");
}

#[test]
fn test_reformat_normalizes_offset_to_utc() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let ts = offset.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
    let wire = reformat(&ts, STATE_FORMAT, WIRE_FORMAT).unwrap();
    assert_eq!(wire, "2024-03-05T10:00:00.000Z");
}

#[test]
fn test_reformat_zoneless_source_keeps_instant() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let ts = offset.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
    let wire = reformat(&ts, "%Y-%m-%dT%H:%M:%S", WIRE_FORMAT).unwrap();
    assert_eq!(wire, "2024-03-05T10:00:00.000Z");
}

#[test]
fn test_validate_zoneless_format_with_offset() {
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let ts = offset.with_ymd_and_hms(2024, 3, 5, 22, 30, 0).unwrap();
    assert!(validate(&ts, "%Y-%m-%dT%H:%M:%S").is_ok());
}

#[test]
fn test_reformat_drops_precision_of_source_format() {
    let ts = DateTime::parse_from_rfc3339("2024-03-05T10:20:30.789Z").unwrap();
    let wire = reformat(&ts, STATE_FORMAT, WIRE_FORMAT).unwrap();
    assert_eq!(wire, "2024-03-05T10:20:30.000Z");
}

#[test]
fn test_reformat_round_trip() {
    let second_precision = "%Y-%m-%dT%H:%M:%SZ";
    let original = "2024-03-05T10:20:30+0000";

    let there = reformat_str(original, STATE_FORMAT, second_precision).unwrap();
    assert_eq!(there, "2024-03-05T10:20:30Z");

    let back = reformat_str(&there, second_precision, STATE_FORMAT).unwrap();
    assert_eq!(back, original);
}

#[test]
fn test_reformat_str_rejects_mismatched_input() {
    let err = reformat_str("yesterday", STATE_FORMAT, WIRE_FORMAT).unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn test_parse_naive_format_is_utc() {
    let ts = parse("2024-03-05T10:20:30", "%Y-%m-%dT%H:%M:%S").unwrap();
    assert_eq!(ts, utc(2024, 3, 5, 10, 20, 30));
}

// ============================================================================
// ReplicationState Tests
// ============================================================================

#[test]
fn test_replication_state_parse_formats() {
    let expected = utc(2024, 1, 1, 0, 0, 0);

    for input in [
        "2024-01-01T00:00:00.000Z",
        "2024-01-01T00:00:00Z",
        "2024-01-01T00:00:00+0000",
        "2024-01-01T00:00:00+00:00",
    ] {
        let state = ReplicationState::parse(input).unwrap();
        assert_eq!(state.timestamp(), expected, "input: {input}");
    }
}

#[test]
fn test_replication_state_rejects_garbage() {
    let err = ReplicationState::parse("01/01/2024").unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn test_replication_state_to_wire() {
    let state = ReplicationState::parse("2024-06-30T23:59:59+0000").unwrap();
    assert_eq!(state.to_wire().unwrap(), "2024-06-30T23:59:59.000Z");
    assert_eq!(state.to_state_string(), "2024-06-30T23:59:59+0000");
}

#[test]
fn test_replication_state_serde() {
    let state = ReplicationState::parse("2024-01-01T00:00:00.000Z").unwrap();
    let json = serde_json::to_string(&state).unwrap();
    assert_eq!(json, "\"2024-01-01T00:00:00.000Z\"");

    let restored: ReplicationState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);

    assert!(serde_json::from_str::<ReplicationState>("\"not a date\"").is_err());
}

#[test]
fn test_replication_state_ordering() {
    let older = ReplicationState::parse("2024-01-01T00:00:00Z").unwrap();
    let newer = ReplicationState::parse("2024-01-01T00:00:01+00:00").unwrap();
    assert!(older < newer);
}

// ============================================================================
// Filter Tests
// ============================================================================

#[test]
fn test_build_filter_raw() {
    let filter = build_filter("lastUpdated", "2024-01-01T00:00:00.000Z");
    assert_eq!(filter.raw(), "lastUpdated gt \"2024-01-01T00:00:00.000Z\"");
    assert_eq!(filter.to_string(), filter.raw());
}

#[test]
fn test_build_filter_encoded_preserves_colon_and_plus() {
    let filter = build_filter("lastUpdated", "2024-01-01T00:00:00.000Z");
    let encoded = filter.encoded();
    assert_eq!(
        encoded,
        "lastUpdated%20gt%20%222024-01-01T00:00:00.000Z%22"
    );
    assert!(encoded.contains("gt"));
    assert!(encoded.contains(':'));

    let with_offset = build_filter("lastUpdated", "2024-01-01T00:00:00+0000");
    assert!(with_offset.encoded().contains("00+0000"));
}

#[test]
fn test_merge_into_params_keeps_other_keys() {
    let mut base = RequestDescriptor::new();
    base.insert("limit", "10");
    base.insert("sort", "asc");

    let filter = build_filter("lastUpdated", "2024-01-01T00:00:00.000Z");
    let merged = merge_into_params(base, &filter);

    assert_eq!(merged.get("limit"), Some("10"));
    assert_eq!(merged.get("sort"), Some("asc"));
    assert_eq!(merged.get(FILTER_PARAM), Some(filter.raw()));
    assert_eq!(merged.len(), 3);
}

#[test]
fn test_merge_into_params_encodes_once() {
    let filter = build_filter("lastUpdated", "2024-01-01T00:00:00.000Z");
    let merged = merge_into_params(RequestDescriptor::new(), &filter);

    let query = merged.to_query_string();
    assert_eq!(query, format!("filter={}", filter.encoded()));
    assert!(!query.contains("%25"), "double encoded: {query}");
}

#[test]
fn test_merge_into_params_replaces_existing_filter() {
    let mut base = RequestDescriptor::new();
    base.insert(FILTER_PARAM, "status eq \"ACTIVE\"");
    base.insert("limit", "10");

    let filter = build_filter("lastUpdated", "2024-01-01T00:00:00.000Z");
    let merged = merge_into_params(base, &filter);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["filter", "limit"]);
    assert_eq!(merged.get(FILTER_PARAM), Some(filter.raw()));
}
