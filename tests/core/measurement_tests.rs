//! Tests for measurement normalization
//!
//! Tests cover:
//! - Non-array payloads
//! - Timestamp filtering and ordering
//! - Value coercion (parsed vs fallback)
//! - Identifier handling

use serde_json::{json, Value};

use chillrate::viewport::{normalize, parse_instant, parse_value, ValueSource};

use crate::common::{minute, raw_record};

// ============================================
// Payload Shape Tests
// ============================================

#[test]
fn test_non_array_payload_is_empty() {
    assert!(normalize(&json!({"error": "nope"})).is_empty());
    assert!(normalize(&Value::Null).is_empty());
    assert!(normalize(&json!("text")).is_empty());
    assert!(normalize(&json!(42)).is_empty());
}

#[test]
fn test_empty_array() {
    assert!(normalize(&json!([])).is_empty());
}

// ============================================
// Ordering Tests
// ============================================

#[test]
fn test_output_sorted_and_never_longer() {
    let payload = json!([
        raw_record("2024-01-01T00:05:00Z", json!(5), "e"),
        raw_record("garbage", json!(1), "x"),
        raw_record("2024-01-01T00:01:00Z", json!(1), "a"),
        raw_record("2024-01-01T00:03:00Z", json!(3), "c"),
        { "value": 9, "uuid": "no-time" },
    ]);
    let points = normalize(&payload);

    assert!(points.len() <= payload.as_array().unwrap().len());
    assert_eq!(points.len(), 3);
    for pair in points.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

#[test]
fn test_dropping_bad_timestamp_keeps_relative_order() {
    let with_bad = json!([
        raw_record("2024-01-01T00:00:00Z", json!(1), "a"),
        raw_record("2024-01-01T00:00:00Z", json!(2), "b"),
        raw_record("not-a-date", json!(3), "x"),
        raw_record("2024-01-01T00:00:00Z", json!(4), "c"),
    ]);
    let ids: Vec<String> = normalize(&with_bad)
        .into_iter()
        .map(|p| p.source_id)
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn test_indices_are_positions() {
    let payload = json!([
        raw_record("2024-01-01T00:02:00Z", json!(2), "c"),
        raw_record("2024-01-01T00:00:00Z", json!(0), "a"),
    ]);
    let points = normalize(&payload);
    assert_eq!(points[0].index, 0);
    assert_eq!(points[0].source_id, "a");
    assert_eq!(points[1].index, 1);
}

#[test]
fn test_mixed_timestamp_formats() {
    let payload = json!([
        raw_record("2024-01-01 00:02:00", json!(2), "naive"),
        raw_record("2024-01-01T03:01:00+03:00", json!(1), "offset"),
        { "time": 1_704_067_200_000_i64, "value": 0, "uuid": "epoch" },
    ]);
    let points = normalize(&payload);
    let ids: Vec<&str> = points.iter().map(|p| p.source_id.as_str()).collect();
    assert_eq!(ids, vec!["epoch", "offset", "naive"]);
    assert_eq!(points[1].timestamp, minute(1));
}

// ============================================
// Value Coercion Tests
// ============================================

#[test]
fn test_fallback_values_render_as_zero() {
    let payload = json!([
        raw_record("2024-01-01T00:00:00Z", json!("abc"), "a"),
        raw_record("2024-01-01T00:01:00Z", Value::Null, "b"),
        raw_record("2024-01-01T00:02:00Z", json!(0), "c"),
    ]);
    let points = normalize(&payload);

    assert_eq!(points[0].anxiety, 0.0);
    assert!(points[0].value_source.is_fallback());
    assert!(points[1].value_source.is_fallback());
    assert_eq!(points[2].value_source, ValueSource::Parsed(0.0));
}

#[test]
fn test_parse_value_numeric_strings() {
    assert_eq!(parse_value(Some(&json!("55"))), ValueSource::Parsed(55.0));
    assert_eq!(parse_value(Some(&json!("12.5"))), ValueSource::Parsed(12.5));
    assert_eq!(parse_value(Some(&json!("  "))), ValueSource::Fallback);
    assert_eq!(parse_value(Some(&json!([1]))), ValueSource::Fallback);
}

// ============================================
// Identifier Tests
// ============================================

#[test]
fn test_numeric_uuid_is_stringified() {
    let payload = json!([{ "time": "2024-01-01T00:00:00Z", "value": 1, "uuid": 17 }]);
    assert_eq!(normalize(&payload)[0].source_id, "17");
}

#[test]
fn test_missing_uuid_and_sensor_are_empty() {
    let payload = json!([{ "time": "2024-01-01T00:00:00Z", "value": 1 }]);
    let point = &normalize(&payload)[0];
    assert_eq!(point.source_id, "");
    assert_eq!(point.sensor_type, "");
}

// ============================================
// Instant Parsing Tests
// ============================================

#[test]
fn test_parse_instant_date_only_is_midnight() {
    assert_eq!(parse_instant("2024-01-01"), Some(minute(0)));
}

#[test]
fn test_parse_instant_trims_whitespace() {
    assert_eq!(parse_instant("  2024-01-01T00:03:00Z "), Some(minute(3)));
}
