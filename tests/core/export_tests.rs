//! Tests for CSV export
//!
//! Tests cover:
//! - Exact output format
//! - Whole-sequence vs visible-subset scope
//! - Fallback values and file names

use serde_json::json;

use chillrate::viewport::{
    export_file_name, normalize, to_csv, ExportScope, ShowLast, ViewportEngine, CSV_HEADER,
};

use crate::common::{points_from_values, raw_record, sequence};

// ============================================
// Format Tests
// ============================================

#[test]
fn test_two_point_export_text() {
    let payload = json!([
        raw_record("2024-01-01T00:00:00Z", json!(42), "a"),
        raw_record("2024-01-01T00:01:00Z", json!(55), "b"),
    ]);
    let csv = to_csv(&normalize(&payload));
    assert_eq!(
        csv,
        "index,date,anxiety,uuid\n0,2024-01-01T00:00:00.000Z,42,a\n1,2024-01-01T00:01:00.000Z,55,b"
    );
}

#[test]
fn test_fractional_and_fallback_values() {
    let payload = json!([
        raw_record("2024-01-01T00:00:00.250Z", json!("12.5"), "a"),
        raw_record("2024-01-01T00:01:00Z", json!("n/a"), "b"),
    ]);
    let csv = to_csv(&normalize(&payload));
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows[0], CSV_HEADER);
    assert_eq!(rows[1], "0,2024-01-01T00:00:00.250Z,12.5,a");
    assert_eq!(rows[2], "1,2024-01-01T00:01:00.000Z,0,b");
}

#[test]
fn test_no_trailing_newline() {
    let csv = to_csv(&points_from_values(&[1.0]));
    assert!(!csv.ends_with('\n'));
    assert_eq!(csv.lines().count(), 2);
}

// ============================================
// Scope Tests
// ============================================

#[test]
fn test_scope_all_ignores_window() {
    let mut engine = ViewportEngine::new(sequence(10), ShowLast::Last(3));
    engine.set_stride(2);
    let csv = engine.export_csv(ExportScope::All);
    assert_eq!(csv.lines().count(), 11);
}

#[test]
fn test_scope_visible_uses_decimated_window() {
    let mut engine = ViewportEngine::new(sequence(10), ShowLast::Last(6));
    engine.set_stride(2);
    let csv = engine.export_csv(ExportScope::Visible);
    let indices: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|row| row.split(',').next().unwrap_or_default())
        .collect();
    assert_eq!(indices, vec!["4", "6", "8"]);
}

#[test]
fn test_empty_engine_exports_header() {
    let engine = ViewportEngine::default();
    assert_eq!(engine.export_csv(ExportScope::All), CSV_HEADER);
    assert_eq!(engine.export_csv(ExportScope::Visible), CSV_HEADER);
}

// ============================================
// File Name Tests
// ============================================

#[test]
fn test_file_name_trims_display_name() {
    assert_eq!(export_file_name("  Anna "), "anxiety_Anna.csv");
    assert_eq!(export_file_name("   "), "anxiety_user.csv");
    assert_eq!(ExportScope::All.as_ref(), "all");
}
