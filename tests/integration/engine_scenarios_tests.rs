//! End-to-end scenarios for the viewport engine
//!
//! Tests cover:
//! - Raw payload to rendered subset and export
//! - Window invariants across sequence lengths and operations
//! - Date jumps
//! - Lock pinning under decimation

use serde_json::json;

use chillrate::viewport::{
    normalize, parse_instant, ExportScope, ShowLast, ViewportEngine, CSV_HEADER,
};

use crate::common::{minute, points_from_values, raw_record, sequence};

fn assert_window_invariant(engine: &ViewportEngine, context: &str) {
    let viewport = engine.viewport();
    if engine.is_empty() {
        assert_eq!(
            (viewport.start(), viewport.end()),
            (0, 0),
            "empty window after {}",
            context
        );
    } else {
        assert!(viewport.start() <= viewport.end(), "bounds crossed after {}", context);
        assert!(viewport.end() < engine.len(), "end out of range after {}", context);
    }
}

// ============================================
// Scenario Tests
// ============================================

#[test]
fn test_three_point_preset_and_fit() {
    let payload = json!([
        raw_record("2024-01-01T00:00:00Z", json!(10), "a"),
        raw_record("2024-01-01T00:01:00Z", json!(50), "b"),
        raw_record("2024-01-01T00:02:00Z", json!(90), "c"),
    ]);
    let mut engine = ViewportEngine::new(normalize(&payload), ShowLast::All);

    engine.set_preset(ShowLast::Last(2));
    assert_eq!((engine.viewport().start(), engine.viewport().end()), (1, 2));
    let values: Vec<f64> = engine.visible_points().iter().map(|p| p.anxiety).collect();
    assert_eq!(values, vec![50.0, 90.0]);

    engine.fit_all();
    assert_eq!((engine.viewport().start(), engine.viewport().end()), (0, 2));
}

#[test]
fn test_empty_sequence_operations() {
    let mut engine = ViewportEngine::new(normalize(&json!([])), ShowLast::default());

    engine.set_preset(ShowLast::Last(10));
    engine.zoom_in();
    engine.zoom_out();
    engine.pan_left();
    engine.pan_right();
    engine.fit_all();
    engine.drag_start(3);
    engine.drag_end(9);
    engine.set_range(2, 5);
    engine.set_stride(4);
    assert!(engine.jump_to_date(minute(0)).is_none());

    assert_eq!((engine.viewport().start(), engine.viewport().end()), (0, 0));
    assert!(engine.visible_points().is_empty());
    assert!(engine.window_points().is_empty());
    assert_eq!(engine.export_csv(ExportScope::Visible), CSV_HEADER);
}

#[test]
fn test_payload_to_export() {
    let payload = json!([
        raw_record("2024-01-01T00:01:00Z", json!(55), "b"),
        raw_record("2024-01-01T00:00:00Z", json!(42), "a"),
    ]);
    let engine = ViewportEngine::new(normalize(&payload), ShowLast::All);
    assert_eq!(
        engine.export_csv(ExportScope::All),
        "index,date,anxiety,uuid\n0,2024-01-01T00:00:00.000Z,42,a\n1,2024-01-01T00:01:00.000Z,55,b"
    );
}

// ============================================
// Invariant Tests
// ============================================

#[test]
fn test_window_invariant_across_lengths() {
    for len in [0usize, 1, 5, 1000] {
        let mut engine = ViewportEngine::new(sequence(len), ShowLast::Last(20));
        assert_window_invariant(&engine, "new");

        for preset in [ShowLast::Last(5), ShowLast::Last(200), ShowLast::All] {
            engine.set_preset(preset);
            assert_window_invariant(&engine, "set_preset");
        }
        for _ in 0..12 {
            engine.zoom_in();
            assert_window_invariant(&engine, "zoom_in");
        }
        for _ in 0..12 {
            engine.zoom_out();
            assert_window_invariant(&engine, "zoom_out");
        }
        for _ in 0..8 {
            engine.pan_left();
            assert_window_invariant(&engine, "pan_left");
        }
        for _ in 0..8 {
            engine.pan_right();
            assert_window_invariant(&engine, "pan_right");
        }
        engine.drag_start(len + 10);
        assert_window_invariant(&engine, "drag_start");
        engine.drag_end(0);
        assert_window_invariant(&engine, "drag_end");
        engine.set_range(len + 3, len / 2);
        assert_window_invariant(&engine, "set_range");
        engine.jump_to_date(minute(len as i64 / 3));
        assert_window_invariant(&engine, "jump_to_date");

        for stride in 1..=20 {
            engine.set_stride(stride);
            let visible = engine.visible_points();
            assert!(visible.len() <= engine.window_points().len());
            if let Some(locked) = engine.selection().locked_index() {
                if engine.viewport().contains(locked) {
                    assert!(visible.iter().any(|p| p.index == locked));
                }
            }
        }
    }
}

#[test]
fn test_zoom_round_trip_keeps_size() {
    let mut engine = ViewportEngine::new(sequence(500), ShowLast::All);
    for k in 4..100 {
        engine.set_range(200, 200 + k - 1);
        engine.zoom_in();
        engine.zoom_out();
        assert!(engine.viewport().len() >= k);
    }
}

// ============================================
// Date Jump Tests
// ============================================

#[test]
fn test_jump_to_exact_instant() {
    let mut engine = ViewportEngine::new(sequence(100), ShowLast::Last(10));
    let target = parse_instant("2024-01-01T00:42:00Z").unwrap();

    assert_eq!(engine.jump_to_date(target), Some(42));
    assert!(engine.viewport().contains(42));
    assert_eq!(engine.selection().locked_index(), Some(42));
    assert_eq!(engine.summary().current_value, Some(42.0));
    assert_eq!(engine.summary().last_update, Some(minute(42)));
}

#[test]
fn test_jump_between_points_picks_nearest() {
    let mut engine = ViewportEngine::new(sequence(10), ShowLast::All);
    let target = minute(3) + chrono::Duration::seconds(40);
    assert_eq!(engine.jump_to_date(target), Some(4));
}

#[test]
fn test_jump_tie_prefers_earlier_point() {
    let engine = ViewportEngine::new(sequence(10), ShowLast::All);
    let target = minute(5) + chrono::Duration::seconds(30);
    assert_eq!(engine.nearest_index(target), Some(5));
}

#[test]
fn test_jump_outside_range_clamps() {
    let mut engine = ViewportEngine::new(sequence(10), ShowLast::Last(3));
    assert_eq!(engine.jump_to_date(minute(-600)), Some(0));
    assert_eq!(engine.viewport().start(), 0);
    assert_eq!(engine.jump_to_date(minute(600)), Some(9));
    assert_eq!(engine.viewport().end(), 9);
}

// ============================================
// Pinning Tests
// ============================================

#[test]
fn test_locked_point_survives_decimation() {
    let mut engine = ViewportEngine::new(points_from_values(&[5.0; 30]), ShowLast::All);
    engine.pointer_enter(13);
    engine.click();
    engine.set_stride(5);

    let indices: Vec<usize> = engine.visible_points().iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![0, 5, 10, 13, 15, 20, 25]);
    assert_eq!(engine.export_csv(ExportScope::Visible).lines().count(), 8);
}
