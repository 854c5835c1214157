//! Tests for the viewport index window
//!
//! Tests cover:
//! - Presets
//! - Zoom, pan and fit
//! - Jump-to-index centering
//! - Manual bound dragging
//! - Empty sequences

use chillrate::viewport::{Direction, ShowLast, Viewport, SHOW_LAST_PRESETS};

fn bounds(viewport: &Viewport) -> (usize, usize) {
    (viewport.start(), viewport.end())
}

// ============================================
// Preset Tests
// ============================================

#[test]
fn test_preset_shows_trailing_points() {
    let viewport = Viewport::with_preset(ShowLast::Last(20), 100);
    assert_eq!(bounds(&viewport), (80, 99));
}

#[test]
fn test_preset_all_is_full_range() {
    let viewport = Viewport::with_preset(ShowLast::All, 100);
    assert_eq!(bounds(&viewport), (0, 99));
}

#[test]
fn test_preset_equal_to_len_is_full_range() {
    let viewport = Viewport::with_preset(ShowLast::Last(10), 10);
    assert_eq!(bounds(&viewport), (0, 9));
}

#[test]
fn test_preset_list_and_default() {
    assert_eq!(ShowLast::default(), ShowLast::Last(50));
    assert_eq!(SHOW_LAST_PRESETS.len(), 7);
    assert_eq!(SHOW_LAST_PRESETS.last(), Some(&ShowLast::All));
    assert_eq!(ShowLast::All.to_string(), "All");
    assert_eq!(ShowLast::Last(20).to_string(), "20");
}

// ============================================
// Zoom Tests
// ============================================

#[test]
fn test_zoom_in_to_single_point() {
    let mut viewport = Viewport::with_preset(ShowLast::Last(4), 10);
    viewport.zoom_in(10);
    assert_eq!(bounds(&viewport), (8, 9));
    viewport.zoom_in(10);
    assert_eq!(bounds(&viewport), (9, 9));
    viewport.zoom_in(10);
    assert_eq!(bounds(&viewport), (9, 9));
}

#[test]
fn test_zoom_out_capped_at_len() {
    let mut viewport = Viewport::with_preset(ShowLast::Last(8), 10);
    viewport.zoom_out(10);
    assert_eq!(bounds(&viewport), (0, 9));
}

#[test]
fn test_zoom_round_trip_never_shrinks() {
    for k in 4..40 {
        let len = 100;
        let mut viewport = Viewport::default();
        viewport.set_range(60 - k + 1, 60, len);
        assert_eq!(viewport.len(), k);

        viewport.zoom_in(len);
        viewport.zoom_out(len);
        assert!(viewport.len() >= k, "window of {} shrank to {}", k, viewport.len());
        assert_eq!(viewport.end(), 60);
    }
}

// ============================================
// Pan Tests
// ============================================

#[test]
fn test_pan_by_a_third() {
    let mut viewport = Viewport::default();
    viewport.set_range(30, 59, 100);
    viewport.pan(Direction::Right, 100);
    assert_eq!(bounds(&viewport), (40, 69));
    viewport.pan(Direction::Left, 100);
    assert_eq!(bounds(&viewport), (30, 59));
}

#[test]
fn test_pan_small_window_moves_one() {
    let mut viewport = Viewport::default();
    viewport.set_range(5, 6, 100);
    viewport.pan_right(100);
    assert_eq!(bounds(&viewport), (6, 7));
}

// ============================================
// Jump Tests
// ============================================

#[test]
fn test_jump_enlarges_tiny_window() {
    let mut viewport = Viewport::default();
    viewport.set_range(0, 0, 50);
    viewport.jump_to(20, 50);
    assert_eq!(bounds(&viewport), (18, 22));
}

#[test]
fn test_jump_keeps_larger_window() {
    let mut viewport = Viewport::default();
    viewport.set_range(0, 9, 50);
    viewport.jump_to(25, 50);
    assert_eq!(bounds(&viewport), (20, 29));
}

#[test]
fn test_jump_on_short_sequence() {
    let mut viewport = Viewport::default();
    viewport.set_range(0, 0, 3);
    viewport.jump_to(1, 3);
    assert_eq!(bounds(&viewport), (0, 2));
}

// ============================================
// Drag Tests
// ============================================

#[test]
fn test_drag_end_clamped_to_len() {
    let mut viewport = Viewport::with_preset(ShowLast::All, 10);
    viewport.drag_end(500, 10);
    assert_eq!(viewport.end(), 9);
}

#[test]
fn test_set_range_orders_bounds() {
    let mut viewport = Viewport::default();
    viewport.set_range(8, 3, 10);
    assert_eq!(bounds(&viewport), (3, 8));
}

// ============================================
// Edge Tracking Tests
// ============================================

#[test]
fn test_tracks_edge() {
    let viewport = Viewport::with_preset(ShowLast::Last(5), 10);
    assert!(viewport.tracks_edge(10));
    assert!(!viewport.tracks_edge(11));
    assert!(!viewport.tracks_edge(0));
}

// ============================================
// Empty Sequence Tests
// ============================================

#[test]
fn test_every_operation_on_empty_sequence() {
    let mut viewport = Viewport::with_preset(ShowLast::Last(5), 0);
    assert_eq!(bounds(&viewport), (0, 0));

    viewport.zoom_in(0);
    viewport.zoom_out(0);
    viewport.pan_left(0);
    viewport.pan_right(0);
    viewport.fit_all(0);
    viewport.jump_to(3, 0);
    viewport.drag_start(2, 0);
    viewport.drag_end(4, 0);
    viewport.set_range(1, 2, 0);
    assert_eq!(bounds(&viewport), (0, 0));
}
