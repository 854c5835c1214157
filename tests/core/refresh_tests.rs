//! Tests for refresh merging
//!
//! Tests cover:
//! - Unchanged trailing id leaves the engine untouched
//! - Live-edge windows follow new points
//! - Historical windows stay put
//! - Locks survive refreshes

use chillrate::viewport::refresh::{reconcile_window, ChangeTracker};
use chillrate::viewport::{RefreshOutcome, ShowLast, Viewport, ViewportEngine};

use crate::common::{points_from_values, sequence};

// ============================================
// Change Detection Tests
// ============================================

#[test]
fn test_tracker_compares_trailing_id() {
    let points = sequence(5);
    let mut tracker = ChangeTracker::new(&points);
    assert_eq!(tracker.last_seen(), "p4");
    assert!(!tracker.is_new(&points));

    let grown = sequence(6);
    assert!(tracker.is_new(&grown));
    tracker.accept(&grown);
    assert_eq!(tracker.last_seen(), "p5");
}

#[test]
fn test_same_trailing_id_is_unchanged() {
    let mut engine = ViewportEngine::new(sequence(10), ShowLast::Last(5));
    engine.pointer_enter(6);
    let before_viewport = engine.viewport();
    let before_summary = engine.summary();

    // Different values, same trailing id
    let mut replacement = points_from_values(&[99.0; 10]);
    replacement[9].source_id = "p9".to_string();
    let outcome = engine.apply_refresh(replacement);

    assert_eq!(outcome, RefreshOutcome::Unchanged);
    assert_eq!(engine.viewport(), before_viewport);
    assert_eq!(engine.summary(), before_summary);
    assert_eq!(engine.point(0).map(|p| p.anxiety), Some(0.0));
}

// ============================================
// Window Reconciliation Tests
// ============================================

#[test]
fn test_live_edge_window_follows() {
    let mut engine = ViewportEngine::new(sequence(10), ShowLast::Last(5));
    let outcome = engine.apply_refresh(sequence(13));

    assert_eq!(
        outcome,
        RefreshOutcome::Updated {
            previous_len: 10,
            new_len: 13,
            followed_edge: true,
        }
    );
    assert_eq!(engine.viewport().end(), 12);
    assert_eq!(engine.viewport().len(), 5);
    assert_eq!(engine.summary().current_value, Some(12.0));
}

#[test]
fn test_history_window_stays() {
    let mut engine = ViewportEngine::new(sequence(10), ShowLast::All);
    engine.set_range(2, 4);
    let outcome = engine.apply_refresh(sequence(12));

    assert!(outcome.is_updated());
    assert_eq!((engine.viewport().start(), engine.viewport().end()), (2, 4));
}

#[test]
fn test_refresh_from_empty() {
    let mut engine = ViewportEngine::new(Vec::new(), ShowLast::Last(5));
    engine.apply_refresh(sequence(3));
    assert_eq!(engine.viewport().end(), 2);
    assert_eq!(engine.last_seen_id(), "p2");
}

#[test]
fn test_refresh_to_empty_collapses() {
    let mut engine = ViewportEngine::new(sequence(4), ShowLast::All);
    engine.pointer_enter(2);
    engine.click();
    engine.apply_refresh(Vec::new());

    assert!(engine.is_empty());
    assert_eq!((engine.viewport().start(), engine.viewport().end()), (0, 0));
    assert!(!engine.selection().is_locked());
    assert_eq!(engine.summary().current_value, None);
}

#[test]
fn test_reconcile_window_helper() {
    let mut viewport = Viewport::with_preset(ShowLast::Last(3), 6);
    assert!(reconcile_window(&mut viewport, 6, 8));
    assert_eq!((viewport.start(), viewport.end()), (5, 7));
}

// ============================================
// Lock Preservation Tests
// ============================================

#[test]
fn test_lock_survives_refresh() {
    let mut engine = ViewportEngine::new(sequence(10), ShowLast::Last(5));
    engine.pointer_enter(7);
    engine.click();
    engine.apply_refresh(sequence(11));

    assert_eq!(engine.selection().locked_index(), Some(7));
    assert_eq!(engine.summary().current_value, Some(7.0));
}
