//! Tests for hover and lock selection through the engine
//!
//! Tests cover:
//! - Hover driving the summary while unlocked
//! - Locking by click and by date jump
//! - Nudging the lock
//! - Pointer leave and unlock

use chillrate::viewport::{Direction, LockState, ShowLast, ViewportEngine};

use crate::common::{minute, points_from_values};

fn engine(values: &[f64]) -> ViewportEngine {
    ViewportEngine::new(points_from_values(values), ShowLast::All)
}

// ============================================
// Hover Tests
// ============================================

#[test]
fn test_summary_defaults_to_last_point() {
    let engine = engine(&[10.0, 20.0, 30.0]);
    assert_eq!(engine.summary().current_value, Some(30.0));
    assert_eq!(engine.summary().last_update, Some(minute(2)));
}

#[test]
fn test_hover_updates_summary_when_unlocked() {
    let mut engine = engine(&[10.0, 20.0, 30.0]);
    engine.pointer_enter(0);
    assert_eq!(engine.summary().current_value, Some(10.0));
    assert_eq!(engine.highlighted_point().map(|p| p.index), Some(0));

    engine.pointer_leave();
    assert_eq!(engine.summary().current_value, Some(30.0));
    assert!(engine.highlighted_point().is_none());
}

#[test]
fn test_hover_out_of_range_is_ignored() {
    let mut engine = engine(&[10.0, 20.0]);
    engine.pointer_enter(7);
    assert_eq!(engine.selection().hover(), None);
    assert_eq!(engine.summary().current_value, Some(20.0));
}

// ============================================
// Lock Tests
// ============================================

#[test]
fn test_click_locks_hovered_point() {
    let mut engine = engine(&[10.0, 20.0, 30.0, 40.0]);
    engine.pointer_enter(1);
    engine.click();
    assert_eq!(engine.selection().lock(), LockState::Locked(1));

    // Hover elsewhere does not move the summary off the lock
    engine.pointer_enter(3);
    assert_eq!(engine.summary().current_value, Some(20.0));
    assert_eq!(engine.highlighted_point().map(|p| p.index), Some(1));
}

#[test]
fn test_click_same_point_unlocks() {
    let mut engine = engine(&[10.0, 20.0, 30.0]);
    engine.pointer_enter(0);
    engine.click();
    engine.click();
    assert_eq!(engine.selection().lock(), LockState::Unlocked);
    assert_eq!(engine.summary().current_value, Some(10.0));
}

#[test]
fn test_click_without_hover_does_nothing() {
    let mut engine = engine(&[10.0, 20.0]);
    engine.click();
    assert!(!engine.selection().is_locked());
}

#[test]
fn test_pointer_leave_keeps_lock() {
    let mut engine = engine(&[10.0, 20.0, 30.0]);
    engine.pointer_enter(1);
    engine.click();
    engine.pointer_leave();
    assert_eq!(engine.selection().locked_index(), Some(1));
    assert_eq!(engine.summary().current_value, Some(20.0));
}

// ============================================
// Nudge Tests
// ============================================

#[test]
fn test_nudge_moves_lock_and_summary() {
    let mut engine = engine(&[10.0, 20.0, 30.0]);
    engine.pointer_enter(1);
    engine.click();

    engine.nudge(Direction::Right);
    assert_eq!(engine.selection().locked_index(), Some(2));
    assert_eq!(engine.summary().current_value, Some(30.0));

    engine.nudge(Direction::Right);
    assert_eq!(engine.selection().locked_index(), Some(2));

    engine.nudge(Direction::Left);
    engine.nudge(Direction::Left);
    engine.nudge(Direction::Left);
    assert_eq!(engine.selection().locked_index(), Some(0));
}

#[test]
fn test_nudge_unlocked_is_noop() {
    let mut engine = engine(&[10.0, 20.0, 30.0]);
    engine.nudge(Direction::Left);
    assert!(!engine.selection().is_locked());
    assert_eq!(engine.summary().current_value, Some(30.0));
}

// ============================================
// Unlock Tests
// ============================================

#[test]
fn test_unlock_falls_back_to_hover_then_last() {
    let mut engine = engine(&[10.0, 20.0, 30.0]);
    engine.pointer_enter(0);
    engine.click();
    engine.unlock();
    assert_eq!(engine.summary().current_value, Some(10.0));

    engine.pointer_leave();
    engine.unlock();
    assert_eq!(engine.summary().current_value, Some(30.0));
}

#[test]
fn test_selection_on_empty_engine() {
    let mut engine = ViewportEngine::default();
    engine.pointer_enter(0);
    engine.click();
    engine.nudge(Direction::Right);
    engine.unlock();
    assert!(engine.highlighted_point().is_none());
    assert_eq!(engine.summary().current_value, None);
}
