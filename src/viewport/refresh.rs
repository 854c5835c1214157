//! Change detection and window reconciliation for periodic refreshes.
//!
//! A refresh is only applied when the trailing unique identifier of the newly
//! fetched sequence differs from the last one observed. When it is applied,
//! a window that was sitting on the live edge keeps following it; any other
//! window stays where the user left it.

use super::measurement::{trailing_id, MeasurementPoint};
use super::window::Viewport;

/// What a refresh did to the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Trailing identifier unchanged; nothing was touched
    Unchanged,
    /// The canonical sequence was replaced
    Updated {
        previous_len: usize,
        new_len: usize,
        /// The window was on the live edge and moved with it
        followed_edge: bool,
    },
}

impl RefreshOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated { .. })
    }
}

/// Remembers the trailing identifier of the last accepted sequence
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeTracker {
    last_seen: String,
}

impl ChangeTracker {
    pub fn new(points: &[MeasurementPoint]) -> Self {
        Self {
            last_seen: trailing_id(points).to_string(),
        }
    }

    pub fn last_seen(&self) -> &str {
        &self.last_seen
    }

    /// Whether `points` ends on a different identifier than the last
    /// accepted sequence
    pub fn is_new(&self, points: &[MeasurementPoint]) -> bool {
        trailing_id(points) != self.last_seen
    }

    /// Record `points` as accepted
    pub fn accept(&mut self, points: &[MeasurementPoint]) {
        self.last_seen = trailing_id(points).to_string();
    }
}

/// Adjust `viewport` for a sequence that went from `previous_len` to
/// `new_len` points. Returns whether the window followed the live edge.
pub fn reconcile_window(viewport: &mut Viewport, previous_len: usize, new_len: usize) -> bool {
    if viewport.tracks_edge(previous_len) && new_len > 0 {
        viewport.follow_edge(new_len);
        true
    } else {
        viewport.clamp(new_len);
        false
    }
}
