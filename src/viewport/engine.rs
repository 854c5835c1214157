//! The viewport engine: one canonical sequence plus the window, sampling and
//! selection state layered over it.
//!
//! All mutation happens on the UI thread. The engine knows nothing about how
//! points are fetched; the detail view feeds it initial data and refreshes.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::export::{to_csv, ExportScope};
use super::measurement::MeasurementPoint;
use super::refresh::{reconcile_window, ChangeTracker, RefreshOutcome};
use super::sampling::{decimate, SamplingStride};
use super::selection::Selection;
use super::window::{Direction, ShowLast, Viewport};

/// Figures shown in the summary cards
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    pub current_value: Option<f64>,
    pub last_update: Option<DateTime<Utc>>,
}

impl Summary {
    fn from_point(point: Option<&MeasurementPoint>) -> Self {
        match point {
            Some(p) => Self {
                current_value: Some(p.anxiety),
                last_update: Some(p.timestamp),
            },
            None => Self::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewportEngine {
    points: Vec<MeasurementPoint>,
    viewport: Viewport,
    preset: ShowLast,
    stride: SamplingStride,
    selection: Selection,
    summary: Summary,
    tracker: ChangeTracker,
}

impl Default for ViewportEngine {
    fn default() -> Self {
        Self::new(Vec::new(), ShowLast::default())
    }
}

impl ViewportEngine {
    /// Build an engine over an initial canonical sequence
    pub fn new(points: Vec<MeasurementPoint>, preset: ShowLast) -> Self {
        let viewport = Viewport::with_preset(preset, points.len());
        let summary = Summary::from_point(points.last());
        let tracker = ChangeTracker::new(&points);
        Self {
            points,
            viewport,
            preset,
            stride: SamplingStride::default(),
            selection: Selection::default(),
            summary,
            tracker,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn points(&self) -> &[MeasurementPoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn preset(&self) -> ShowLast {
        self.preset
    }

    pub fn stride(&self) -> SamplingStride {
        self.stride
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn last_seen_id(&self) -> &str {
        self.tracker.last_seen()
    }

    pub fn point(&self, index: usize) -> Option<&MeasurementPoint> {
        self.points.get(index)
    }

    /// Points inside the window, before decimation
    pub fn window_points(&self) -> &[MeasurementPoint] {
        if self.points.is_empty() {
            return &[];
        }
        &self.points[self.viewport.start()..=self.viewport.end()]
    }

    /// Points to render: the window decimated by the stride, keeping the
    /// locked point
    pub fn visible_points(&self) -> Vec<&MeasurementPoint> {
        decimate(
            self.window_points(),
            self.viewport.start(),
            self.stride,
            self.selection.locked_index(),
        )
    }

    /// Lock, else hover
    pub fn highlighted_point(&self) -> Option<&MeasurementPoint> {
        self.selection
            .highlighted()
            .and_then(|index| self.points.get(index))
    }

    // ------------------------------------------------------------------------
    // Window operations
    // ------------------------------------------------------------------------

    pub fn set_preset(&mut self, preset: ShowLast) {
        self.preset = preset;
        self.viewport.set_preset(preset, self.points.len());
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in(self.points.len());
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out(self.points.len());
    }

    pub fn pan_left(&mut self) {
        self.viewport.pan_left(self.points.len());
    }

    pub fn pan_right(&mut self) {
        self.viewport.pan_right(self.points.len());
    }

    pub fn fit_all(&mut self) {
        self.viewport.fit_all(self.points.len());
    }

    pub fn drag_start(&mut self, value: usize) {
        self.viewport.drag_start(value, self.points.len());
    }

    pub fn drag_end(&mut self, value: usize) {
        self.viewport.drag_end(value, self.points.len());
    }

    pub fn set_range(&mut self, start: usize, end: usize) {
        self.viewport.set_range(start, end, self.points.len());
    }

    pub fn set_stride(&mut self, stride: usize) {
        self.stride = SamplingStride::new(stride);
    }

    /// Index of the point closest in time to `target`. Ties go to the lowest
    /// index.
    pub fn nearest_index(&self, target: DateTime<Utc>) -> Option<usize> {
        // Linear scan; the sequence is sorted, so a binary search would also do.
        let mut best: Option<(usize, i64)> = None;
        for point in &self.points {
            let distance = (point.timestamp - target).num_milliseconds().abs();
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((point.index, distance)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Centre the window on the point nearest `target` and lock it.
    /// Returns the chosen index, or `None` for an empty sequence.
    pub fn jump_to_date(&mut self, target: DateTime<Utc>) -> Option<usize> {
        let index = self.nearest_index(target)?;
        self.viewport.jump_to(index, self.points.len());
        self.selection.lock_on(index);
        self.summary = Summary::from_point(self.points.get(index));
        Some(index)
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn pointer_enter(&mut self, index: usize) {
        if index >= self.points.len() {
            return;
        }
        self.selection.pointer_enter(index);
        if !self.selection.is_locked() {
            self.summary = Summary::from_point(self.points.get(index));
        }
    }

    pub fn pointer_leave(&mut self) {
        self.selection.pointer_leave();
        if !self.selection.is_locked() {
            self.summary = Summary::from_point(self.points.last());
        }
    }

    /// Toggle the lock on the hovered point
    pub fn click(&mut self) {
        self.selection.click();
        self.summary = Summary::from_point(
            self.selection
                .highlighted()
                .and_then(|index| self.points.get(index))
                .or(self.points.last()),
        );
    }

    /// Move the lock one point left or right
    pub fn nudge(&mut self, direction: Direction) {
        self.selection.nudge(direction, self.points.len());
        if let Some(index) = self.selection.locked_index() {
            self.summary = Summary::from_point(self.points.get(index));
        }
    }

    pub fn unlock(&mut self) {
        self.selection.unlock();
        let current = self
            .selection
            .hover()
            .and_then(|index| self.points.get(index))
            .or(self.points.last());
        self.summary = Summary::from_point(current);
    }

    // ------------------------------------------------------------------------
    // Refresh & export
    // ------------------------------------------------------------------------

    /// Merge a freshly fetched canonical sequence.
    ///
    /// Nothing changes unless the trailing identifier differs from the last
    /// one accepted.
    pub fn apply_refresh(&mut self, points: Vec<MeasurementPoint>) -> RefreshOutcome {
        if !self.tracker.is_new(&points) {
            debug!("Refresh ignored: trailing id unchanged");
            return RefreshOutcome::Unchanged;
        }

        let previous_len = self.points.len();
        let new_len = points.len();
        self.tracker.accept(&points);
        self.points = points;

        // A window over nothing starts over from the preset
        let followed_edge = if previous_len == 0 {
            self.viewport.set_preset(self.preset, new_len);
            new_len > 0
        } else {
            reconcile_window(&mut self.viewport, previous_len, new_len)
        };
        self.selection.clamp(new_len);

        if let Some(index) = self.selection.locked_index() {
            self.summary = Summary::from_point(self.points.get(index));
        } else {
            self.summary = Summary::from_point(self.points.last());
        }

        debug!(
            previous_len,
            new_len, followed_edge, "Refresh applied to viewport"
        );
        RefreshOutcome::Updated {
            previous_len,
            new_len,
            followed_edge,
        }
    }

    pub fn export_csv(&self, scope: ExportScope) -> String {
        match scope {
            ExportScope::All => to_csv(&self.points),
            ExportScope::Visible => to_csv(self.visible_points()),
        }
    }
}
