//! Viewport index window over the canonical sequence.
//!
//! Every operation takes the current sequence length `len` and leaves the
//! window satisfying `start <= end <= len - 1` (both 0 when `len == 0`).

use std::fmt;

/// Minimum window size used when jumping to a date
pub const JUMP_MIN_WINDOW: usize = 5;

/// "Show last N" preset choices offered in the UI
pub const SHOW_LAST_PRESETS: &[ShowLast] = &[
    ShowLast::Last(5),
    ShowLast::Last(10),
    ShowLast::Last(20),
    ShowLast::Last(50),
    ShowLast::Last(100),
    ShowLast::Last(200),
    ShowLast::All,
];

/// How many trailing points a preset shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowLast {
    Last(usize),
    All,
}

impl Default for ShowLast {
    fn default() -> Self {
        ShowLast::Last(50)
    }
}

impl fmt::Display for ShowLast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowLast::Last(n) => write!(f, "{}", n),
            ShowLast::All => write!(f, "All"),
        }
    }
}

/// Direction for panning and lock nudging
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Contiguous index range eligible for rendering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    start: usize,
    end: usize,
}

impl Viewport {
    /// Window built from a preset over a sequence of `len` points
    pub fn with_preset(preset: ShowLast, len: usize) -> Self {
        let mut viewport = Self::default();
        viewport.set_preset(preset, len);
        viewport
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of indices covered by the window (at least 1)
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Whether `index` lies inside the window
    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    /// Whether the window ends on the live edge of a sequence of `len` points
    pub fn tracks_edge(&self, len: usize) -> bool {
        len > 0 && self.end == len - 1
    }

    /// Apply a "show last N" preset
    pub fn set_preset(&mut self, preset: ShowLast, len: usize) {
        if len == 0 {
            self.collapse();
            return;
        }
        match preset {
            ShowLast::Last(n) if n < len => {
                self.start = len - n.max(1);
                self.end = len - 1;
            }
            _ => self.fit_all(len),
        }
    }

    /// Halve the window (rounding up, minimum 1), keeping `end` fixed
    pub fn zoom_in(&mut self, len: usize) {
        if len == 0 {
            self.collapse();
            return;
        }
        self.clamp(len);
        let new_len = self.len().div_ceil(2).max(1);
        self.start = self.end + 1 - new_len;
    }

    /// Double the window (capped at `len`), anchored at `end` when possible
    pub fn zoom_out(&mut self, len: usize) {
        if len == 0 {
            self.collapse();
            return;
        }
        self.clamp(len);
        let new_len = (self.len() * 2).min(len);
        self.start = (self.end + 1).saturating_sub(new_len);
        self.end = (self.start + new_len - 1).min(len - 1);
    }

    /// Shift the window by a third of its length (at least one step)
    pub fn pan(&mut self, direction: Direction, len: usize) {
        if len == 0 {
            self.collapse();
            return;
        }
        self.clamp(len);
        let width = self.len();
        let shift = (width / 3).max(1);
        match direction {
            Direction::Left => {
                self.start = self.start.saturating_sub(shift);
                self.end = (self.start + width - 1).min(len - 1);
            }
            Direction::Right => {
                self.end = (self.end + shift).min(len - 1);
                self.start = (self.end + 1).saturating_sub(width);
            }
        }
    }

    pub fn pan_left(&mut self, len: usize) {
        self.pan(Direction::Left, len);
    }

    pub fn pan_right(&mut self, len: usize) {
        self.pan(Direction::Right, len);
    }

    /// Show the whole sequence
    pub fn fit_all(&mut self, len: usize) {
        if len == 0 {
            self.collapse();
            return;
        }
        self.start = 0;
        self.end = len - 1;
    }

    /// Centre a window of at least [`JUMP_MIN_WINDOW`] points on `index`
    pub fn jump_to(&mut self, index: usize, len: usize) {
        if len == 0 {
            self.collapse();
            return;
        }
        self.clamp(len);
        let index = index.min(len - 1);
        let size = self.len().max(JUMP_MIN_WINDOW).min(len);
        let start = index.saturating_sub(size / 2).min(len - size);
        self.start = start;
        self.end = start + size - 1;
    }

    /// Move the start bound; it never passes the end bound
    pub fn drag_start(&mut self, value: usize, len: usize) {
        if len == 0 {
            self.collapse();
            return;
        }
        self.clamp(len);
        self.start = value.min(self.end);
    }

    /// Move the end bound; it never passes the start bound
    pub fn drag_end(&mut self, value: usize, len: usize) {
        if len == 0 {
            self.collapse();
            return;
        }
        self.clamp(len);
        self.end = value.max(self.start).min(len - 1);
    }

    /// Set both bounds at once (chart brush), ordering them if needed
    pub fn set_range(&mut self, start: usize, end: usize, len: usize) {
        if len == 0 {
            self.collapse();
            return;
        }
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        self.end = hi.min(len - 1);
        self.start = lo.min(self.end);
    }

    /// Follow a grown live edge: the window slides so `end` lands on the new
    /// last index. A window anchored at 0 keeps covering from the start.
    pub fn follow_edge(&mut self, new_len: usize) {
        if new_len == 0 {
            self.collapse();
            return;
        }
        let width = self.len();
        self.end = new_len - 1;
        if self.start != 0 {
            self.start = new_len.saturating_sub(width);
        }
    }

    /// Re-establish the window invariant for a sequence of `len` points
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.collapse();
            return;
        }
        self.end = self.end.min(len - 1);
        self.start = self.start.min(self.end);
    }

    fn collapse(&mut self) {
        self.start = 0;
        self.end = 0;
    }
}
