//! Hover and lock tracking for the highlighted point.

use super::window::Direction;

/// Whether a point is pinned by the user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LockState {
    #[default]
    Unlocked,
    Locked(usize),
}

/// Hover/lock state, both expressed as absolute indices
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    hover: Option<usize>,
    lock: LockState,
}

impl Selection {
    pub fn hover(&self) -> Option<usize> {
        self.hover
    }

    pub fn lock(&self) -> LockState {
        self.lock
    }

    pub fn locked_index(&self) -> Option<usize> {
        match self.lock {
            LockState::Locked(index) => Some(index),
            LockState::Unlocked => None,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.lock, LockState::Locked(_))
    }

    /// The point driving the summary: lock first, then hover
    pub fn highlighted(&self) -> Option<usize> {
        self.locked_index().or(self.hover)
    }

    pub fn pointer_enter(&mut self, index: usize) {
        self.hover = Some(index);
    }

    pub fn pointer_leave(&mut self) {
        self.hover = None;
    }

    /// Toggle the lock on the hovered point. Without a hover this does nothing.
    pub fn click(&mut self) {
        let Some(hovered) = self.hover else {
            return;
        };
        self.lock = match self.lock {
            LockState::Locked(current) if current == hovered => LockState::Unlocked,
            _ => LockState::Locked(hovered),
        };
    }

    /// Lock directly on `index` (date jump)
    pub fn lock_on(&mut self, index: usize) {
        self.lock = LockState::Locked(index);
    }

    pub fn unlock(&mut self) {
        self.lock = LockState::Unlocked;
    }

    /// Move the lock one step, staying within a sequence of `len` points.
    /// Has no effect while unlocked.
    pub fn nudge(&mut self, direction: Direction, len: usize) {
        let LockState::Locked(current) = self.lock else {
            return;
        };
        if len == 0 {
            return;
        }
        let moved = match direction {
            Direction::Left => current.saturating_sub(1),
            Direction::Right => (current + 1).min(len - 1),
        };
        self.lock = LockState::Locked(moved);
    }

    /// Drop or clamp indices that fell outside a sequence of `len` points
    pub fn clamp(&mut self, len: usize) {
        if self.hover.is_some_and(|h| h >= len) {
            self.hover = None;
        }
        if let LockState::Locked(index) = self.lock {
            self.lock = if len == 0 {
                LockState::Unlocked
            } else {
                LockState::Locked(index.min(len - 1))
            };
        }
    }
}
