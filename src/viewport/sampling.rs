//! Decimation of the windowed points for rendering.

use super::measurement::MeasurementPoint;

/// Largest sampling stride offered by the UI
pub const MAX_STRIDE: usize = 20;

/// Keep-every-Nth factor, always within `1..=MAX_STRIDE`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplingStride(usize);

impl SamplingStride {
    pub fn new(stride: usize) -> Self {
        Self(stride.clamp(1, MAX_STRIDE))
    }

    #[inline]
    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for SamplingStride {
    fn default() -> Self {
        Self(1)
    }
}

/// Select the points of `window` (which starts at absolute index
/// `window_start`) to render.
///
/// With a stride of 1 every point is kept. Otherwise a point is kept when its
/// position relative to the window start is a multiple of the stride, or when
/// its absolute index equals `pinned`.
pub fn decimate(
    window: &[MeasurementPoint],
    window_start: usize,
    stride: SamplingStride,
    pinned: Option<usize>,
) -> Vec<&MeasurementPoint> {
    let step = stride.get();
    if step <= 1 {
        return window.iter().collect();
    }

    window
        .iter()
        .enumerate()
        .filter(|(relative, _)| {
            relative % step == 0 || pinned == Some(window_start + relative)
        })
        .map(|(_, point)| point)
        .collect()
}
