use tracing::trace;

use crate::core::{Coordinate, validate_window};
use crate::error::ChartResult;

/// Running sum of one series over a sliding index window.
///
/// Moving the window only adds the indices that entered and subtracts the
/// ones that left, so an update costs the size of the delta rather than the
/// size of the window. Disjoint moves fall back to a full rescan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowedSum<Y: Coordinate> {
    window: Option<(usize, usize)>,
    sum: Y,
}

impl<Y: Coordinate> Default for WindowedSum<Y> {
    fn default() -> Self {
        Self {
            window: None,
            sum: Y::zero(),
        }
    }
}

impl<Y: Coordinate> WindowedSum<Y> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sum(&self) -> Y {
        self.sum
    }

    #[must_use]
    pub fn window(&self) -> Option<(usize, usize)> {
        self.window
    }

    /// Forgets the cached window; the next update rescans.
    pub fn reset(&mut self) {
        self.window = None;
        self.sum = Y::zero();
    }

    /// Moves the window to `[min_index, max_index]` and returns the new sum.
    pub fn update(&mut self, points: &[Y], min_index: usize, max_index: usize) -> ChartResult<Y> {
        validate_window(min_index, max_index, points.len())?;

        match self.window {
            Some((old_min, old_max)) if old_min == min_index && old_max == max_index => {}
            Some((old_min, old_max)) if max_index >= old_min && min_index <= old_max => {
                let mut sum = self.sum;
                if min_index < old_min {
                    sum = add_range(sum, points, min_index, old_min - 1);
                } else if min_index > old_min {
                    sum = subtract_range(sum, points, old_min, min_index - 1);
                }
                if max_index > old_max {
                    sum = add_range(sum, points, old_max + 1, max_index);
                } else if max_index < old_max {
                    sum = subtract_range(sum, points, max_index + 1, old_max);
                }
                trace!(old_min, old_max, min_index, max_index, "windowed sum delta update");
                self.sum = sum;
            }
            _ => {
                self.sum = add_range(Y::zero(), points, min_index, max_index);
            }
        }

        self.window = Some((min_index, max_index));
        Ok(self.sum)
    }
}

/// Full scan of `points[min_index..=max_index]`.
#[must_use]
pub fn rescan_sum<Y: Coordinate>(points: &[Y], min_index: usize, max_index: usize) -> Y {
    add_range(Y::zero(), points, min_index, max_index)
}

fn add_range<Y: Coordinate>(mut sum: Y, points: &[Y], from: usize, to: usize) -> Y {
    for value in &points[from..=to] {
        sum = sum.add(*value);
    }
    sum
}

fn subtract_range<Y: Coordinate>(mut sum: Y, points: &[Y], from: usize, to: usize) -> Y {
    for value in &points[from..=to] {
        sum = value.distance_to(sum);
    }
    sum
}
