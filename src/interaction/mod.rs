//! Pointer helpers feeding index-based requests into the engine.

mod selector;

pub use selector::{SelectorHandle, WindowSelector};

use serde::{Deserialize, Serialize};

use crate::core::{Rect, SeriesId};

/// Outbound notifications for the host UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartEvent {
    /// A selector drag step moved the visible window.
    WindowChanged { min_x_index: usize, max_x_index: usize },
    SeriesToggled { id: SeriesId, visible: bool },
}

/// Index whose point is nearest to pixel `x` in a chart spanning `[min_x_index, max_x_index]`.
///
/// Positions outside `rect` clamp to the window edges.
#[must_use]
pub fn index_at_position(
    x: f64,
    rect: Rect,
    min_x_index: usize,
    max_x_index: usize,
) -> Option<usize> {
    if !x.is_finite() || !rect.is_valid() || min_x_index > max_x_index {
        return None;
    }
    let span = max_x_index - min_x_index;
    if span == 0 {
        return Some(min_x_index);
    }
    let ratio = ((x - rect.left()) / rect.width).clamp(0.0, 1.0);
    Some(min_x_index + (ratio * span as f64).round() as usize)
}

/// Index of the bar slot under pixel `x`; every index owns an equal-width slot.
#[must_use]
pub fn bar_index_at_position(
    x: f64,
    rect: Rect,
    min_x_index: usize,
    max_x_index: usize,
) -> Option<usize> {
    if !x.is_finite() || !rect.is_valid() || min_x_index > max_x_index {
        return None;
    }
    let slots = max_x_index - min_x_index + 1;
    let ratio = ((x - rect.left()) / rect.width).clamp(0.0, 1.0);
    let slot = ((ratio * slots as f64).floor() as usize).min(slots - 1);
    Some(min_x_index + slot)
}

#[cfg(test)]
mod tests {
    use super::{bar_index_at_position, index_at_position};
    use crate::core::Rect;

    #[test]
    fn maps_pixels_to_nearest_index() {
        let rect = Rect::new(10.0, 0.0, 100.0, 50.0);
        assert_eq!(index_at_position(10.0, rect, 20, 30), Some(20));
        assert_eq!(index_at_position(110.0, rect, 20, 30), Some(30));
        assert_eq!(index_at_position(54.0, rect, 20, 30), Some(24));
        assert_eq!(index_at_position(-500.0, rect, 20, 30), Some(20));
        assert_eq!(index_at_position(f64::NAN, rect, 20, 30), None);
        assert_eq!(index_at_position(50.0, rect, 7, 7), Some(7));
    }

    #[test]
    fn maps_pixels_to_bar_slots() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(bar_index_at_position(0.0, rect, 0, 3), Some(0));
        assert_eq!(bar_index_at_position(49.0, rect, 0, 3), Some(1));
        assert_eq!(bar_index_at_position(100.0, rect, 0, 3), Some(3));
    }
}
