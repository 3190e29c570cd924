use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Rect, validate_window};
use crate::error::{ChartError, ChartResult};

use super::ChartEvent;

/// Part of the overview selection being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorHandle {
    Left,
    Right,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    handle: SelectorHandle,
    origin_index: f64,
    origin_window: (usize, usize),
}

/// Overview window selector drag state machine.
///
/// The overview spans the whole data set. Dragging an edge resizes the
/// window, dragging the body pans it; the window never gets narrower than
/// `min_width` indices.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSelector {
    len: usize,
    min_width: usize,
    window: (usize, usize),
    grip_px: f64,
    drag: Option<DragState>,
}

impl WindowSelector {
    pub fn new(
        len: usize,
        min_x_index: usize,
        max_x_index: usize,
        min_width: usize,
        grip_px: f64,
    ) -> ChartResult<Self> {
        validate_window(min_x_index, max_x_index, len)?;
        if !grip_px.is_finite() || grip_px < 0.0 {
            return Err(ChartError::InvalidData(
                "selector grip must be finite and >= 0".to_owned(),
            ));
        }
        Ok(Self {
            len,
            min_width: min_width.min(len - 1),
            window: (min_x_index, max_x_index),
            grip_px,
            drag: None,
        })
    }

    #[must_use]
    pub fn window(&self) -> (usize, usize) {
        self.window
    }

    #[must_use]
    pub fn dragging(&self) -> Option<SelectorHandle> {
        self.drag.map(|drag| drag.handle)
    }

    /// Syncs the selection with a window set by the host.
    pub fn set_window(&mut self, min_x_index: usize, max_x_index: usize) -> ChartResult<()> {
        validate_window(min_x_index, max_x_index, self.len)?;
        self.window = (min_x_index, max_x_index);
        Ok(())
    }

    /// Handle under pixel `x` of the overview `rect`.
    #[must_use]
    pub fn handle_at(&self, x: f64, rect: Rect) -> Option<SelectorHandle> {
        if !x.is_finite() || !rect.is_valid() {
            return None;
        }
        let left = self.index_to_x(self.window.0, rect);
        let right = self.index_to_x(self.window.1, rect);
        if (x - left).abs() <= self.grip_px {
            Some(SelectorHandle::Left)
        } else if (x - right).abs() <= self.grip_px {
            Some(SelectorHandle::Right)
        } else if x > left && x < right {
            Some(SelectorHandle::Body)
        } else {
            None
        }
    }

    pub fn begin_drag(&mut self, x: f64, rect: Rect) -> Option<SelectorHandle> {
        let handle = self.handle_at(x, rect)?;
        self.drag = Some(DragState {
            handle,
            origin_index: self.x_to_index(x, rect),
            origin_window: self.window,
        });
        Some(handle)
    }

    /// Moves the active drag to `x`; returns an event when the window changed.
    pub fn drag_to(&mut self, x: f64, rect: Rect) -> Option<ChartEvent> {
        let drag = self.drag?;
        if !x.is_finite() || !rect.is_valid() {
            return None;
        }
        let delta = (self.x_to_index(x, rect) - drag.origin_index).round() as i64;
        let (origin_min, origin_max) = drag.origin_window;
        let last = self.len - 1;
        let next = match drag.handle {
            SelectorHandle::Left => {
                let limit = origin_max.saturating_sub(self.min_width);
                (offset(origin_min, delta).min(limit), origin_max)
            }
            SelectorHandle::Right => {
                let limit = (origin_min + self.min_width).min(last);
                (origin_min, offset(origin_max, delta).clamp(limit, last))
            }
            SelectorHandle::Body => {
                let width = origin_max - origin_min;
                let min = offset(origin_min, delta).min(last - width);
                (min, min + width)
            }
        };
        if next == self.window {
            return None;
        }
        self.window = next;
        debug!(
            min_x_index = next.0,
            max_x_index = next.1,
            handle = ?drag.handle,
            "selector window changed"
        );
        Some(ChartEvent::WindowChanged {
            min_x_index: next.0,
            max_x_index: next.1,
        })
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    fn index_to_x(&self, index: usize, rect: Rect) -> f64 {
        let last = self.len.saturating_sub(1);
        if last == 0 {
            return rect.center_x();
        }
        rect.left() + index as f64 / last as f64 * rect.width
    }

    fn x_to_index(&self, x: f64, rect: Rect) -> f64 {
        let last = self.len.saturating_sub(1);
        if last == 0 || rect.width <= 0.0 {
            return 0.0;
        }
        (x - rect.left()) / rect.width * last as f64
    }
}

fn offset(index: usize, delta: i64) -> usize {
    if delta >= 0 {
        index.saturating_add(delta.unsigned_abs() as usize)
    } else {
        index.saturating_sub(delta.unsigned_abs() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectorHandle, WindowSelector};
    use crate::core::Rect;
    use crate::interaction::ChartEvent;

    fn overview() -> Rect {
        Rect::new(0.0, 0.0, 99.0, 40.0)
    }

    #[test]
    fn picks_handles_by_position() {
        let selector = WindowSelector::new(100, 20, 40, 5, 3.0).expect("selector");
        assert_eq!(selector.handle_at(21.0, overview()), Some(SelectorHandle::Left));
        assert_eq!(selector.handle_at(38.0, overview()), Some(SelectorHandle::Right));
        assert_eq!(selector.handle_at(30.0, overview()), Some(SelectorHandle::Body));
        assert_eq!(selector.handle_at(80.0, overview()), None);
    }

    #[test]
    fn body_drag_pans_and_clamps() {
        let mut selector = WindowSelector::new(100, 20, 40, 5, 3.0).expect("selector");
        assert_eq!(selector.begin_drag(30.0, overview()), Some(SelectorHandle::Body));
        assert_eq!(
            selector.drag_to(40.0, overview()),
            Some(ChartEvent::WindowChanged {
                min_x_index: 30,
                max_x_index: 50
            })
        );
        assert_eq!(selector.drag_to(40.4, overview()), None);
        selector.drag_to(500.0, overview());
        assert_eq!(selector.window(), (79, 99));
        selector.drag_to(-500.0, overview());
        assert_eq!(selector.window(), (0, 20));
        selector.end_drag();
        assert_eq!(selector.drag_to(10.0, overview()), None);
    }

    #[test]
    fn edge_drags_respect_minimum_width() {
        let mut selector = WindowSelector::new(100, 20, 40, 5, 3.0).expect("selector");
        selector.begin_drag(20.0, overview());
        selector.drag_to(90.0, overview());
        assert_eq!(selector.window(), (35, 40));
        selector.end_drag();

        selector.begin_drag(40.0, overview());
        selector.drag_to(0.0, overview());
        assert_eq!(selector.window(), (35, 40));
        selector.drag_to(200.0, overview());
        assert_eq!(selector.window(), (35, 99));
    }
}
