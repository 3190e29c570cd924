use std::any::Any;

use crate::core::{Coordinate, Rect, SeriesId};
use crate::error::ChartResult;
use crate::render::{Color, RectPrimitive, Surface};

use super::{DrawerCore, Layer, LayerPass, Scene};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bar {
    rect: Rect,
    color: Color,
}

/// Bars per index, stacked in declared order when the data is stacked.
///
/// A fading series contributes its value scaled by its opacity, so the stack
/// shrinks smoothly instead of jumping when a series is toggled.
#[derive(Debug, Clone)]
pub struct BarLayer<X: Coordinate, Y: Coordinate> {
    core: DrawerCore<X, Y>,
    bars: Vec<(SeriesId, Bar)>,
}

impl<X: Coordinate, Y: Coordinate> Default for BarLayer<X, Y> {
    fn default() -> Self {
        Self {
            core: DrawerCore::new(),
            bars: Vec::new(),
        }
    }
}

impl<X: Coordinate, Y: Coordinate> BarLayer<X, Y> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Built rectangles of `id` in index order.
    pub fn rects_of<'a>(&'a self, id: &'a SeriesId) -> impl Iterator<Item = Rect> + 'a {
        self.bars
            .iter()
            .filter(move |(owner, _)| owner == id)
            .map(|(_, bar)| bar.rect)
    }
}

impl<X: Coordinate, Y: Coordinate> Layer<X, Y> for BarLayer<X, Y> {
    fn name(&self) -> &'static str {
        "bar-points"
    }

    fn pass(&self) -> LayerPass {
        LayerPass::Points
    }

    fn core(&self) -> &DrawerCore<X, Y> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DrawerCore<X, Y> {
        &mut self.core
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn rebuild(
        &mut self,
        scene: &Scene<'_, Y>,
        rect: Rect,
        _surface: &dyn Surface,
    ) -> ChartResult<()> {
        self.bars.clear();
        let (Some(data), Some(bounds)) = (self.core.data().cloned(), self.core.bounds()) else {
            return Ok(());
        };
        data.validate_window(bounds.min_x_index, bounds.max_x_index)?;

        let projection = bounds.projection(rect);
        let stacked = data.stacked();
        let gap_ratio = scene.style.bar_gap_ratio;
        for index in bounds.min_x_index..=bounds.max_x_index {
            let (slot_left, slot_width) = projection.bar_slot(index);
            let gap = slot_width * gap_ratio;
            let mut base = Y::zero();
            for line in data.lines() {
                let weight = scene.visibility.weight(line.id());
                if weight <= 0.0 {
                    continue;
                }
                let value = line.value(index).get_part(weight);
                let bottom = if stacked { base } else { Y::zero() };
                let top = bottom.add(value);
                let y_top = projection.value_to_y(top);
                let y_bottom = projection.value_to_y(bottom);
                self.bars.push((
                    line.id().clone(),
                    Bar {
                        rect: Rect::new(
                            slot_left + gap / 2.0,
                            y_top.min(y_bottom),
                            slot_width - gap,
                            (y_bottom - y_top).abs(),
                        ),
                        color: line.color(),
                    },
                ));
                if stacked {
                    base = top;
                }
            }
        }
        Ok(())
    }

    fn draw(&self, scene: &Scene<'_, Y>, surface: &mut dyn Surface) -> ChartResult<()> {
        for (id, bar) in &self.bars {
            if !scene.visibility.is_drawn(id) {
                continue;
            }
            surface.draw_rect(&RectPrimitive::filled(bar.rect, bar.color))?;
        }
        Ok(())
    }

    // Fading series scale their stacked contribution.
    fn on_alpha_changed(&mut self) {
        self.core.invalidate();
    }
}
