use std::any::Any;

use crate::core::{Coordinate, Point, Rect, SeriesId};
use crate::error::ChartResult;
use crate::render::{Color, Stroke, Surface};

use super::{DrawerCore, Layer, LayerPass, Scene};

#[derive(Debug, Clone, PartialEq)]
struct Polyline {
    id: SeriesId,
    color: Color,
    points: Vec<Point>,
}

/// One polyline per drawn series.
///
/// In scaled mode every series is projected through its own animated bounds
/// instead of the shared Y range.
#[derive(Debug, Clone)]
pub struct LinePointsLayer<X: Coordinate, Y: Coordinate> {
    core: DrawerCore<X, Y>,
    scaled: bool,
    polylines: Vec<Polyline>,
}

impl<X: Coordinate, Y: Coordinate> LinePointsLayer<X, Y> {
    #[must_use]
    pub fn plain() -> Self {
        Self {
            core: DrawerCore::new(),
            scaled: false,
            polylines: Vec::new(),
        }
    }

    #[must_use]
    pub fn scaled() -> Self {
        Self {
            scaled: true,
            ..Self::plain()
        }
    }

    #[must_use]
    pub fn is_scaled(&self) -> bool {
        self.scaled
    }

    /// Built vertices of `id`, if the series is drawn.
    #[must_use]
    pub fn vertices(&self, id: &SeriesId) -> Option<&[Point]> {
        self.polylines
            .iter()
            .find(|polyline| &polyline.id == id)
            .map(|polyline| polyline.points.as_slice())
    }
}

impl<X: Coordinate, Y: Coordinate> Layer<X, Y> for LinePointsLayer<X, Y> {
    fn name(&self) -> &'static str {
        if self.scaled { "scaled-line-points" } else { "line-points" }
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
        self.polylines.clear();
        let (Some(data), Some(bounds)) = (self.core.data().cloned(), self.core.bounds()) else {
            return Ok(());
        };
        data.validate_window(bounds.min_x_index, bounds.max_x_index)?;

        for line in data.lines() {
            if !scene.visibility.is_drawn(line.id()) {
                continue;
            }
            let line_bounds = if self.scaled {
                scene.series_bounds_or(line.id(), bounds)
            } else {
                bounds
            };
            let projection = line_bounds.projection(rect);
            let points = (bounds.min_x_index..=bounds.max_x_index)
                .map(|index| {
                    Point::new(
                        projection.index_to_x(index as f64),
                        projection.value_to_y(line.value(index)),
                    )
                })
                .collect();
            self.polylines.push(Polyline {
                id: line.id().clone(),
                color: line.color(),
                points,
            });
        }
        Ok(())
    }

    fn draw(&self, scene: &Scene<'_, Y>, surface: &mut dyn Surface) -> ChartResult<()> {
        for polyline in &self.polylines {
            let alpha = scene.visibility.alpha(&polyline.id);
            if alpha == 0 {
                continue;
            }
            let stroke = Stroke::new(scene.style.line_width, polyline.color.with_opacity(alpha));
            surface.draw_polyline(&polyline.points, stroke)?;
        }
        Ok(())
    }

    fn on_series_bounds_changed(&mut self) {
        if self.scaled {
            self.core.invalidate();
        }
    }
}
