use std::any::Any;

use smallvec::SmallVec;

use crate::bounds::split_shares;
use crate::core::{Coordinate, Point, Rect, SeriesId};
use crate::error::ChartResult;
use crate::render::{Color, Surface};

use super::{DrawerCore, Layer, LayerPass, Scene};

#[derive(Debug, Clone, PartialEq)]
struct Band {
    id: SeriesId,
    color: Color,
    polygon: Vec<Point>,
}

/// Stacked 0..100% bands, first series at the bottom.
#[derive(Debug, Clone)]
pub struct PercentageAreaLayer<X: Coordinate, Y: Coordinate> {
    core: DrawerCore<X, Y>,
    bands: Vec<Band>,
}

impl<X: Coordinate, Y: Coordinate> Default for PercentageAreaLayer<X, Y> {
    fn default() -> Self {
        Self {
            core: DrawerCore::new(),
            bands: Vec::new(),
        }
    }
}

impl<X: Coordinate, Y: Coordinate> PercentageAreaLayer<X, Y> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Built outline of `id`: upper edge left to right, then lower edge back.
    #[must_use]
    pub fn polygon(&self, id: &SeriesId) -> Option<&[Point]> {
        self.bands
            .iter()
            .find(|band| &band.id == id)
            .map(|band| band.polygon.as_slice())
    }
}

impl<X: Coordinate, Y: Coordinate> Layer<X, Y> for PercentageAreaLayer<X, Y> {
    fn name(&self) -> &'static str {
        "percentage-area-points"
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
        self.bands.clear();
        let (Some(data), Some(bounds)) = (self.core.data().cloned(), self.core.bounds()) else {
            return Ok(());
        };
        data.validate_window(bounds.min_x_index, bounds.max_x_index)?;

        let lines = data.lines();
        let window = bounds.max_x_index - bounds.min_x_index + 1;
        let mut upper: Vec<Vec<Point>> = vec![Vec::with_capacity(window); lines.len()];
        let mut lower: Vec<Vec<Point>> = vec![Vec::with_capacity(window); lines.len()];
        let weights: SmallVec<[f64; 8]> = lines
            .iter()
            .map(|line| scene.visibility.weight(line.id()))
            .collect();
        let projection = bounds.projection(rect);
        let mut entries: SmallVec<[(Y, f64); 8]> = SmallVec::with_capacity(lines.len());

        for index in bounds.min_x_index..=bounds.max_x_index {
            entries.clear();
            entries.extend(
                lines
                    .iter()
                    .zip(weights.iter())
                    .map(|(line, weight)| (line.value(index), *weight)),
            );
            let shares = split_shares(&entries);
            let x = projection.index_to_x(index as f64);
            let mut accumulated = 0.0_f64;
            for (slot, share) in shares.iter().enumerate() {
                lower[slot].push(Point::new(x, rect.bottom() - accumulated * rect.height));
                accumulated = (accumulated + share).min(1.0);
                upper[slot].push(Point::new(x, rect.bottom() - accumulated * rect.height));
            }
        }

        for (slot, line) in lines.iter().enumerate() {
            if !scene.visibility.is_drawn(line.id()) {
                continue;
            }
            let mut polygon = std::mem::take(&mut upper[slot]);
            polygon.extend(lower[slot].iter().rev().copied());
            self.bands.push(Band {
                id: line.id().clone(),
                color: line.color(),
                polygon,
            });
        }
        Ok(())
    }

    fn draw(&self, _scene: &Scene<'_, Y>, surface: &mut dyn Surface) -> ChartResult<()> {
        for band in &self.bands {
            surface.fill_polygon(&band.polygon, band.color)?;
        }
        Ok(())
    }

    // Shares are weighted by opacity.
    fn on_alpha_changed(&mut self) {
        self.core.invalidate();
    }
}
