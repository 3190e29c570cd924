use std::any::Any;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::bounds::{WindowedSum, split_shares, whole_percents};
use crate::core::{Bounds, ChartLinesData, Coordinate, Point, Rect, SeriesId};
use crate::error::ChartResult;
use crate::render::{ArcPrimitive, Color, Surface, TextHAlign, TextPrimitive};

use super::{DrawerCore, Layer, LayerPass, Scene};

const LABEL_RADIUS_RATIO: f64 = 0.65;

/// One built wedge.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub id: SeriesId,
    pub start_angle: f64,
    pub sweep_angle: f64,
    /// Share of the window total in `0.0..=1.0`.
    pub share: f64,
    /// Whole-percent label; all slices add up to 100.
    pub percent: u32,
    pub color: Color,
}

/// Pie of each series' total over the visible window.
///
/// Totals are kept as windowed incremental sums, so moving the window costs
/// only the indices that entered or left it.
#[derive(Debug, Clone)]
pub struct PieLayer<X: Coordinate, Y: Coordinate> {
    core: DrawerCore<X, Y>,
    sums: Vec<WindowedSum<Y>>,
    slices: Vec<PieSlice>,
    center: Point,
    radius: f64,
}

impl<X: Coordinate, Y: Coordinate> Default for PieLayer<X, Y> {
    fn default() -> Self {
        Self {
            core: DrawerCore::new(),
            sums: Vec::new(),
            slices: Vec::new(),
            center: Point::new(0.0, 0.0),
            radius: 0.0,
        }
    }
}

impl<X: Coordinate, Y: Coordinate> PieLayer<X, Y> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn slices(&self) -> &[PieSlice] {
        &self.slices
    }

    /// Running window total of the series at `slot`.
    #[must_use]
    pub fn window_sum(&self, slot: usize) -> Option<Y> {
        self.sums.get(slot).map(WindowedSum::sum)
    }
}

impl<X: Coordinate, Y: Coordinate> Layer<X, Y> for PieLayer<X, Y> {
    fn name(&self) -> &'static str {
        "pie-points"
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

    fn attach(&mut self, data: Arc<ChartLinesData<X, Y>>, bounds: Bounds<Y>) {
        self.sums = vec![WindowedSum::new(); data.lines().len()];
        self.slices.clear();
        self.core.attach(data, bounds);
    }

    fn rebuild(
        &mut self,
        scene: &Scene<'_, Y>,
        rect: Rect,
        _surface: &dyn Surface,
    ) -> ChartResult<()> {
        self.slices.clear();
        let (Some(data), Some(bounds)) = (self.core.data().cloned(), self.core.bounds()) else {
            return Ok(());
        };
        let lines = data.lines();
        if self.sums.len() != lines.len() {
            self.sums = vec![WindowedSum::new(); lines.len()];
        }

        let mut entries: SmallVec<[(Y, f64); 8]> = SmallVec::with_capacity(lines.len());
        for (line, sum) in lines.iter().zip(self.sums.iter_mut()) {
            let total = sum.update(line.points(), bounds.min_x_index, bounds.max_x_index)?;
            entries.push((total, scene.visibility.weight(line.id())));
        }
        let shares = split_shares(&entries);
        let percents = whole_percents(&shares);

        self.center = Point::new(rect.center_x(), rect.top() + rect.height / 2.0);
        let half_side = rect.width.min(rect.height) / 2.0;
        self.radius = (half_side - scene.style.detail_padding_px).max(0.0);
        let mut angle = -FRAC_PI_2;
        for (slot, line) in lines.iter().enumerate() {
            let share = shares[slot];
            if share <= 0.0 {
                continue;
            }
            let sweep = share * TAU;
            self.slices.push(PieSlice {
                id: line.id().clone(),
                start_angle: angle,
                sweep_angle: sweep,
                share,
                percent: percents[slot],
                color: line.color(),
            });
            angle += sweep;
        }
        Ok(())
    }

    fn draw(&self, scene: &Scene<'_, Y>, surface: &mut dyn Surface) -> ChartResult<()> {
        for slice in &self.slices {
            surface.draw_arc(&ArcPrimitive {
                center: self.center,
                radius: self.radius,
                start_angle: slice.start_angle,
                sweep_angle: slice.sweep_angle,
                fill: slice.color,
                wedge: true,
            })?;
        }
        for slice in self.slices.iter().filter(|slice| slice.percent > 0) {
            let middle = slice.start_angle + slice.sweep_angle / 2.0;
            let distance = self.radius * LABEL_RADIUS_RATIO;
            surface.draw_text(&TextPrimitive::new(
                format!("{}%", slice.percent),
                self.center.x + distance * middle.cos(),
                self.center.y + distance * middle.sin() + scene.style.font_size_px / 2.0,
                scene.style.font_size_px,
                Color::rgb(1.0, 1.0, 1.0),
                TextHAlign::Center,
            ))?;
        }
        Ok(())
    }

    fn on_alpha_changed(&mut self) {
        self.core.invalidate();
    }
}
