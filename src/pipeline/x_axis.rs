use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{Bounds, ChartLinesData, Coordinate, Rect};
use crate::error::ChartResult;
use crate::labels::{LabelDensity, LabelDensityConfig};
use crate::render::{Surface, TextHAlign, TextPrimitive};
use crate::transition::{TRANSPARENT, Transition};

use super::{BoundsChange, DrawerCore, Layer, LayerPass, Scene};

const BASELINE_GAP_PX: f64 = 6.0;

/// X axis labels below the plot.
///
/// Geometry depends only on the X window, so Y-only bounds changes are
/// stored without requesting a rebuild.
#[derive(Debug, Clone)]
pub struct XAxisLabelLayer<X: Coordinate, Y: Coordinate> {
    core: DrawerCore<X, Y>,
    density: LabelDensity,
    baseline: f64,
}

impl<X: Coordinate, Y: Coordinate> XAxisLabelLayer<X, Y> {
    #[must_use]
    pub fn new(config: LabelDensityConfig) -> Self {
        Self {
            core: DrawerCore::new(),
            density: LabelDensity::new(config),
            baseline: 0.0,
        }
    }

    #[must_use]
    pub fn density(&self) -> &LabelDensity {
        &self.density
    }
}

impl<X: Coordinate, Y: Coordinate> Layer<X, Y> for XAxisLabelLayer<X, Y> {
    fn name(&self) -> &'static str {
        "x-axis-labels"
    }

    fn pass(&self) -> LayerPass {
        LayerPass::Post
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
        self.density.reset();
        self.core.attach(data, bounds);
    }

    fn rebuild(
        &mut self,
        scene: &Scene<'_, Y>,
        rect: Rect,
        surface: &dyn Surface,
    ) -> ChartResult<()> {
        let (Some(data), Some(bounds)) = (self.core.data().cloned(), self.core.bounds()) else {
            return Ok(());
        };
        let font_size_px = scene.style.font_size_px;
        let measure = |text: &str| surface.measure_text(text, font_size_px);
        self.density.rebuild(
            data.x().points(),
            bounds.min_x_index,
            bounds.max_x_index,
            rect,
            scene.now,
            &measure,
        )?;
        self.baseline = rect.bottom() + font_size_px + BASELINE_GAP_PX;
        Ok(())
    }

    fn draw(&self, scene: &Scene<'_, Y>, surface: &mut dyn Surface) -> ChartResult<()> {
        let style = scene.style;
        for cell in self.density.cells().iter().chain(self.density.fading()) {
            let alpha = cell.alpha();
            if alpha == TRANSPARENT {
                continue;
            }
            surface.draw_text(&TextPrimitive::new(
                cell.text(),
                cell.x(),
                self.baseline,
                style.font_size_px,
                style.axis_text_color.with_opacity(alpha),
                TextHAlign::Center,
            ))?;
        }
        Ok(())
    }

    fn on_bounds_changed(&mut self, bounds: Bounds<Y>, change: BoundsChange) {
        if change.x_changed() {
            self.core.set_bounds(bounds, change);
        } else {
            self.core.store_bounds(bounds);
        }
    }

    fn on_visibility_changed(&mut self) {}

    fn tick(&mut self, now: Duration) -> bool {
        self.density.advance(now);
        self.density.is_running()
    }
}
