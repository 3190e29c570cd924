//! Drawer pipeline: independently rebuilt layers composed in three passes.

mod area;
mod bar;
mod detail;
mod grid;
mod invalidation;
mod layer;
mod line;
mod pie;
mod style;
mod x_axis;

pub use area::PercentageAreaLayer;
pub use bar::BarLayer;
pub use detail::DetailOverlayLayer;
pub use grid::{GridLayer, GridMode};
pub use invalidation::BoundsChange;
pub use layer::{DrawerCore, Layer, LayerPass, Scene};
pub use line::LinePointsLayer;
pub use pie::{PieLayer, PieSlice};
pub use style::ChartStyle;
pub use x_axis::XAxisLabelLayer;

use std::sync::Arc;
use std::time::Duration;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::{Bounds, ChartKind, ChartLinesData, Coordinate, Rect};
use crate::error::{ChartError, ChartResult};
use crate::labels::LabelDensityConfig;
use crate::render::Surface;
use crate::transition::Easing;

/// Layer construction parameters taken from the engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSettings {
    pub y_grid_rows: usize,
    pub grid_fade: Duration,
    pub easing: Easing,
    pub labels: LabelDensityConfig,
}

/// What one composed frame did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Names of the layers rebuilt for this frame, in draw order.
    pub rebuilt: SmallVec<[&'static str; 8]>,
    pub drawn: usize,
}

/// Registry of layers sharing one data snapshot and one drawing area.
pub struct Pipeline<X: Coordinate, Y: Coordinate> {
    layers: Vec<Box<dyn Layer<X, Y>>>,
}

impl<X: Coordinate, Y: Coordinate> Default for Pipeline<X, Y> {
    fn default() -> Self {
        Self { layers: Vec::new() }
    }
}

impl<X: Coordinate, Y: Coordinate> std::fmt::Debug for Pipeline<X, Y> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("layers", &self.layer_names())
            .finish()
    }
}

impl<X: Coordinate, Y: Coordinate> Pipeline<X, Y> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard layer set for `kind`.
    #[must_use]
    pub fn for_kind(kind: ChartKind, settings: &LayerSettings) -> Self {
        let grid = |mode| {
            Box::new(GridLayer::<X, Y>::new(
                mode,
                settings.y_grid_rows,
                settings.grid_fade,
                settings.easing,
            )) as Box<dyn Layer<X, Y>>
        };
        let points: Box<dyn Layer<X, Y>> = match kind {
            ChartKind::Line => Box::new(LinePointsLayer::<X, Y>::plain()),
            ChartKind::ScaledLine => Box::new(LinePointsLayer::<X, Y>::scaled()),
            ChartKind::Bar | ChartKind::StackedBar => Box::new(BarLayer::<X, Y>::new()),
            ChartKind::PercentageArea => Box::new(PercentageAreaLayer::<X, Y>::new()),
            ChartKind::Pie => Box::new(PieLayer::<X, Y>::new()),
        };
        let mut layers = Vec::with_capacity(4);
        match kind {
            ChartKind::Pie => layers.push(points),
            _ => {
                let mode = match kind {
                    ChartKind::ScaledLine => GridMode::Scaled,
                    ChartKind::PercentageArea => GridMode::Percentage,
                    _ => GridMode::Plain,
                };
                layers.push(grid(mode));
                layers.push(points);
                layers.push(Box::new(XAxisLabelLayer::<X, Y>::new(settings.labels)));
                layers.push(Box::new(DetailOverlayLayer::<X, Y>::new()));
            }
        }
        Self { layers }
    }

    /// Adds a layer; names must be unique within the pipeline.
    pub fn register(&mut self, layer: Box<dyn Layer<X, Y>>) -> ChartResult<()> {
        let name = layer.name();
        if self.layers.iter().any(|entry| entry.name() == name) {
            return Err(ChartError::InvalidData(format!(
                "layer `{name}` is already registered"
            )));
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Removes a layer by name. Returns `true` when removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        if let Some(position) = self.layers.iter().position(|entry| entry.name() == name) {
            self.layers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    #[must_use]
    pub fn layer_names(&self) -> SmallVec<[&'static str; 8]> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    /// First layer of concrete type `T`.
    #[must_use]
    pub fn find<T: 'static>(&self) -> Option<&T> {
        self.layers
            .iter()
            .find_map(|layer| layer.as_any().downcast_ref::<T>())
    }

    pub fn attach(&mut self, data: &Arc<ChartLinesData<X, Y>>, bounds: Bounds<Y>) {
        for layer in &mut self.layers {
            layer.attach(Arc::clone(data), bounds);
        }
        debug!(layers = self.layers.len(), points = data.len(), "pipeline data attached");
    }

    pub fn push_bounds(&mut self, bounds: Bounds<Y>, change: BoundsChange) {
        for layer in &mut self.layers {
            layer.on_bounds_changed(bounds, change);
        }
    }

    pub fn series_bounds_changed(&mut self) {
        for layer in &mut self.layers {
            layer.on_series_bounds_changed();
        }
    }

    pub fn visibility_changed(&mut self) {
        for layer in &mut self.layers {
            layer.on_visibility_changed();
        }
    }

    pub fn alpha_changed(&mut self) {
        for layer in &mut self.layers {
            layer.on_alpha_changed();
        }
    }

    pub fn selection_changed(&mut self, selected: Option<usize>) {
        for layer in &mut self.layers {
            layer.on_selection_changed(selected);
        }
    }

    /// Advances layer-owned fades; returns whether any layer is still animating.
    pub fn tick(&mut self, now: Duration) -> bool {
        let mut running = false;
        for layer in &mut self.layers {
            running |= layer.tick(now);
        }
        running
    }

    /// Composes one frame into `rect`: pre layers, then points, then post
    /// layers, followed by every layer's `after_draw` in the same order.
    ///
    /// Layers without data are skipped. A failing layer aborts the frame.
    pub fn draw(
        &mut self,
        surface: &mut dyn Surface,
        rect: Rect,
        scene: &Scene<'_, Y>,
    ) -> ChartResult<FrameStats> {
        rect.validate()?;
        let plot = scene.style.plot_rect(rect);
        let mut stats = FrameStats::default();

        for pass in LayerPass::ORDER {
            for layer in self.layers.iter_mut().filter(|layer| layer.pass() == pass) {
                if !layer.core().is_attached() {
                    continue;
                }
                if layer.core().needs_rebuild(plot) {
                    layer.rebuild(scene, plot, &*surface)?;
                    layer.core_mut().mark_built(plot);
                    trace!(layer = layer.name(), "layer rebuilt");
                    stats.rebuilt.push(layer.name());
                }
                let clip = pass == LayerPass::Points;
                if clip {
                    surface.save();
                    surface.clip(plot);
                }
                let result = layer.draw(scene, surface);
                if clip {
                    surface.restore();
                }
                result?;
                stats.drawn += 1;
            }
        }

        for pass in LayerPass::ORDER {
            for layer in self.layers.iter().filter(|layer| layer.pass() == pass) {
                if layer.core().is_attached() {
                    layer.after_draw(scene, surface)?;
                }
            }
        }
        Ok(stats)
    }
}
