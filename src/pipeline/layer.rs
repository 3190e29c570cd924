use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{Bounds, ChartLinesData, Coordinate, Rect, SeriesId};
use crate::error::ChartResult;
use crate::render::Surface;
use crate::transition::{BoundsAnimator, TransitionSet, VisibilityTracker};

use super::{BoundsChange, ChartStyle};

/// Z-order slot of a layer inside one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerPass {
    /// Grid and background.
    Pre,
    Points,
    /// Axis labels and overlays.
    Post,
}

impl LayerPass {
    pub const ORDER: [Self; 3] = [Self::Pre, Self::Points, Self::Post];
}

/// Read-only engine state shared by every layer for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a, Y: Coordinate> {
    /// Bounds the global transition is heading to.
    pub target: Bounds<Y>,
    /// Per-series animated bounds; only populated for scaled charts.
    pub series_bounds: &'a TransitionSet<SeriesId, BoundsAnimator<Y>>,
    pub visibility: &'a VisibilityTracker,
    pub selected: Option<usize>,
    pub style: &'a ChartStyle,
    pub now: Duration,
}

impl<Y: Coordinate> Scene<'_, Y> {
    /// Current bounds of `id` in scaled mode, with the X window of `fallback`.
    #[must_use]
    pub fn series_bounds_or(&self, id: &SeriesId, fallback: Bounds<Y>) -> Bounds<Y> {
        self.series_bounds
            .get(id)
            .map_or(fallback, |animator| {
                let current = animator.current();
                fallback.with_y(current.min_y, current.max_y)
            })
    }
}

/// State every layer carries: the attached data, its own bounds copy, a
/// dirty flag and the rectangle the geometry was last built for.
#[derive(Debug, Clone)]
pub struct DrawerCore<X: Coordinate, Y: Coordinate> {
    data: Option<Arc<ChartLinesData<X, Y>>>,
    bounds: Option<Bounds<Y>>,
    dirty: bool,
    rect: Option<Rect>,
}

impl<X: Coordinate, Y: Coordinate> Default for DrawerCore<X, Y> {
    fn default() -> Self {
        Self {
            data: None,
            bounds: None,
            dirty: true,
            rect: None,
        }
    }
}

impl<X: Coordinate, Y: Coordinate> DrawerCore<X, Y> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, data: Arc<ChartLinesData<X, Y>>, bounds: Bounds<Y>) {
        self.data = Some(data);
        self.bounds = Some(bounds);
        self.dirty = true;
        self.rect = None;
    }

    #[must_use]
    pub fn data(&self) -> Option<&Arc<ChartLinesData<X, Y>>> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds<Y>> {
        self.bounds
    }

    /// Stores `bounds`; marks the layer dirty when `change` is non-empty.
    pub fn set_bounds(&mut self, bounds: Bounds<Y>, change: BoundsChange) {
        self.bounds = Some(bounds);
        if !change.is_none() {
            self.dirty = true;
        }
    }

    /// Stores `bounds` without requesting a rebuild.
    pub fn store_bounds(&mut self, bounds: Bounds<Y>) {
        self.bounds = Some(bounds);
    }

    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.data.is_some() && self.bounds.is_some()
    }

    #[must_use]
    pub fn needs_rebuild(&self, rect: Rect) -> bool {
        self.dirty || self.rect != Some(rect)
    }

    pub fn mark_built(&mut self, rect: Rect) {
        self.dirty = false;
        self.rect = Some(rect);
    }

    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }
}

/// One independently rebuilt rendering layer.
///
/// `rebuild` is the only place geometry is derived from data and bounds; the
/// pipeline calls it at most once per frame and only when the layer is dirty
/// or the drawing rectangle changed. `draw` and `after_draw` render what the
/// last rebuild produced.
pub trait Layer<X: Coordinate, Y: Coordinate> {
    fn name(&self) -> &'static str;

    fn pass(&self) -> LayerPass;

    fn core(&self) -> &DrawerCore<X, Y>;

    fn core_mut(&mut self) -> &mut DrawerCore<X, Y>;

    fn as_any(&self) -> &dyn Any;

    fn rebuild(
        &mut self,
        scene: &Scene<'_, Y>,
        rect: Rect,
        surface: &dyn Surface,
    ) -> ChartResult<()>;

    fn draw(&self, scene: &Scene<'_, Y>, surface: &mut dyn Surface) -> ChartResult<()>;

    fn after_draw(&self, _scene: &Scene<'_, Y>, _surface: &mut dyn Surface) -> ChartResult<()> {
        Ok(())
    }

    fn attach(&mut self, data: Arc<ChartLinesData<X, Y>>, bounds: Bounds<Y>) {
        self.core_mut().attach(data, bounds);
    }

    fn on_bounds_changed(&mut self, bounds: Bounds<Y>, change: BoundsChange) {
        self.core_mut().set_bounds(bounds, change);
    }

    fn on_series_bounds_changed(&mut self) {}

    /// Requested visibility or the set of drawn series changed.
    fn on_visibility_changed(&mut self) {
        self.core_mut().invalidate();
    }

    /// Series opacity moved while the drawn set stayed the same. Layers that
    /// read alpha in `draw` ignore it.
    fn on_alpha_changed(&mut self) {}

    fn on_selection_changed(&mut self, _selected: Option<usize>) {}

    /// Advances layer-owned fades; returns whether any is still running.
    fn tick(&mut self, _now: Duration) -> bool {
        false
    }
}
