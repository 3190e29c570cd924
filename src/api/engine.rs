use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::bounds::{
    BoundsEngine, ForcedYRange, HiddenSeries, Shares, YBounds, per_line_extremes,
};
use crate::core::{Bounds, ChartKind, ChartLinesData, Coordinate, Rect, Series, SeriesId};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    ChartEvent, SelectorHandle, WindowSelector, bar_index_at_position, index_at_position,
};
use crate::labels::LabelCell;
use crate::pipeline::{FrameStats, Pipeline, Scene, XAxisLabelLayer};
use crate::render::Surface;
use crate::transition::{
    AnimationClock, BoundsAnimator, Transition, TransitionSet, VisibilityTracker,
};

use super::ChartEngineConfig;

/// Host-facing chart engine.
///
/// Owns the attached data snapshot, the global bounds transition, one bounds
/// transition per series in scaled mode, per-series visibility fades and the
/// layer pipeline. All requests are index/id based; time only moves through
/// [`ChartEngine::tick`].
#[derive(Debug)]
pub struct ChartEngine<X: Coordinate, Y: Coordinate> {
    config: ChartEngineConfig,
    clock: AnimationClock,
    data: Option<Arc<ChartLinesData<X, Y>>>,
    bounds_engine: BoundsEngine<Y>,
    bounds: Option<BoundsAnimator<Y>>,
    series_bounds: TransitionSet<SeriesId, BoundsAnimator<Y>>,
    visibility: VisibilityTracker,
    pipeline: Pipeline<X, Y>,
    selector: Option<WindowSelector>,
    selected: Option<usize>,
    pie_mode: bool,
    events: Vec<ChartEvent>,
}

impl<X: Coordinate, Y: Coordinate> ChartEngine<X, Y> {
    pub fn new(config: ChartEngineConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock: AnimationClock::new(),
            data: None,
            bounds_engine: BoundsEngine::new(),
            bounds: None,
            series_bounds: TransitionSet::new(),
            visibility: VisibilityTracker::new(config.visibility_transition(), config.easing),
            pipeline: Pipeline::new(),
            selector: None,
            selected: None,
            pie_mode: false,
            events: Vec::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    /// Replaces the data snapshot and shows `[min_x_index, max_x_index]`.
    ///
    /// Every in-flight transition is discarded; the new bounds start settled.
    pub fn attach_data(
        &mut self,
        data: ChartLinesData<X, Y>,
        min_x_index: usize,
        max_x_index: usize,
    ) -> ChartResult<()> {
        data.validate_window(min_x_index, max_x_index)?;
        let data = Arc::new(data);
        let duration = self.config.bounds_transition();
        let easing = self.config.easing;

        let initial = match self.bounds_engine.compute_y_bounds(
            data.as_ref(),
            min_x_index,
            max_x_index,
            &HiddenSeries::new(),
        )? {
            YBounds::Range { min, max } => Bounds::new(min_x_index, max_x_index, min, max),
            YBounds::Percentage | YBounds::Retain => {
                Bounds::new(min_x_index, max_x_index, Y::zero(), Y::zero())
            }
        };
        let mut series_bounds = TransitionSet::new();
        if data.y_scaled() {
            for extremes in per_line_extremes(data.as_ref(), min_x_index, max_x_index)? {
                let bounds = Bounds::new(min_x_index, max_x_index, extremes.min, extremes.max);
                series_bounds.insert(
                    extremes.id,
                    BoundsAnimator::settled(bounds, duration, easing),
                );
            }
        }
        let selector = WindowSelector::new(
            data.len(),
            min_x_index,
            max_x_index,
            self.config.selector_min_width,
            self.config.selector_grip_px,
        )?;

        let mut visibility =
            VisibilityTracker::new(self.config.visibility_transition(), easing);
        visibility.reset(data.lines().iter().map(Series::id));
        let mut pipeline =
            Pipeline::for_kind(data.chart_kind(self.pie_mode), &self.config.layer_settings());
        pipeline.attach(&data, initial);

        self.visibility = visibility;
        self.series_bounds = series_bounds;
        self.bounds = Some(BoundsAnimator::settled(initial, duration, easing));
        self.selector = Some(selector);
        self.selected = None;
        self.pipeline = pipeline;
        debug!(
            points = data.len(),
            series = data.lines().len(),
            min_x_index,
            max_x_index,
            kind = ?data.chart_kind(self.pie_mode),
            "chart data attached"
        );
        self.data = Some(data);
        Ok(())
    }

    /// Moves the visible window; Y bounds animate toward the new range.
    pub fn set_visible_window(
        &mut self,
        min_x_index: usize,
        max_x_index: usize,
    ) -> ChartResult<()> {
        let data = self.require_data()?;
        data.validate_window(min_x_index, max_x_index)?;
        if let Some(selector) = self.selector.as_mut() {
            selector.set_window(min_x_index, max_x_index)?;
        }
        self.retarget(&data, min_x_index, max_x_index)?;
        debug!(min_x_index, max_x_index, "visible window changed");
        Ok(())
    }

    /// Starts a show/hide fade; returns `false` when `visible` is already requested.
    ///
    /// A series being hidden keeps its place in the target bounds until its
    /// fade-out completes in [`ChartEngine::tick`]; a shown series rejoins at once.
    pub fn set_series_visible(&mut self, id: &SeriesId, visible: bool) -> ChartResult<bool> {
        let data = self.require_data()?;
        let changed = self
            .visibility
            .set_visible(id, visible, self.clock.now())
            .ok_or_else(|| ChartError::UnknownSeries(id.to_string()))?;
        if !changed {
            return Ok(false);
        }
        self.events.push(ChartEvent::SeriesToggled {
            id: id.clone(),
            visible,
        });
        let (min_x_index, max_x_index) = self.visible_window().unwrap_or((0, 0));
        self.retarget(&data, min_x_index, max_x_index)?;
        self.pipeline.visibility_changed();
        Ok(true)
    }

    pub fn set_selected_index(&mut self, index: Option<usize>) -> ChartResult<()> {
        let data = self.require_data()?;
        if let Some(index) = index {
            data.validate_window(index, index)?;
        }
        if self.selected != index {
            self.selected = index;
            self.pipeline.selection_changed(index);
            debug!(?index, "selection changed");
        }
        Ok(())
    }

    /// Selects the index under pixel `x` of a frame drawn into `rect`.
    pub fn select_at_position(&mut self, x: f64, rect: Rect) -> ChartResult<Option<usize>> {
        let data = self.require_data()?;
        let Some((min_x_index, max_x_index)) = self.visible_window() else {
            return Ok(None);
        };
        let plot = self.config.style.plot_rect(rect);
        let index = match data.chart_kind(self.pie_mode) {
            ChartKind::Bar | ChartKind::StackedBar => {
                bar_index_at_position(x, plot, min_x_index, max_x_index)
            }
            _ => index_at_position(x, plot, min_x_index, max_x_index),
        };
        self.set_selected_index(index)?;
        Ok(index)
    }

    /// Caller-forced Y limits; they only ever widen the computed range.
    pub fn set_forced_y_range(&mut self, forced: ForcedYRange<Y>) -> ChartResult<()> {
        self.bounds_engine.set_forced(forced);
        let Some(data) = self.data.clone() else {
            return Ok(());
        };
        let (min_x_index, max_x_index) = self.visible_window().unwrap_or((0, 0));
        self.retarget(&data, min_x_index, max_x_index)
    }

    /// Switches percentage data between the stacked area and the pie layers.
    pub fn set_pie_mode(&mut self, pie_mode: bool) {
        if self.pie_mode == pie_mode {
            return;
        }
        self.pie_mode = pie_mode;
        let (Some(data), Some(bounds)) = (self.data.clone(), self.current_bounds()) else {
            return;
        };
        let settings = self.config.layer_settings();
        self.pipeline = Pipeline::for_kind(data.chart_kind(pie_mode), &settings);
        self.pipeline.attach(&data, bounds);
        self.pipeline.selection_changed(self.selected);
        debug!(pie_mode, kind = ?data.chart_kind(pie_mode), "pie mode changed");
    }

    /// Advances the clock by one frame and every transition with it.
    ///
    /// Returns whether anything is still animating.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let now = self.clock.tick(delta);

        let step = self.visibility.advance(now);
        if !step.dropped.is_empty() {
            self.pipeline.visibility_changed();
            if let (Some(data), Some((min_x_index, max_x_index))) =
                (self.data.clone(), self.visible_window())
            {
                if let Err(err) = self.retarget(&data, min_x_index, max_x_index) {
                    warn!(error = %err, "bounds not recomputed after fade-out");
                }
            }
            debug!(series = step.dropped.len(), "faded series left the bounds");
        } else if !step.is_empty() {
            self.pipeline.alpha_changed();
        }

        let mut running = false;
        if let Some(animator) = self.bounds.as_mut() {
            animator.advance(now);
            running |= animator.is_running();
        }
        self.flush_bounds();

        let moved = self.series_bounds.advance_all(now);
        for (_, animator) in self.series_bounds.iter_mut() {
            animator.take_change();
        }
        if !moved.is_empty() {
            self.pipeline.series_bounds_changed();
        }

        running |= self.series_bounds.any_running();
        running |= self.visibility.any_running();
        running |= self.pipeline.tick(now);
        running
    }

    /// Draws one frame into `rect`. A no-op until data is attached.
    ///
    /// A failed frame is reported and skipped; the engine stays ready for the
    /// next tick.
    pub fn render(&mut self, surface: &mut dyn Surface, rect: Rect) -> ChartResult<FrameStats> {
        let Some(animator) = self.bounds.as_ref() else {
            return Ok(FrameStats::default());
        };
        let scene = Scene {
            target: *animator.target(),
            series_bounds: &self.series_bounds,
            visibility: &self.visibility,
            selected: self.selected,
            style: &self.config.style,
            now: self.clock.now(),
        };
        self.pipeline.draw(surface, rect, &scene).map_err(|err| {
            warn!(error = %err, "frame not drawn");
            err
        })
    }

    pub fn begin_window_drag(&mut self, x: f64, overview: Rect) -> Option<SelectorHandle> {
        self.selector.as_mut()?.begin_drag(x, overview)
    }

    /// Applies a selector drag step; returns the new window when it moved.
    pub fn drag_window(&mut self, x: f64, overview: Rect) -> ChartResult<Option<(usize, usize)>> {
        let Some(event) = self
            .selector
            .as_mut()
            .and_then(|selector| selector.drag_to(x, overview))
        else {
            return Ok(None);
        };
        let ChartEvent::WindowChanged {
            min_x_index,
            max_x_index,
        } = event
        else {
            return Ok(None);
        };
        self.set_visible_window(min_x_index, max_x_index)?;
        self.events.push(event);
        Ok(Some((min_x_index, max_x_index)))
    }

    pub fn end_window_drag(&mut self) {
        if let Some(selector) = self.selector.as_mut() {
            selector.end_drag();
        }
    }

    /// Takes every notification produced since the last call.
    pub fn drain_events(&mut self) -> Vec<ChartEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn data(&self) -> Option<&Arc<ChartLinesData<X, Y>>> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub fn current_bounds(&self) -> Option<Bounds<Y>> {
        self.bounds.as_ref().map(|animator| *animator.current())
    }

    #[must_use]
    pub fn target_bounds(&self) -> Option<Bounds<Y>> {
        self.bounds.as_ref().map(|animator| *animator.target())
    }

    #[must_use]
    pub fn visible_window(&self) -> Option<(usize, usize)> {
        self.target_bounds()
            .map(|bounds| (bounds.min_x_index, bounds.max_x_index))
    }

    /// Current per-series bounds in scaled mode.
    #[must_use]
    pub fn series_bounds(&self, id: &SeriesId) -> Option<Bounds<Y>> {
        self.series_bounds.get(id).map(|animator| *animator.current())
    }

    #[must_use]
    pub fn series_alpha(&self, id: &SeriesId) -> u8 {
        self.visibility.alpha(id)
    }

    #[must_use]
    pub fn is_series_visible(&self, id: &SeriesId) -> bool {
        self.visibility.get(id).is_some_and(|state| state.is_visible())
    }

    #[must_use]
    pub fn is_series_drawn(&self, id: &SeriesId) -> bool {
        self.visibility.is_drawn(id)
    }

    /// Series requested hidden, including those still fading out.
    #[must_use]
    pub fn hidden_series(&self) -> HiddenSeries {
        self.visibility.hidden()
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn pie_mode(&self) -> bool {
        self.pie_mode
    }

    #[must_use]
    pub fn chart_kind(&self) -> Option<ChartKind> {
        self.data.as_ref().map(|data| data.chart_kind(self.pie_mode))
    }

    #[must_use]
    pub fn pipeline(&self) -> &Pipeline<X, Y> {
        &self.pipeline
    }

    /// X axis label cells currently shown; empty for pie charts.
    #[must_use]
    pub fn label_cells(&self) -> &[LabelCell] {
        self.pipeline
            .find::<XAxisLabelLayer<X, Y>>()
            .map(|layer| layer.density().cells())
            .unwrap_or(&[])
    }

    /// Percentage shares of every series at `index` among the drawn series.
    pub fn percentage_contributions(&self, index: usize) -> ChartResult<Shares> {
        let data = self.require_data()?;
        self.bounds_engine
            .percentage_contributions(data.as_ref(), index, &self.visibility.excluded())
    }

    fn require_data(&self) -> ChartResult<Arc<ChartLinesData<X, Y>>> {
        self.data
            .clone()
            .ok_or_else(|| ChartError::InvalidData("no chart data attached".to_owned()))
    }

    /// Recomputes target bounds for the window and points every transition at them.
    fn retarget(
        &mut self,
        data: &ChartLinesData<X, Y>,
        min_x_index: usize,
        max_x_index: usize,
    ) -> ChartResult<()> {
        let now = self.clock.now();
        let hidden = self.visibility.excluded();
        let y_bounds = self
            .bounds_engine
            .compute_y_bounds(data, min_x_index, max_x_index, &hidden)?;
        let scaled = if data.y_scaled() {
            per_line_extremes(data, min_x_index, max_x_index)?
        } else {
            Vec::new()
        };

        if let Some(animator) = self.bounds.as_mut() {
            let target = match y_bounds {
                YBounds::Range { min, max } => Bounds::new(min_x_index, max_x_index, min, max),
                YBounds::Percentage | YBounds::Retain => {
                    animator.target().with_x(min_x_index, max_x_index)
                }
            };
            animator.set_target(target, now);
        }

        if !scaled.is_empty() {
            let duration = self.config.bounds_transition();
            let easing = self.config.easing;
            for extremes in scaled {
                let target = Bounds::new(min_x_index, max_x_index, extremes.min, extremes.max);
                match self.series_bounds.get_mut(&extremes.id) {
                    Some(animator) => {
                        animator.set_target(target, now);
                        animator.take_change();
                    }
                    None => {
                        self.series_bounds.insert(
                            extremes.id,
                            BoundsAnimator::settled(target, duration, easing),
                        );
                    }
                }
            }
            self.pipeline.series_bounds_changed();
        }

        self.flush_bounds();
        Ok(())
    }

    /// Pushes pending global bounds changes into the pipeline.
    fn flush_bounds(&mut self) {
        if let Some(animator) = self.bounds.as_mut() {
            let change = animator.take_change();
            if !change.is_none() {
                self.pipeline.push_bounds(*animator.current(), change);
            }
        }
    }
}
