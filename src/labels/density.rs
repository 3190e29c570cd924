use std::time::Duration;

use tracing::trace;

use crate::core::{Coordinate, Rect, validate_window};
use crate::error::ChartResult;
use crate::transition::{Easing, OPAQUE, OpacityTransition, TRANSPARENT, Transition};

/// Adjacent cells closer than this fraction of the target spacing are thinned out.
pub const MIN_SPACING_RATIO: f64 = 0.8;
/// Adjacent cells further apart than this fraction of the target spacing get a midpoint.
pub const MAX_SPACING_RATIO: f64 = 1.8;

const MAX_PASSES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelDensityConfig {
    /// Labels wanted across one window.
    pub label_count: usize,
    /// Index margin outside the window inside which cells are kept.
    pub hysteresis: f64,
    pub fade: Duration,
    pub easing: Easing,
}

impl Default for LabelDensityConfig {
    fn default() -> Self {
        Self {
            label_count: 6,
            hysteresis: 0.5,
            fade: Duration::from_millis(200),
            easing: Easing::Linear,
        }
    }
}

/// One shown axis label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCell {
    index: usize,
    text: String,
    width: f64,
    x: f64,
    opacity: OpacityTransition,
    /// Created by the rebuild in progress and never drawn yet.
    fresh: bool,
}

impl LabelCell {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Measured text width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Horizontal center in pixels, as of the last rebuild.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn alpha(&self) -> u8 {
        self.opacity.alpha()
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.opacity.is_running()
    }
}

/// What one rebuild changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DensityPass {
    /// Cells handed to a fade-out because they left the window.
    pub out_of_range: usize,
    /// Cells handed to a fade-out to thin the axis.
    pub dropped: usize,
    /// Midpoint cells fading in.
    pub inserted: usize,
    /// Cells appended at either edge.
    pub extended: usize,
}

/// Keeps X axis labels inside a spacing band while the window zooms and pans.
///
/// Cells sit on a grid `anchor + k * step` in index space with `step` a power
/// of two. Thinning doubles the step and drops every other cell, densifying
/// halves it and inserts midpoints, so surviving labels never move between
/// indices. Removed cells stay in a side list until their fade-out completes.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelDensity {
    config: LabelDensityConfig,
    step: usize,
    anchor: usize,
    cells: Vec<LabelCell>,
    fading: Vec<LabelCell>,
}

impl LabelDensity {
    #[must_use]
    pub fn new(config: LabelDensityConfig) -> Self {
        Self {
            config,
            step: 1,
            anchor: 0,
            cells: Vec::new(),
            fading: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> LabelDensityConfig {
        self.config
    }

    pub fn reset(&mut self) {
        self.step = 1;
        self.anchor = 0;
        self.cells.clear();
        self.fading.clear();
    }

    /// Shown cells ordered by index, including ones still fading in.
    #[must_use]
    pub fn cells(&self) -> &[LabelCell] {
        &self.cells
    }

    /// Cells removed from the axis whose fade-out has not finished yet.
    #[must_use]
    pub fn fading(&self) -> &[LabelCell] {
        &self.fading
    }

    /// Current index distance between adjacent shown cells.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    #[must_use]
    pub fn target_spacing(&self, min_x_index: usize, max_x_index: usize) -> f64 {
        let window = max_x_index.saturating_sub(min_x_index) as f64;
        window / self.config.label_count.max(1) as f64
    }

    /// Re-fits the cell list to the window `[min_x_index, max_x_index]`.
    ///
    /// `measure` returns the pixel width of a label text.
    pub fn rebuild<X: Coordinate>(
        &mut self,
        x: &[X],
        min_x_index: usize,
        max_x_index: usize,
        rect: Rect,
        now: Duration,
        measure: &dyn Fn(&str) -> f64,
    ) -> ChartResult<DensityPass> {
        validate_window(min_x_index, max_x_index, x.len())?;
        let target = self.target_spacing(min_x_index, max_x_index);
        let low = min_x_index as f64 - self.config.hysteresis;
        let high = max_x_index as f64 + self.config.hysteresis;
        let mut pass = DensityPass::default();

        let (kept, gone): (Vec<LabelCell>, Vec<LabelCell>) =
            std::mem::take(&mut self.cells).into_iter().partition(|cell| {
                let index = cell.index as f64;
                let px = pixel_x(cell.index, min_x_index, max_x_index, rect);
                let half = cell.width / 2.0;
                index >= low
                    && index <= high
                    && px >= rect.left() - half
                    && px <= rect.right() + half
            });
        self.cells = kept;
        for cell in gone {
            self.fade_out(cell, now);
            pass.out_of_range += 1;
        }

        if self.cells.is_empty() {
            self.step = initial_step(target);
            let span = max_x_index - min_x_index;
            let seed = max_x_index - self.step.min(span);
            self.anchor = seed;
            let cell = self.appearing_cell(x, seed, now, measure, false);
            self.cells.push(cell);
        }

        for _ in 0..MAX_PASSES {
            pass.extended += self.extend(x, low, high, now, measure);
            let spacing = self.step as f64;
            if spacing < MIN_SPACING_RATIO * target {
                pass.dropped += self.thin(now);
            } else if spacing > MAX_SPACING_RATIO * target && self.step > 1 {
                pass.inserted += self.densify(x, now, measure);
            } else {
                break;
            }
        }

        for cell in &mut self.cells {
            cell.fresh = false;
        }
        self.layout(min_x_index, max_x_index, rect);
        trace!(
            min_x_index,
            max_x_index,
            step = self.step,
            cells = self.cells.len(),
            fading = self.fading.len(),
            ?pass,
            "label density rebuilt"
        );
        Ok(pass)
    }

    fn extend<X: Coordinate>(
        &mut self,
        x: &[X],
        low: f64,
        high: f64,
        now: Duration,
        measure: &dyn Fn(&str) -> f64,
    ) -> usize {
        let mut added = 0;
        while let Some(first) = self.cells.first().map(LabelCell::index) {
            let Some(next) = first.checked_sub(self.step) else {
                break;
            };
            if (next as f64) < low {
                break;
            }
            let cell = self.appearing_cell(x, next, now, measure, false);
            self.cells.insert(0, cell);
            added += 1;
        }
        while let Some(last) = self.cells.last().map(LabelCell::index) {
            let next = last + self.step;
            if next >= x.len() || next as f64 > high {
                break;
            }
            let cell = self.appearing_cell(x, next, now, measure, false);
            self.cells.push(cell);
            added += 1;
        }
        added
    }

    /// Doubles the step and fades out every cell that is off the new grid.
    fn thin(&mut self, now: Duration) -> usize {
        let next_step = self.step * 2;
        let on_grid = |index: usize, anchor: usize| index.abs_diff(anchor) % next_step == 0;
        if !self.cells.iter().any(|cell| on_grid(cell.index, self.anchor)) {
            if let Some(first) = self.cells.first() {
                self.anchor = first.index;
            }
        }
        let anchor = self.anchor;
        let (kept, dropped): (Vec<LabelCell>, Vec<LabelCell>) = std::mem::take(&mut self.cells)
            .into_iter()
            .partition(|cell| on_grid(cell.index, anchor));
        self.cells = kept;
        self.step = next_step;
        let count = dropped.iter().filter(|cell| !cell.fresh).count();
        for cell in dropped {
            self.fade_out(cell, now);
        }
        count
    }

    /// Halves the step and fades in a midpoint between every adjacent pair.
    fn densify<X: Coordinate>(
        &mut self,
        x: &[X],
        now: Duration,
        measure: &dyn Fn(&str) -> f64,
    ) -> usize {
        let half = self.step / 2;
        let mut next = Vec::with_capacity(self.cells.len() * 2);
        let mut inserted = 0;
        let cells = std::mem::take(&mut self.cells);
        let mut iter = cells.into_iter().peekable();
        while let Some(cell) = iter.next() {
            let index = cell.index;
            next.push(cell);
            if iter.peek().is_some() {
                next.push(self.appearing_cell(x, index + half, now, measure, true));
                inserted += 1;
            }
        }
        self.cells = next;
        self.step = half;
        inserted
    }

    /// New cell at `index`, reusing a cell that is still fading out there.
    fn appearing_cell<X: Coordinate>(
        &mut self,
        x: &[X],
        index: usize,
        now: Duration,
        measure: &dyn Fn(&str) -> f64,
        fade_in: bool,
    ) -> LabelCell {
        if let Some(position) = self.fading.iter().position(|cell| cell.index == index) {
            let mut cell = self.fading.swap_remove(position);
            cell.opacity.retarget(OPAQUE, now);
            return cell;
        }
        let text = x[index].axis_string();
        let width = measure(&text);
        let (fade, easing) = (self.config.fade, self.config.easing);
        let opacity = if fade_in {
            OpacityTransition::starting(TRANSPARENT, OPAQUE, now, fade, easing)
        } else {
            OpacityTransition::settled(OPAQUE, fade, easing)
        };
        LabelCell {
            index,
            text,
            width,
            x: 0.0,
            opacity,
            fresh: true,
        }
    }

    fn fade_out(&mut self, mut cell: LabelCell, now: Duration) {
        if cell.fresh {
            return;
        }
        cell.opacity.retarget(TRANSPARENT, now);
        if cell.opacity.is_running() || cell.alpha() > TRANSPARENT {
            self.fading.push(cell);
        }
    }

    fn layout(&mut self, min_x_index: usize, max_x_index: usize, rect: Rect) {
        for cell in self.cells.iter_mut().chain(self.fading.iter_mut()) {
            cell.x = pixel_x(cell.index, min_x_index, max_x_index, rect);
        }
    }
}

impl Transition for LabelDensity {
    fn advance(&mut self, now: Duration) -> bool {
        let mut changed = false;
        for cell in self.cells.iter_mut().chain(self.fading.iter_mut()) {
            changed |= cell.opacity.advance(now);
        }
        let before = self.fading.len();
        self.fading
            .retain(|cell| cell.opacity.is_running() || cell.alpha() > TRANSPARENT);
        changed || before != self.fading.len()
    }

    fn is_running(&self) -> bool {
        self.cells
            .iter()
            .chain(self.fading.iter())
            .any(LabelCell::is_fading)
    }
}

/// Smallest power of two not below the lower edge of the spacing band.
fn initial_step(target: f64) -> usize {
    let mut step = 1usize;
    while (step as f64) < MIN_SPACING_RATIO * target && step < usize::MAX / 2 {
        step *= 2;
    }
    step
}

fn pixel_x(index: usize, min_x_index: usize, max_x_index: usize, rect: Rect) -> f64 {
    let span = max_x_index.saturating_sub(min_x_index);
    if span == 0 {
        return rect.center_x();
    }
    let ratio = (index as f64 - min_x_index as f64) / span as f64;
    rect.left() + ratio * rect.width
}

#[cfg(test)]
mod tests {
    use super::{LabelDensity, LabelDensityConfig, initial_step};
    use crate::core::{Count, Rect};
    use crate::transition::{OPAQUE, Transition};
    use std::time::Duration;

    fn axis(len: i64) -> Vec<Count> {
        (0..len).map(Count).collect()
    }

    fn measure(text: &str) -> f64 {
        text.len() as f64 * 7.0
    }

    #[test]
    fn initial_step_lands_in_band() {
        assert_eq!(initial_step(16.5), 16);
        assert_eq!(initial_step(0.5), 1);
        assert_eq!(initial_step(3.2), 4);
    }

    #[test]
    fn first_rebuild_seeds_from_right_edge() {
        let x = axis(100);
        let mut density = LabelDensity::new(LabelDensityConfig::default());
        let pass = density
            .rebuild(&x, 0, 99, Rect::from_size(600.0, 300.0), Duration::ZERO, &measure)
            .expect("rebuild");
        let indices: Vec<usize> = density.cells().iter().map(|cell| cell.index()).collect();
        assert_eq!(indices, vec![3, 19, 35, 51, 67, 83, 99]);
        assert_eq!(density.step(), 16);
        assert_eq!(pass.inserted, 0);
        assert!(density.cells().iter().all(|cell| cell.alpha() == OPAQUE));
        assert_eq!(density.cells()[6].text(), "99");
        assert_eq!(density.cells()[6].x(), 600.0);
    }

    #[test]
    fn panning_keeps_surviving_cells_in_place() {
        let x = axis(200);
        let rect = Rect::from_size(600.0, 300.0);
        let mut density = LabelDensity::new(LabelDensityConfig::default());
        density.rebuild(&x, 0, 99, rect, Duration::ZERO, &measure).expect("rebuild");
        let pass = density
            .rebuild(&x, 10, 109, rect, Duration::from_millis(16), &measure)
            .expect("rebuild");
        let indices: Vec<usize> = density.cells().iter().map(|cell| cell.index()).collect();
        assert_eq!(indices, vec![19, 35, 51, 67, 83, 99]);
        assert_eq!(pass.out_of_range, 1);
        assert_eq!(pass.dropped + pass.inserted, 0);
    }

    #[test]
    fn fades_finish_and_leave_side_list() {
        let x = axis(100);
        let rect = Rect::from_size(600.0, 300.0);
        let mut density = LabelDensity::new(LabelDensityConfig::default());
        density.rebuild(&x, 0, 99, rect, Duration::ZERO, &measure).expect("rebuild");
        density
            .rebuild(&x, 80, 99, rect, Duration::ZERO, &measure)
            .expect("rebuild");
        assert!(density.is_running());
        density.advance(Duration::from_millis(100));
        assert!(!density.fading().is_empty());
        density.advance(Duration::from_millis(200));
        assert!(density.fading().is_empty());
        assert!(density.cells().iter().all(|cell| cell.alpha() == OPAQUE));
        assert!(!density.is_running());
    }

    #[test]
    fn returning_cell_is_revived_from_fade() {
        let x = axis(100);
        let rect = Rect::from_size(600.0, 300.0);
        let mut density = LabelDensity::new(LabelDensityConfig::default());
        density.rebuild(&x, 0, 99, rect, Duration::ZERO, &measure).expect("rebuild");
        density.rebuild(&x, 80, 99, rect, Duration::ZERO, &measure).expect("rebuild");
        density.advance(Duration::from_millis(100));
        density
            .rebuild(&x, 0, 99, rect, Duration::from_millis(100), &measure)
            .expect("rebuild");
        let indices: Vec<usize> = density.cells().iter().map(|cell| cell.index()).collect();
        assert_eq!(indices, vec![3, 19, 35, 51, 67, 83, 99]);
        let mut fading: Vec<usize> = density.fading().iter().map(|cell| cell.index()).collect();
        fading.sort_unstable();
        assert_eq!(fading, vec![87, 91, 95]);
    }
}
