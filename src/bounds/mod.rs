//! Bounds engine: visible index window and Y range aggregation.

mod forced;
mod percentage;
mod windowed_sum;

pub use forced::ForcedYRange;
pub use percentage::{Shares, split_shares, whole_percents};
pub use windowed_sum::{WindowedSum, rescan_sum};

use std::collections::BTreeSet;

use tracing::trace;

use crate::core::{AggregationPolicy, ChartLinesData, Coordinate, Series, SeriesId};
use crate::error::ChartResult;

/// Series excluded from aggregation.
pub type HiddenSeries = BTreeSet<SeriesId>;

/// Result of a Y bounds computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YBounds<Y: Coordinate> {
    /// Animated value range.
    Range { min: Y, max: Y },
    /// Fixed 0..100% axis that never animates.
    Percentage,
    /// Nothing visible contributes; the previous range stays in place.
    Retain,
}

impl<Y: Coordinate> YBounds<Y> {
    #[must_use]
    pub fn range(self) -> Option<(Y, Y)> {
        match self {
            Self::Range { min, max } => Some((min, max)),
            Self::Percentage | Self::Retain => None,
        }
    }
}

/// Min/max value indices of one series inside a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineExtremes<Y: Coordinate> {
    pub id: SeriesId,
    pub min_index: usize,
    pub max_index: usize,
    pub min: Y,
    pub max: Y,
}

/// Aggregates Y bounds for a window under the data's policy.
///
/// Owns a scratch buffer for per-index stack sums that is reused between
/// calls instead of allocating per frame.
#[derive(Debug, Clone)]
pub struct BoundsEngine<Y: Coordinate> {
    forced: ForcedYRange<Y>,
    stack_scratch: Vec<Y>,
}

impl<Y: Coordinate> Default for BoundsEngine<Y> {
    fn default() -> Self {
        Self {
            forced: ForcedYRange::default(),
            stack_scratch: Vec::new(),
        }
    }
}

impl<Y: Coordinate> BoundsEngine<Y> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn forced(&self) -> ForcedYRange<Y> {
        self.forced
    }

    pub fn set_forced(&mut self, forced: ForcedYRange<Y>) {
        self.forced = forced;
    }

    /// Y bounds of the visible series over `[min_x_index, max_x_index]`.
    ///
    /// The policy is read from the data flags on every call. Forced limits and
    /// the zero anchor of bar/area data widen the result.
    pub fn compute_y_bounds<X: Coordinate>(
        &mut self,
        data: &ChartLinesData<X, Y>,
        min_x_index: usize,
        max_x_index: usize,
        hidden: &HiddenSeries,
    ) -> ChartResult<YBounds<Y>> {
        data.validate_window(min_x_index, max_x_index)?;

        let raw = match data.aggregation_policy() {
            AggregationPolicy::Percentage => return Ok(YBounds::Percentage),
            AggregationPolicy::Plain => {
                plain_y_bounds(data.lines(), min_x_index, max_x_index, hidden)
            }
            AggregationPolicy::Stacked => {
                self.stacked_y_bounds(data.lines(), min_x_index, max_x_index, hidden)
            }
        };

        let Some((min, max)) = raw else {
            trace!(min_x_index, max_x_index, "no visible series; retaining y bounds");
            return Ok(YBounds::Retain);
        };

        let mut forced = self.forced;
        if data.anchors_at_zero() {
            forced = forced.union(ForcedYRange::zero_anchored());
        }
        let (min, max) = forced.apply(min, max);
        Ok(YBounds::Range { min, max })
    }

    /// Min/max of per-index sums of visible series, summed in declared order.
    pub fn stacked_y_bounds(
        &mut self,
        lines: &[Series<Y>],
        min_x_index: usize,
        max_x_index: usize,
        hidden: &HiddenSeries,
    ) -> Option<(Y, Y)> {
        let visible: Vec<&Series<Y>> = lines
            .iter()
            .filter(|line| !hidden.contains(line.id()))
            .collect();
        if visible.is_empty() {
            return None;
        }

        let sums = self.stack_sums(&visible, min_x_index, max_x_index);
        let min = sums.iter().copied().min()?;
        let max = sums.iter().copied().max()?;
        Some((min, max))
    }

    fn stack_sums(
        &mut self,
        visible: &[&Series<Y>],
        min_x_index: usize,
        max_x_index: usize,
    ) -> &[Y] {
        self.stack_scratch.clear();
        for index in min_x_index..=max_x_index {
            let mut accumulator = Y::zero();
            for line in visible {
                line.value(index).add_into(accumulator, &mut accumulator);
            }
            self.stack_scratch.push(accumulator);
        }
        &self.stack_scratch
    }

    /// Per-index percentage shares of every series at `index`.
    pub fn percentage_contributions<X: Coordinate>(
        &self,
        data: &ChartLinesData<X, Y>,
        index: usize,
        hidden: &HiddenSeries,
    ) -> ChartResult<Shares> {
        data.validate_window(index, index)?;
        let entries: Vec<(Y, f64)> = data
            .lines()
            .iter()
            .map(|line| {
                let weight = if hidden.contains(line.id()) { 0.0 } else { 1.0 };
                (line.value(index), weight)
            })
            .collect();
        Ok(split_shares(&entries))
    }
}

/// Element-wise min/max over visible series and the index window.
#[must_use]
pub fn plain_y_bounds<Y: Coordinate>(
    lines: &[Series<Y>],
    min_x_index: usize,
    max_x_index: usize,
    hidden: &HiddenSeries,
) -> Option<(Y, Y)> {
    let mut result: Option<(Y, Y)> = None;
    for line in lines.iter().filter(|line| !hidden.contains(line.id())) {
        let Some((lo, hi)) = line.extreme_indices_in(min_x_index, max_x_index) else {
            continue;
        };
        let (lo, hi) = (line.value(lo), line.value(hi));
        result = Some(match result {
            Some((min, max)) => (min.min(lo), max.max(hi)),
            None => (lo, hi),
        });
    }
    result
}

/// Independent window extremes for every series (scaled mode).
///
/// Hidden series are included so a fading series keeps its own scale.
pub fn per_line_extremes<X: Coordinate, Y: Coordinate>(
    data: &ChartLinesData<X, Y>,
    min_x_index: usize,
    max_x_index: usize,
) -> ChartResult<Vec<LineExtremes<Y>>> {
    data.validate_window(min_x_index, max_x_index)?;

    #[cfg(feature = "parallel-bounds")]
    {
        use rayon::prelude::*;
        return Ok(data
            .lines()
            .par_iter()
            .filter_map(|line| line_extremes(line, min_x_index, max_x_index))
            .collect());
    }

    #[cfg(not(feature = "parallel-bounds"))]
    {
        Ok(data
            .lines()
            .iter()
            .filter_map(|line| line_extremes(line, min_x_index, max_x_index))
            .collect())
    }
}

fn line_extremes<Y: Coordinate>(
    line: &Series<Y>,
    min_x_index: usize,
    max_x_index: usize,
) -> Option<LineExtremes<Y>> {
    let (min_index, max_index) = line.extreme_indices_in(min_x_index, max_x_index)?;
    Some(LineExtremes {
        id: line.id().clone(),
        min_index,
        max_index,
        min: line.value(min_index),
        max: line.value(max_index),
    })
}
