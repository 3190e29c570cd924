use serde::{Deserialize, Serialize};

use crate::core::{Coordinate, Series, SeriesId, SeriesKind};
use crate::error::{ChartError, ChartResult};

/// How visible Y series are combined into one Y range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationPolicy {
    Plain,
    Stacked,
    Percentage,
}

/// Which points layer renders the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Line,
    ScaledLine,
    Bar,
    StackedBar,
    PercentageArea,
    Pie,
}

/// One shared X series plus aligned Y series.
///
/// Every Y series has exactly as many points as the X series; this is checked
/// once here so aggregation code can index freely.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLinesData<X: Coordinate, Y: Coordinate> {
    x: Series<X>,
    lines: Vec<Series<Y>>,
    stacked: bool,
    percentage: bool,
    y_scaled: bool,
}

impl<X: Coordinate, Y: Coordinate> ChartLinesData<X, Y> {
    pub fn new(x: Series<X>, lines: Vec<Series<Y>>) -> ChartResult<Self> {
        let expected = x.len();
        for (position, line) in lines.iter().enumerate() {
            if line.len() != expected {
                return Err(ChartError::SeriesLengthMismatch {
                    series: line.id().to_string(),
                    expected,
                    actual: line.len(),
                });
            }
            if lines[..position].iter().any(|other| other.id() == line.id()) {
                return Err(ChartError::InvalidData(format!(
                    "duplicate series id `{}`",
                    line.id()
                )));
            }
        }
        Ok(Self {
            x,
            lines,
            stacked: false,
            percentage: false,
            y_scaled: false,
        })
    }

    #[must_use]
    pub fn with_stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }

    #[must_use]
    pub fn with_percentage(mut self, percentage: bool) -> Self {
        self.percentage = percentage;
        self
    }

    #[must_use]
    pub fn with_y_scaled(mut self, y_scaled: bool) -> Self {
        self.y_scaled = y_scaled;
        self
    }

    #[must_use]
    pub fn x(&self) -> &Series<X> {
        &self.x
    }

    #[must_use]
    pub fn lines(&self) -> &[Series<Y>] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, id: &SeriesId) -> Option<&Series<Y>> {
        self.lines.iter().find(|line| line.id() == id)
    }

    #[must_use]
    pub fn position_of(&self, id: &SeriesId) -> Option<usize> {
        self.lines.iter().position(|line| line.id() == id)
    }

    /// Number of points shared by every series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[must_use]
    pub fn stacked(&self) -> bool {
        self.stacked
    }

    #[must_use]
    pub fn percentage(&self) -> bool {
        self.percentage
    }

    #[must_use]
    pub fn y_scaled(&self) -> bool {
        self.y_scaled
    }

    /// Evaluated on every bounds recomputation; never cached.
    #[must_use]
    pub fn aggregation_policy(&self) -> AggregationPolicy {
        if self.percentage {
            AggregationPolicy::Percentage
        } else if self.stacked {
            AggregationPolicy::Stacked
        } else {
            AggregationPolicy::Plain
        }
    }

    /// Bars and areas grow from zero, so their Y range is widened to include it.
    #[must_use]
    pub fn anchors_at_zero(&self) -> bool {
        self.lines
            .iter()
            .any(|line| matches!(line.kind(), SeriesKind::Bar | SeriesKind::Area))
    }

    #[must_use]
    pub fn chart_kind(&self, pie_mode: bool) -> ChartKind {
        if self.percentage {
            if pie_mode {
                ChartKind::Pie
            } else {
                ChartKind::PercentageArea
            }
        } else if self.y_scaled {
            ChartKind::ScaledLine
        } else if self.lines.iter().any(|line| line.kind() == SeriesKind::Bar) {
            if self.stacked {
                ChartKind::StackedBar
            } else {
                ChartKind::Bar
            }
        } else {
            ChartKind::Line
        }
    }

    /// Checks that `[min_index, max_index]` is a non-empty window inside the data.
    pub fn validate_window(&self, min_index: usize, max_index: usize) -> ChartResult<()> {
        validate_window(min_index, max_index, self.len())
    }
}

pub fn validate_window(min_index: usize, max_index: usize, len: usize) -> ChartResult<()> {
    if min_index > max_index || max_index >= len {
        return Err(ChartError::InvalidWindow {
            min: min_index,
            max: max_index,
            len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{AggregationPolicy, ChartKind, ChartLinesData};
    use crate::core::{Count, Series, SeriesKind};
    use crate::error::ChartError;
    use crate::render::Color;

    fn line(id: &str, kind: SeriesKind, len: usize) -> Series<Count> {
        Series::new(
            id,
            id,
            kind,
            Color::rgb(0.5, 0.5, 0.5),
            (0..len as i64).map(Count).collect(),
        )
    }

    #[test]
    fn length_mismatch_is_rejected_at_construction() {
        let x = Series::x_axis((0..10).map(Count).collect());
        let result = ChartLinesData::new(x, vec![line("y0", SeriesKind::Line, 9)]);
        assert!(matches!(
            result,
            Err(ChartError::SeriesLengthMismatch {
                expected: 10,
                actual: 9,
                ..
            })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let x = Series::x_axis((0..3).map(Count).collect());
        let result = ChartLinesData::new(
            x,
            vec![
                line("y0", SeriesKind::Line, 3),
                line("y0", SeriesKind::Line, 3),
            ],
        );
        assert!(matches!(result, Err(ChartError::InvalidData(_))));
    }

    #[test]
    fn policy_follows_flags() {
        let x = Series::x_axis((0..3).map(Count).collect());
        let data = ChartLinesData::new(x, vec![line("y0", SeriesKind::Bar, 3)]).expect("data");
        assert_eq!(data.aggregation_policy(), AggregationPolicy::Plain);
        assert_eq!(data.chart_kind(false), ChartKind::Bar);

        let data = data.with_stacked(true);
        assert_eq!(data.aggregation_policy(), AggregationPolicy::Stacked);
        assert_eq!(data.chart_kind(false), ChartKind::StackedBar);

        let data = data.with_percentage(true);
        assert_eq!(data.aggregation_policy(), AggregationPolicy::Percentage);
        assert_eq!(data.chart_kind(true), ChartKind::Pie);
    }

    #[test]
    fn inverted_or_overflowing_window_fails_fast() {
        let x = Series::x_axis((0..5).map(Count).collect());
        let data = ChartLinesData::new(x, vec![line("y0", SeriesKind::Line, 5)]).expect("data");
        assert!(data.validate_window(3, 2).is_err());
        assert!(data.validate_window(0, 5).is_err());
        assert!(data.validate_window(0, 4).is_ok());
    }
}
