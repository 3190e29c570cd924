use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::Coordinate;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Stable identity of one series (the column label in the source data).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesId(String);

impl SeriesId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    X,
    Line,
    Bar,
    Area,
}

impl SeriesKind {
    /// Parses the column type tag used by the ingestion format.
    pub fn from_tag(tag: &str) -> ChartResult<Self> {
        match tag {
            "x" => Ok(Self::X),
            "line" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            "area" => Ok(Self::Area),
            other => Err(ChartError::Ingestion(format!(
                "unknown column type `{other}`"
            ))),
        }
    }
}

/// One named, colored sequence of coordinates.
///
/// The full-range min/max value indices are computed once at construction
/// and reused whenever a window covers the whole series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<C: Coordinate> {
    id: SeriesId,
    name: String,
    kind: SeriesKind,
    color: Color,
    points: Vec<C>,
    min_index: Option<usize>,
    max_index: Option<usize>,
}

impl<C: Coordinate> Series<C> {
    #[must_use]
    pub fn new(
        id: impl Into<SeriesId>,
        name: impl Into<String>,
        kind: SeriesKind,
        color: Color,
        points: Vec<C>,
    ) -> Self {
        let extremes = scan_extreme_indices(&points, 0, points.len().saturating_sub(1));
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            color,
            min_index: extremes.map(|(min, _)| min),
            max_index: extremes.map(|(_, max)| max),
            points,
        }
    }

    /// Shorthand for the shared X column.
    #[must_use]
    pub fn x_axis(points: Vec<C>) -> Self {
        Self::new("x", "x", SeriesKind::X, Color::rgb(0.0, 0.0, 0.0), points)
    }

    #[must_use]
    pub fn id(&self) -> &SeriesId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn points(&self) -> &[C] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value at `index`. Panics on an out-of-range index, which is a host bug.
    #[must_use]
    pub fn value(&self, index: usize) -> C {
        self.points[index]
    }

    #[must_use]
    pub fn min_value_index(&self) -> Option<usize> {
        self.min_index
    }

    #[must_use]
    pub fn max_value_index(&self) -> Option<usize> {
        self.max_index
    }

    /// Indices of the smallest and largest value inside `[min_index, max_index]`.
    ///
    /// Ties resolve to the earliest index. Returns `None` for an empty series.
    #[must_use]
    pub fn extreme_indices_in(&self, min_index: usize, max_index: usize) -> Option<(usize, usize)> {
        if self.points.is_empty() {
            return None;
        }
        if min_index == 0 && max_index + 1 >= self.points.len() {
            return self.min_index.zip(self.max_index);
        }
        scan_extreme_indices(&self.points, min_index, max_index)
    }
}

fn scan_extreme_indices<C: Coordinate>(
    points: &[C],
    min_index: usize,
    max_index: usize,
) -> Option<(usize, usize)> {
    if points.is_empty() || min_index > max_index {
        return None;
    }
    let end = max_index.min(points.len() - 1);
    let mut lowest = min_index;
    let mut highest = min_index;
    for index in min_index + 1..=end {
        let value = points[index];
        if value < points[lowest] {
            lowest = index;
        }
        if value > points[highest] {
            highest = index;
        }
    }
    Some((lowest, highest))
}
