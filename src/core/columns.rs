use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::{ChartLinesData, Coordinate, Count, Series, SeriesKind, Timestamp};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Column-oriented chart source.
///
/// Each column is `[label, value, value, ...]`; `types` tags every label as
/// `x`, `line`, `bar` or `area`. Non-X columns carry a display name and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSource {
    pub columns: Vec<Vec<Value>>,
    pub types: IndexMap<String, String>,
    #[serde(default)]
    pub names: IndexMap<String, String>,
    #[serde(default)]
    pub colors: IndexMap<String, String>,
    #[serde(default)]
    pub percentage: bool,
    #[serde(default)]
    pub stacked: bool,
    #[serde(default)]
    pub y_scaled: bool,
}

impl ColumnSource {
    pub fn from_json_str(raw: &str) -> ChartResult<Self> {
        serde_json::from_str(raw).map_err(|err| ChartError::Ingestion(err.to_string()))
    }

    /// Builds timestamp/count data, the shape used by activity statistics.
    pub fn into_lines_data(self) -> ChartResult<ChartLinesData<Timestamp, Count>> {
        self.into_lines_data_with(
            |cell| integer_cell(cell).map(Timestamp),
            |cell| integer_cell(cell).map(Count),
        )
    }

    /// Builds data with caller-supplied cell converters for both axes.
    pub fn into_lines_data_with<X, Y, FX, FY>(
        self,
        x_cell: FX,
        y_cell: FY,
    ) -> ChartResult<ChartLinesData<X, Y>>
    where
        X: Coordinate,
        Y: Coordinate,
        FX: Fn(&Value) -> ChartResult<X>,
        FY: Fn(&Value) -> ChartResult<Y>,
    {
        let mut x_series = None;
        let mut lines = Vec::new();

        for column in &self.columns {
            let (label, cells) = split_column(column)?;
            let tag = self.types.get(label).ok_or_else(|| {
                ChartError::Ingestion(format!("column `{label}` has no type tag"))
            })?;
            let kind = SeriesKind::from_tag(tag)?;

            if kind == SeriesKind::X {
                if x_series.is_some() {
                    return Err(ChartError::Ingestion(
                        "more than one x column".to_owned(),
                    ));
                }
                let points = cells.iter().map(&x_cell).collect::<ChartResult<Vec<_>>>()?;
                x_series = Some(Series::x_axis(points));
                continue;
            }

            let points = cells.iter().map(&y_cell).collect::<ChartResult<Vec<_>>>()?;
            let name = self
                .names
                .get(label)
                .cloned()
                .unwrap_or_else(|| label.to_owned());
            let color = match self.colors.get(label) {
                Some(hex) => Color::from_hex(hex)?,
                None => Color::rgb(0.0, 0.0, 0.0),
            };
            lines.push(Series::new(label, name, kind, color, points));
        }

        let x_series =
            x_series.ok_or_else(|| ChartError::Ingestion("missing x column".to_owned()))?;
        debug!(
            points = x_series.len(),
            lines = lines.len(),
            stacked = self.stacked,
            percentage = self.percentage,
            y_scaled = self.y_scaled,
            "ingested column source"
        );

        Ok(ChartLinesData::new(x_series, lines)?
            .with_stacked(self.stacked)
            .with_percentage(self.percentage)
            .with_y_scaled(self.y_scaled))
    }
}

fn split_column(column: &[Value]) -> ChartResult<(&str, &[Value])> {
    let (head, cells) = column
        .split_first()
        .ok_or_else(|| ChartError::Ingestion("empty column".to_owned()))?;
    let label = head
        .as_str()
        .ok_or_else(|| ChartError::Ingestion("column label must be a string".to_owned()))?;
    Ok((label, cells))
}

/// Integer cell; whole-valued floats are accepted.
pub fn integer_cell(cell: &Value) -> ChartResult<i64> {
    if let Some(value) = cell.as_i64() {
        return Ok(value);
    }
    match cell.as_f64() {
        Some(value) if value.fract() == 0.0 && value.is_finite() => Ok(value as i64),
        _ => Err(ChartError::Ingestion(format!(
            "expected an integer cell, got `{cell}`"
        ))),
    }
}
