pub mod bounds;
pub mod columns;
pub mod coordinate;
pub mod lines_data;
pub mod series;
pub mod types;

pub use bounds::{Bounds, Projection};
pub use columns::ColumnSource;
pub use coordinate::{Coordinate, Count, Money, Real, Timestamp};
pub use lines_data::{AggregationPolicy, ChartKind, ChartLinesData, validate_window};
pub use series::{Series, SeriesId, SeriesKind};
pub use types::{Point, Rect};
