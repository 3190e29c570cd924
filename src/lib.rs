//! telechart: animated time-series chart engine.
//!
//! Generic axis coordinates, windowed Y bounds aggregation, time-driven
//! transitions and a layered drawer pipeline rendering onto any [`render::Surface`].

pub mod api;
pub mod bounds;
pub mod core;
pub mod error;
pub mod interaction;
pub mod labels;
pub mod pipeline;
pub mod render;
pub mod telemetry;
pub mod transition;

pub use api::{ChartEngine, ChartEngineConfig, ChartEvent, ChartStyle};
pub use core::{
    Bounds, ChartKind, ChartLinesData, ColumnSource, Coordinate, Count, Money, Real, Series,
    SeriesId, SeriesKind, Timestamp,
};
pub use error::{ChartError, ChartResult};
