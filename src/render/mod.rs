mod frame;
mod primitives;
mod recording;

pub use frame::{DrawCommand, PathPrimitive, RenderFrame};
pub use primitives::{
    ArcPrimitive, Color, LinePrimitive, RectPrimitive, Stroke, TextHAlign, TextPrimitive,
    validate_points,
};
pub use recording::RecordingSurface;

use crate::core::{Point, Rect};
use crate::error::ChartResult;

/// Drawing-surface contract required by the pipeline.
///
/// Only primitive operations are needed, so any immediate-mode graphics API
/// can back it. Draw failures are returned to the caller and are never retried
/// by the engine.
pub trait Surface {
    fn draw_segments(&mut self, segments: &[LinePrimitive]) -> ChartResult<()>;

    fn draw_polyline(&mut self, points: &[Point], stroke: Stroke) -> ChartResult<()>;

    fn fill_polygon(&mut self, points: &[Point], fill: Color) -> ChartResult<()>;

    fn draw_rect(&mut self, rect: &RectPrimitive) -> ChartResult<()>;

    fn draw_arc(&mut self, arc: &ArcPrimitive) -> ChartResult<()>;

    fn draw_text(&mut self, text: &TextPrimitive) -> ChartResult<()>;

    /// Advance width of `text` in pixels.
    fn measure_text(&self, text: &str, font_size_px: f64) -> f64;

    fn save(&mut self);

    fn restore(&mut self);

    fn clip(&mut self, rect: Rect);

    fn translate(&mut self, dx: f64, dy: f64);
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoDrawStats, CairoSurface};
