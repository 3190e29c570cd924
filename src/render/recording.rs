use crate::core::{Point, Rect};
use crate::error::ChartResult;
use crate::render::{
    ArcPrimitive, Color, DrawCommand, LinePrimitive, PathPrimitive, RectPrimitive, RenderFrame,
    Stroke, Surface, TextPrimitive, validate_points,
};

/// Surface that records every call into a [`RenderFrame`].
///
/// Used by tests and headless hosts. Primitives are validated as they arrive
/// so invalid geometry fails the frame before a real backend sees it.
#[derive(Debug)]
pub struct RecordingSurface {
    frame: RenderFrame,
    char_width_ratio: f64,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(area: Rect) -> Self {
        Self {
            frame: RenderFrame::new(area),
            char_width_ratio: 0.6,
        }
    }

    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    /// Returns the recorded frame and starts a fresh one over the same area.
    pub fn take_frame(&mut self) -> RenderFrame {
        let area = self.frame.area;
        std::mem::replace(&mut self.frame, RenderFrame::new(area))
    }

    pub fn clear(&mut self) {
        self.frame.commands.clear();
    }

    fn push(&mut self, command: DrawCommand) {
        self.frame.commands.push(command);
    }
}

impl Surface for RecordingSurface {
    fn draw_segments(&mut self, segments: &[LinePrimitive]) -> ChartResult<()> {
        for segment in segments {
            segment.validate()?;
        }
        self.frame
            .commands
            .extend(segments.iter().copied().map(DrawCommand::Line));
        Ok(())
    }

    fn draw_polyline(&mut self, points: &[Point], stroke: Stroke) -> ChartResult<()> {
        validate_points(points)?;
        stroke.validate()?;
        self.push(DrawCommand::Path(PathPrimitive::Polyline {
            points: points.to_vec(),
            stroke,
        }));
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], fill: Color) -> ChartResult<()> {
        validate_points(points)?;
        fill.validate()?;
        self.push(DrawCommand::Path(PathPrimitive::Polygon {
            points: points.to_vec(),
            fill,
        }));
        Ok(())
    }

    fn draw_rect(&mut self, rect: &RectPrimitive) -> ChartResult<()> {
        rect.validate()?;
        self.push(DrawCommand::Rect(*rect));
        Ok(())
    }

    fn draw_arc(&mut self, arc: &ArcPrimitive) -> ChartResult<()> {
        arc.validate()?;
        self.push(DrawCommand::Arc(*arc));
        Ok(())
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> ChartResult<()> {
        text.validate()?;
        self.push(DrawCommand::Text(text.clone()));
        Ok(())
    }

    fn measure_text(&self, text: &str, font_size_px: f64) -> f64 {
        text.chars().count() as f64 * font_size_px * self.char_width_ratio
    }

    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn clip(&mut self, rect: Rect) {
        self.push(DrawCommand::Clip(rect));
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.push(DrawCommand::Translate { dx, dy });
    }
}

#[cfg(test)]
mod tests {
    use super::RecordingSurface;
    use crate::core::{Point, Rect};
    use crate::render::{Color, Stroke, Surface};

    #[test]
    fn records_valid_paths_and_rejects_invalid_ones() {
        let mut surface = RecordingSurface::new(Rect::from_size(100.0, 50.0));
        let stroke = Stroke::new(2.0, Color::rgb(0.2, 0.4, 0.6));
        surface
            .draw_polyline(&[Point::new(0.0, 0.0), Point::new(10.0, 5.0)], stroke)
            .expect("valid polyline");
        assert!(
            surface
                .draw_polyline(&[Point::new(f64::NAN, 0.0)], stroke)
                .is_err()
        );
        let frame = surface.take_frame();
        assert_eq!(frame.paths().count(), 1);
        assert!(surface.frame().is_empty());
    }

    #[test]
    fn take_frame_restarts_over_the_same_area() {
        let area = Rect::from_size(120.0, 80.0);
        let mut surface = RecordingSurface::new(area);
        surface.save();
        surface.restore();

        let frame = surface.take_frame();
        assert_eq!(frame.commands.len(), 2);
        assert_eq!(frame.area, area);
        assert!(surface.frame().is_empty());
        assert_eq!(surface.frame().area, area);
    }

    #[test]
    fn measures_text_proportionally() {
        let surface = RecordingSurface::new(Rect::from_size(100.0, 50.0));
        assert_eq!(surface.measure_text("abcd", 10.0), 24.0);
    }
}
