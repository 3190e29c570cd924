use crate::core::{Point, Rect};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ArcPrimitive, Color, LinePrimitive, RectPrimitive, Stroke, Surface, TextPrimitive,
    validate_points,
};

/// Recorded polyline or filled polygon.
#[derive(Debug, Clone, PartialEq)]
pub enum PathPrimitive {
    Polyline { points: Vec<Point>, stroke: Stroke },
    Polygon { points: Vec<Point>, fill: Color },
}

/// One recorded surface call, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line(LinePrimitive),
    Path(PathPrimitive),
    Rect(RectPrimitive),
    Arc(ArcPrimitive),
    Text(TextPrimitive),
    Save,
    Restore,
    Clip(Rect),
    Translate { dx: f64, dy: f64 },
}

/// Backend-agnostic record of one composed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub area: Rect,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            commands: Vec::new(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.area.validate()?;

        let mut depth = 0usize;
        for command in &self.commands {
            match command {
                DrawCommand::Line(line) => line.validate()?,
                DrawCommand::Path(PathPrimitive::Polyline { points, stroke }) => {
                    validate_points(points)?;
                    stroke.validate()?;
                }
                DrawCommand::Path(PathPrimitive::Polygon { points, fill }) => {
                    validate_points(points)?;
                    fill.validate()?;
                }
                DrawCommand::Rect(rect) => rect.validate()?,
                DrawCommand::Arc(arc) => arc.validate()?,
                DrawCommand::Text(text) => text.validate()?,
                DrawCommand::Save => depth += 1,
                DrawCommand::Restore => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        ChartError::InvalidData("restore without matching save".to_owned())
                    })?;
                }
                DrawCommand::Clip(_) | DrawCommand::Translate { .. } => {}
            }
        }
        if depth != 0 {
            return Err(ChartError::InvalidData(format!(
                "{depth} unbalanced save call(s)"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Path(path) => Some(path),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Rect(rect) => Some(rect),
            _ => None,
        })
    }

    pub fn arcs(&self) -> impl Iterator<Item = &ArcPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Arc(arc) => Some(arc),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }

    /// Replays the recorded commands onto another surface.
    pub fn replay(&self, surface: &mut dyn Surface) -> ChartResult<()> {
        for command in &self.commands {
            match command {
                DrawCommand::Line(line) => surface.draw_segments(std::slice::from_ref(line))?,
                DrawCommand::Path(PathPrimitive::Polyline { points, stroke }) => {
                    surface.draw_polyline(points, *stroke)?;
                }
                DrawCommand::Path(PathPrimitive::Polygon { points, fill }) => {
                    surface.fill_polygon(points, *fill)?;
                }
                DrawCommand::Rect(rect) => surface.draw_rect(rect)?,
                DrawCommand::Arc(arc) => surface.draw_arc(arc)?,
                DrawCommand::Text(text) => surface.draw_text(text)?,
                DrawCommand::Save => surface.save(),
                DrawCommand::Restore => surface.restore(),
                DrawCommand::Clip(rect) => surface.clip(*rect),
                DrawCommand::Translate { dx, dy } => surface.translate(*dx, *dy),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawCommand, RenderFrame};
    use crate::core::Rect;

    #[test]
    fn unbalanced_save_restore_is_invalid() {
        let mut frame = RenderFrame::new(Rect::from_size(10.0, 10.0));
        frame.commands.push(DrawCommand::Save);
        assert!(frame.validate().is_err());
        frame.commands.push(DrawCommand::Restore);
        assert!(frame.validate().is_ok());
        frame.commands.push(DrawCommand::Restore);
        assert!(frame.validate().is_err());
    }
}
