use std::f64::consts::{FRAC_PI_2, PI};

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;

use crate::core::{Point, Rect};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ArcPrimitive, Color, LinePrimitive, RectPrimitive, Stroke, Surface, TextHAlign, TextPrimitive,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoDrawStats {
    pub segments_drawn: usize,
    pub paths_drawn: usize,
    pub rects_drawn: usize,
    pub arcs_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango drawing surface.
///
/// Either owns an offscreen ARGB image (`new`) or draws into a context
/// supplied by the host, e.g. a GTK drawing-area callback (`from_context`).
#[derive(Debug)]
pub struct CairoSurface {
    context: Context,
    image: Option<ImageSurface>,
    stats: CairoDrawStats,
}

impl CairoSurface {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidViewport {
                width: f64::from(width),
                height: f64::from(height),
            });
        }
        let image = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        let context = Context::new(&image)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok(Self {
            context,
            image: Some(image),
            stats: CairoDrawStats::default(),
        })
    }

    #[must_use]
    pub fn from_context(context: Context) -> Self {
        Self {
            context,
            image: None,
            stats: CairoDrawStats::default(),
        }
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageSurface> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> CairoDrawStats {
        self.stats
    }

    /// Paints the whole target with `color`.
    pub fn clear(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        apply_color(&self.context, color);
        self.context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;
        self.stats = CairoDrawStats::default();
        Ok(())
    }

    fn trace_path(&self, points: &[Point]) {
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            self.context.move_to(first.x, first.y);
        }
        for point in iter {
            self.context.line_to(point.x, point.y);
        }
    }
}

impl Surface for CairoSurface {
    fn draw_segments(&mut self, segments: &[LinePrimitive]) -> ChartResult<()> {
        for segment in segments {
            apply_color(&self.context, segment.stroke.color);
            self.context.set_line_width(segment.stroke.width);
            self.context.move_to(segment.x1, segment.y1);
            self.context.line_to(segment.x2, segment.y2);
            self.context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke segment", err))?;
            self.stats.segments_drawn += 1;
        }
        Ok(())
    }

    fn draw_polyline(&mut self, points: &[Point], stroke: Stroke) -> ChartResult<()> {
        if points.len() < 2 {
            return Ok(());
        }
        self.trace_path(points);
        apply_color(&self.context, stroke.color);
        self.context.set_line_width(stroke.width);
        self.context.set_line_join(cairo::LineJoin::Round);
        self.context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke polyline", err))?;
        self.stats.paths_drawn += 1;
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], fill: Color) -> ChartResult<()> {
        if points.len() < 3 {
            return Ok(());
        }
        self.trace_path(points);
        self.context.close_path();
        apply_color(&self.context, fill);
        self.context
            .fill()
            .map_err(|err| map_backend_error("failed to fill polygon", err))?;
        self.stats.paths_drawn += 1;
        Ok(())
    }

    fn draw_rect(&mut self, rect: &RectPrimitive) -> ChartResult<()> {
        append_rect_path(&self.context, rect.rect, rect.corner_radius);
        if let Some(fill) = rect.fill {
            apply_color(&self.context, fill);
            self.context
                .fill_preserve()
                .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
        }
        if let Some(border) = rect.border {
            apply_color(&self.context, border.color);
            self.context.set_line_width(border.width);
            self.context
                .stroke_preserve()
                .map_err(|err| map_backend_error("failed to stroke rectangle border", err))?;
        }
        self.context.new_path();
        self.stats.rects_drawn += 1;
        Ok(())
    }

    fn draw_arc(&mut self, arc: &ArcPrimitive) -> ChartResult<()> {
        if arc.wedge {
            self.context.move_to(arc.center.x, arc.center.y);
        }
        self.context.arc(
            arc.center.x,
            arc.center.y,
            arc.radius,
            arc.start_angle,
            arc.start_angle + arc.sweep_angle,
        );
        if arc.wedge {
            self.context.close_path();
        }
        apply_color(&self.context, arc.fill);
        self.context
            .fill()
            .map_err(|err| map_backend_error("failed to fill arc", err))?;
        self.stats.arcs_drawn += 1;
        Ok(())
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> ChartResult<()> {
        let layout = pangocairo::functions::create_layout(&self.context);
        let font_description = FontDescription::from_string(&format!("Sans {}", text.font_size_px));
        layout.set_font_description(Some(&font_description));
        layout.set_text(&text.text);

        let (text_width, _text_height) = layout.pixel_size();
        let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);
        let x = match text.h_align {
            TextHAlign::Left => text.x,
            TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
            TextHAlign::Right => text.x - f64::from(text_width),
        };

        apply_color(&self.context, text.color);
        self.context.move_to(x, text.y - baseline);
        pangocairo::functions::show_layout(&self.context, &layout);
        self.stats.texts_drawn += 1;
        Ok(())
    }

    fn measure_text(&self, text: &str, font_size_px: f64) -> f64 {
        let layout = pangocairo::functions::create_layout(&self.context);
        let font_description = FontDescription::from_string(&format!("Sans {font_size_px}"));
        layout.set_font_description(Some(&font_description));
        layout.set_text(text);
        f64::from(layout.pixel_size().0)
    }

    fn save(&mut self) {
        // Cairo only fails here when the context is already in an error state,
        // which the next draw call reports.
        let _ = self.context.save();
    }

    fn restore(&mut self) {
        let _ = self.context.restore();
    }

    fn clip(&mut self, rect: Rect) {
        self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.context.clip();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.context.translate(dx, dy);
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn append_rect_path(context: &Context, rect: Rect, corner_radius: f64) {
    if corner_radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }

    let radius = corner_radius.min(rect.width * 0.5).min(rect.height * 0.5);
    let left = rect.left();
    let top = rect.top();
    let right = rect.right();
    let bottom = rect.bottom();

    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Surface(format!("{prefix}: {err}"))
}
