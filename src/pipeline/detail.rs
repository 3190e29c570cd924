use std::any::Any;
use std::f64::consts::TAU;

use smallvec::SmallVec;

use crate::bounds::{split_shares, whole_percents};
use crate::core::{ChartKind, Coordinate, Point, Rect, SeriesId};
use crate::error::ChartResult;
use crate::render::{
    ArcPrimitive, LinePrimitive, RectPrimitive, Stroke, Surface, TextHAlign, TextPrimitive,
};

use super::{DrawerCore, Layer, LayerPass, Scene};

const PANEL_OFFSET_PX: f64 = 12.0;
const LINE_HEIGHT_RATIO: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
struct DetailPanel {
    frame: RectPrimitive,
    texts: Vec<TextPrimitive>,
}

/// Selection overlay: guide line, point markers or a bar mask, and a detail
/// box listing every visible series at the selected index.
#[derive(Debug, Clone)]
pub struct DetailOverlayLayer<X: Coordinate, Y: Coordinate> {
    core: DrawerCore<X, Y>,
    selected: Option<usize>,
    guide: Option<LinePrimitive>,
    /// Markers at full opacity; series alpha is applied when drawing.
    markers: Vec<(SeriesId, ArcPrimitive)>,
    masks: Vec<RectPrimitive>,
    panel: Option<DetailPanel>,
}

impl<X: Coordinate, Y: Coordinate> Default for DetailOverlayLayer<X, Y> {
    fn default() -> Self {
        Self {
            core: DrawerCore::new(),
            selected: None,
            guide: None,
            markers: Vec::new(),
            masks: Vec::new(),
            panel: None,
        }
    }
}

impl<X: Coordinate, Y: Coordinate> DetailOverlayLayer<X, Y> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Text rows of the detail box, header first.
    #[must_use]
    pub fn rows(&self) -> Vec<&str> {
        self.panel
            .as_ref()
            .map(|panel| panel.texts.iter().map(|text| text.text.as_str()).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn panel_rect(&self) -> Option<Rect> {
        self.panel.as_ref().map(|panel| panel.frame.rect)
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn clear(&mut self) {
        self.guide = None;
        self.markers.clear();
        self.masks.clear();
        self.panel = None;
    }
}

impl<X: Coordinate, Y: Coordinate> Layer<X, Y> for DetailOverlayLayer<X, Y> {
    fn name(&self) -> &'static str {
        "detail-overlay"
    }

    fn pass(&self) -> LayerPass {
        LayerPass::Post
    }

    fn core(&self) -> &DrawerCore<X, Y> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DrawerCore<X, Y> {
        &mut self.core
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn rebuild(
        &mut self,
        scene: &Scene<'_, Y>,
        rect: Rect,
        surface: &dyn Surface,
    ) -> ChartResult<()> {
        self.clear();
        let (Some(data), Some(bounds)) = (self.core.data().cloned(), self.core.bounds()) else {
            return Ok(());
        };
        let Some(index) = self.selected else {
            return Ok(());
        };
        if index < bounds.min_x_index || index > bounds.max_x_index {
            return Ok(());
        }

        let style = scene.style;
        let projection = bounds.projection(rect);
        let kind = data.chart_kind(false);
        let anchor_x = match kind {
            ChartKind::Bar | ChartKind::StackedBar => {
                let (left, width) = projection.bar_slot(index);
                let right = left + width;
                if left > rect.left() {
                    self.masks.push(RectPrimitive::filled(
                        Rect::new(rect.left(), rect.top(), left - rect.left(), rect.height),
                        style.mask_color,
                    ));
                }
                if right < rect.right() {
                    self.masks.push(RectPrimitive::filled(
                        Rect::new(right, rect.top(), rect.right() - right, rect.height),
                        style.mask_color,
                    ));
                }
                left + width / 2.0
            }
            _ => {
                let x = projection.index_to_x(index as f64);
                self.guide = Some(LinePrimitive::new(
                    x,
                    rect.top(),
                    x,
                    rect.bottom(),
                    Stroke::new(style.grid_line_width, style.guide_color),
                ));
                if matches!(kind, ChartKind::Line | ChartKind::ScaledLine) {
                    for line in data.lines() {
                        if !scene.visibility.is_drawn(line.id()) {
                            continue;
                        }
                        let line_bounds = if kind == ChartKind::ScaledLine {
                            scene.series_bounds_or(line.id(), bounds)
                        } else {
                            bounds
                        };
                        let y = line_bounds.projection(rect).value_to_y(line.value(index));
                        self.markers.push((
                            line.id().clone(),
                            ArcPrimitive {
                                center: Point::new(x, y),
                                radius: style.marker_radius,
                                start_angle: 0.0,
                                sweep_angle: TAU,
                                fill: line.color(),
                                wedge: false,
                            },
                        ));
                    }
                }
                x
            }
        };

        let visible: SmallVec<[bool; 8]> = data
            .lines()
            .iter()
            .map(|line| {
                scene
                    .visibility
                    .get(line.id())
                    .is_some_and(|state| state.is_visible())
            })
            .collect();
        let percents = if data.percentage() {
            let entries: SmallVec<[(Y, f64); 8]> = data
                .lines()
                .iter()
                .zip(visible.iter())
                .map(|(line, shown)| (line.value(index), if *shown { 1.0 } else { 0.0 }))
                .collect();
            Some(whole_percents(&split_shares(&entries)))
        } else {
            None
        };

        let font_size_px = style.font_size_px;
        let line_height = font_size_px * LINE_HEIGHT_RATIO;
        let padding = style.detail_padding_px;
        let mut texts = vec![TextPrimitive::new(
            data.x().value(index).header_string(),
            0.0,
            0.0,
            font_size_px,
            style.detail_text_color,
            TextHAlign::Left,
        )];
        for (slot, line) in data.lines().iter().enumerate() {
            if !visible[slot] {
                continue;
            }
            let value = line.value(index).full_string();
            let text = match &percents {
                Some(percents) => format!("{}% {}: {}", percents[slot], line.name(), value),
                None => format!("{}: {}", line.name(), value),
            };
            texts.push(TextPrimitive::new(
                text,
                0.0,
                0.0,
                font_size_px,
                line.color(),
                TextHAlign::Left,
            ));
        }

        let content_width = texts
            .iter()
            .map(|text| surface.measure_text(&text.text, font_size_px))
            .fold(0.0_f64, f64::max);
        let width = content_width + 2.0 * padding;
        let height = texts.len() as f64 * line_height + 2.0 * padding;
        let mut left = anchor_x + PANEL_OFFSET_PX;
        if left + width > rect.right() {
            left = anchor_x - PANEL_OFFSET_PX - width;
        }
        let left = left.max(rect.left());
        let top = rect.top() + padding;
        for (row, text) in texts.iter_mut().enumerate() {
            text.x = left + padding;
            let baseline = (row as f64 + 1.0) * line_height - (line_height - font_size_px);
            text.y = top + padding + baseline;
        }
        self.panel = Some(DetailPanel {
            frame: RectPrimitive::filled(
                Rect::new(left, top, width, height),
                style.detail_background,
            )
            .with_border(Stroke::new(1.0, style.detail_border))
            .with_corner_radius(style.detail_corner_radius),
            texts,
        });
        Ok(())
    }

    fn draw(&self, scene: &Scene<'_, Y>, surface: &mut dyn Surface) -> ChartResult<()> {
        for mask in &self.masks {
            surface.draw_rect(mask)?;
        }
        if let Some(guide) = self.guide {
            surface.draw_segments(&[guide])?;
        }
        for (id, marker) in &self.markers {
            let alpha = scene.visibility.alpha(id);
            if alpha == 0 {
                continue;
            }
            surface.draw_arc(&ArcPrimitive {
                fill: marker.fill.with_opacity(alpha),
                ..*marker
            })?;
        }
        Ok(())
    }

    fn after_draw(&self, _scene: &Scene<'_, Y>, surface: &mut dyn Surface) -> ChartResult<()> {
        if let Some(panel) = &self.panel {
            surface.draw_rect(&panel.frame)?;
            for text in &panel.texts {
                surface.draw_text(text)?;
            }
        }
        Ok(())
    }

    fn on_selection_changed(&mut self, selected: Option<usize>) {
        if self.selected != selected {
            self.selected = selected;
            self.core.invalidate();
        }
    }

    fn on_series_bounds_changed(&mut self) {
        if self.selected.is_some() {
            self.core.invalidate();
        }
    }

    fn on_visibility_changed(&mut self) {
        if self.selected.is_some() {
            self.core.invalidate();
        }
    }
}
