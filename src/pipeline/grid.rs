use std::any::Any;
use std::time::Duration;

use crate::core::{Bounds, Coordinate, Rect};
use crate::error::ChartResult;
use crate::render::{Color, LinePrimitive, Stroke, Surface, TextHAlign, TextPrimitive};
use crate::transition::{Easing, OPAQUE, OpacityTransition, TRANSPARENT, Transition};

use super::{BoundsChange, DrawerCore, Layer, LayerPass, Scene};

const PERCENT_ROWS: [u32; 5] = [0, 25, 50, 75, 100];
const LABEL_LIFT_PX: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMode {
    /// Rows at evenly spaced values of the shared Y range.
    Plain,
    /// Fixed 0/25/50/75/100% rows.
    Percentage,
    /// Rows at fixed ratios, labelled left and right by the first two visible series.
    Scaled,
}

/// One generation of grid rows fading as a unit.
#[derive(Debug, Clone, PartialEq)]
struct RowSet<Y: Coordinate> {
    /// Target Y range the values were taken from; `None` for ratio rows.
    range: Option<(Y, Y)>,
    opacity: OpacityTransition,
    lines: Vec<LinePrimitive>,
    texts: Vec<TextPrimitive>,
}

/// Horizontal grid rows with value labels.
///
/// When the target Y range changes the old generation fades out while the new
/// one fades in, both positioned through the animated bounds.
#[derive(Debug, Clone)]
pub struct GridLayer<X: Coordinate, Y: Coordinate> {
    core: DrawerCore<X, Y>,
    mode: GridMode,
    rows: usize,
    fade: Duration,
    easing: Easing,
    current: Option<RowSet<Y>>,
    fading: Vec<RowSet<Y>>,
}

impl<X: Coordinate, Y: Coordinate> GridLayer<X, Y> {
    #[must_use]
    pub fn new(mode: GridMode, rows: usize, fade: Duration, easing: Easing) -> Self {
        Self {
            core: DrawerCore::new(),
            mode,
            rows: rows.max(1),
            fade,
            easing,
            current: None,
            fading: Vec::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> GridMode {
        self.mode
    }

    /// Row Y pixels of the current generation.
    #[must_use]
    pub fn row_positions(&self) -> Vec<f64> {
        self.current
            .as_ref()
            .map(|set| set.lines.iter().map(|line| line.y1).collect())
            .unwrap_or_default()
    }

    /// Generations still fading out.
    #[must_use]
    pub fn fading_generations(&self) -> usize {
        self.fading.len()
    }

    /// Starts a new generation for `range`, retiring the current one.
    fn roll_generation(&mut self, range: Option<(Y, Y)>, now: Duration) {
        let opacity = match self.current.take() {
            Some(mut old) => {
                old.opacity.retarget(TRANSPARENT, now);
                self.fading.push(old);
                OpacityTransition::starting(TRANSPARENT, OPAQUE, now, self.fade, self.easing)
            }
            None => OpacityTransition::settled(OPAQUE, self.fade, self.easing),
        };
        self.current = Some(RowSet {
            range,
            opacity,
            lines: Vec::new(),
            texts: Vec::new(),
        });
    }

    fn value_rows(
        &self,
        set: &mut RowSet<Y>,
        bounds: Bounds<Y>,
        rect: Rect,
        stroke: Stroke,
        text_color: Color,
        font_size_px: f64,
    ) {
        set.lines.clear();
        set.texts.clear();
        let Some((min, max)) = set.range else {
            return;
        };
        let projection = bounds.projection(rect);
        let span = min.distance_to(max);
        for row in 0..self.rows {
            let value = min.add(span.get_part(row as f64 / self.rows as f64));
            let y = projection.value_to_y(value);
            set.lines
                .push(LinePrimitive::new(rect.left(), y, rect.right(), y, stroke));
            set.texts.push(TextPrimitive::new(
                value.axis_string(),
                rect.left(),
                y - LABEL_LIFT_PX,
                font_size_px,
                text_color,
                TextHAlign::Left,
            ));
        }
    }
}

impl<X: Coordinate, Y: Coordinate> Layer<X, Y> for GridLayer<X, Y> {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn pass(&self) -> LayerPass {
        LayerPass::Pre
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
        _surface: &dyn Surface,
    ) -> ChartResult<()> {
        let (Some(data), Some(bounds)) = (self.core.data().cloned(), self.core.bounds()) else {
            return Ok(());
        };
        let style = scene.style;
        let stroke = Stroke::new(style.grid_line_width, style.grid_color);

        match self.mode {
            GridMode::Plain => {
                let target = (scene.target.min_y, scene.target.max_y);
                if self.current.as_ref().and_then(|set| set.range) != Some(target) {
                    self.roll_generation(Some(target), scene.now);
                }
                let mut sets: Vec<RowSet<Y>> = self.current.take().into_iter().collect();
                sets.append(&mut self.fading);
                for set in &mut sets {
                    self.value_rows(
                        set,
                        bounds,
                        rect,
                        stroke,
                        style.axis_text_color,
                        style.font_size_px,
                    );
                }
                let mut sets = sets.into_iter();
                self.current = sets.next();
                self.fading = sets.collect();
            }
            GridMode::Percentage => {
                if self.current.is_none() {
                    self.roll_generation(None, scene.now);
                }
                if let Some(set) = self.current.as_mut() {
                    set.lines.clear();
                    set.texts.clear();
                    for percent in PERCENT_ROWS {
                        let y = rect.bottom() - f64::from(percent) / 100.0 * rect.height;
                        set.lines
                            .push(LinePrimitive::new(rect.left(), y, rect.right(), y, stroke));
                        set.texts.push(TextPrimitive::new(
                            format!("{percent}%"),
                            rect.left(),
                            y - LABEL_LIFT_PX,
                            style.font_size_px,
                            style.axis_text_color,
                            TextHAlign::Left,
                        ));
                    }
                }
            }
            GridMode::Scaled => {
                if self.current.is_none() {
                    self.roll_generation(None, scene.now);
                }
                let labelled: Vec<_> = data
                    .lines()
                    .iter()
                    .filter(|line| {
                        scene
                            .visibility
                            .get(line.id())
                            .is_some_and(|state| state.is_visible())
                    })
                    .take(2)
                    .map(|line| (scene.series_bounds_or(line.id(), bounds), line.color()))
                    .collect();
                let rows = self.rows;
                if let Some(set) = self.current.as_mut() {
                    set.lines.clear();
                    set.texts.clear();
                    for row in 0..rows {
                        let ratio = row as f64 / rows as f64;
                        let y = rect.bottom() - ratio * rect.height;
                        set.lines
                            .push(LinePrimitive::new(rect.left(), y, rect.right(), y, stroke));
                        for (side, (line_bounds, color)) in labelled.iter().enumerate() {
                            let value = line_bounds
                                .min_y
                                .add(line_bounds.y_span().get_part(ratio));
                            let (x, align) = if side == 0 {
                                (rect.left(), TextHAlign::Left)
                            } else {
                                (rect.right(), TextHAlign::Right)
                            };
                            set.texts.push(TextPrimitive::new(
                                value.axis_string(),
                                x,
                                y - LABEL_LIFT_PX,
                                style.font_size_px,
                                *color,
                                align,
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn draw(&self, _scene: &Scene<'_, Y>, surface: &mut dyn Surface) -> ChartResult<()> {
        for set in self.current.iter().chain(self.fading.iter()) {
            let alpha = set.opacity.alpha();
            if alpha == TRANSPARENT {
                continue;
            }
            let lines: Vec<LinePrimitive> = set
                .lines
                .iter()
                .map(|line| LinePrimitive {
                    stroke: Stroke::new(line.stroke.width, line.stroke.color.with_opacity(alpha)),
                    ..*line
                })
                .collect();
            surface.draw_segments(&lines)?;
            for text in &set.texts {
                let mut text = text.clone();
                text.color = text.color.with_opacity(alpha);
                surface.draw_text(&text)?;
            }
        }
        Ok(())
    }

    fn on_bounds_changed(&mut self, bounds: Bounds<Y>, change: BoundsChange) {
        if change.y_changed() {
            self.core.set_bounds(bounds, change);
        } else {
            self.core.store_bounds(bounds);
        }
    }

    fn on_series_bounds_changed(&mut self) {
        if self.mode == GridMode::Scaled {
            self.core.invalidate();
        }
    }

    fn on_visibility_changed(&mut self) {
        if self.mode == GridMode::Scaled {
            self.core.invalidate();
        }
    }

    fn tick(&mut self, now: Duration) -> bool {
        if let Some(set) = self.current.as_mut() {
            set.opacity.advance(now);
        }
        for set in &mut self.fading {
            set.opacity.advance(now);
        }
        self.fading
            .retain(|set| set.opacity.is_running() || set.opacity.alpha() > TRANSPARENT);
        self.current
            .iter()
            .chain(self.fading.iter())
            .any(|set| set.opacity.is_running())
    }
}
