use serde::{Deserialize, Serialize};

use crate::core::Rect;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Colors and metrics shared by every pipeline layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    #[serde(default = "default_grid_color")]
    pub grid_color: Color,
    #[serde(default = "default_axis_text_color")]
    pub axis_text_color: Color,
    #[serde(default = "default_guide_color")]
    pub guide_color: Color,
    #[serde(default = "default_mask_color")]
    pub mask_color: Color,
    #[serde(default = "default_detail_background")]
    pub detail_background: Color,
    #[serde(default = "default_detail_border")]
    pub detail_border: Color,
    #[serde(default = "default_detail_text_color")]
    pub detail_text_color: Color,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_grid_line_width")]
    pub grid_line_width: f64,
    /// Fraction of a bar slot left empty, split evenly on both sides.
    #[serde(default)]
    pub bar_gap_ratio: f64,
    /// Height reserved below the plot for X axis labels.
    #[serde(default = "default_axis_band_px")]
    pub axis_band_px: f64,
    #[serde(default = "default_marker_radius")]
    pub marker_radius: f64,
    #[serde(default = "default_detail_padding")]
    pub detail_padding_px: f64,
    #[serde(default = "default_detail_corner_radius")]
    pub detail_corner_radius: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            grid_color: default_grid_color(),
            axis_text_color: default_axis_text_color(),
            guide_color: default_guide_color(),
            mask_color: default_mask_color(),
            detail_background: default_detail_background(),
            detail_border: default_detail_border(),
            detail_text_color: default_detail_text_color(),
            font_size_px: default_font_size_px(),
            line_width: default_line_width(),
            grid_line_width: default_grid_line_width(),
            bar_gap_ratio: 0.0,
            axis_band_px: default_axis_band_px(),
            marker_radius: default_marker_radius(),
            detail_padding_px: default_detail_padding(),
            detail_corner_radius: default_detail_corner_radius(),
        }
    }
}

impl ChartStyle {
    /// Plot area of `rect` once the X label band is taken off the bottom.
    #[must_use]
    pub fn plot_rect(&self, rect: Rect) -> Rect {
        let band = self.axis_band_px.clamp(0.0, rect.height);
        Rect::new(rect.x, rect.y, rect.width, rect.height - band)
    }

    pub fn validate(&self) -> ChartResult<()> {
        for color in [
            self.grid_color,
            self.axis_text_color,
            self.guide_color,
            self.mask_color,
            self.detail_background,
            self.detail_border,
            self.detail_text_color,
        ] {
            color.validate()?;
        }
        for (name, value) in [
            ("font_size_px", self.font_size_px),
            ("line_width", self.line_width),
            ("grid_line_width", self.grid_line_width),
            ("marker_radius", self.marker_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "style `{name}` must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("axis_band_px", self.axis_band_px),
            ("detail_padding_px", self.detail_padding_px),
            ("detail_corner_radius", self.detail_corner_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "style `{name}` must be finite and >= 0"
                )));
            }
        }
        if !self.bar_gap_ratio.is_finite() || !(0.0..1.0).contains(&self.bar_gap_ratio) {
            return Err(ChartError::InvalidData(
                "style `bar_gap_ratio` must be in [0, 1)".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_grid_color() -> Color {
    Color::rgba(0.094, 0.176, 0.224, 0.1)
}

fn default_axis_text_color() -> Color {
    Color::rgb(0.588, 0.635, 0.667)
}

fn default_guide_color() -> Color {
    Color::rgba(0.094, 0.176, 0.224, 0.25)
}

fn default_mask_color() -> Color {
    Color::rgba(1.0, 1.0, 1.0, 0.5)
}

fn default_detail_background() -> Color {
    Color::rgb(1.0, 1.0, 1.0)
}

fn default_detail_border() -> Color {
    Color::rgb(0.898, 0.918, 0.933)
}

fn default_detail_text_color() -> Color {
    Color::rgb(0.133, 0.133, 0.133)
}

fn default_font_size_px() -> f64 {
    12.0
}

fn default_line_width() -> f64 {
    2.0
}

fn default_grid_line_width() -> f64 {
    1.0
}

fn default_axis_band_px() -> f64 {
    24.0
}

fn default_marker_radius() -> f64 {
    4.0
}

fn default_detail_padding() -> f64 {
    8.0
}

fn default_detail_corner_radius() -> f64 {
    6.0
}

#[cfg(test)]
mod tests {
    use super::ChartStyle;
    use crate::core::Rect;

    #[test]
    fn plot_rect_reserves_axis_band() {
        let style = ChartStyle::default();
        let plot = style.plot_rect(Rect::from_size(300.0, 200.0));
        assert_eq!(plot.height, 176.0);
        let tiny = style.plot_rect(Rect::from_size(300.0, 10.0));
        assert_eq!(tiny.height, 0.0);
    }

    #[test]
    fn default_style_is_valid() {
        assert!(ChartStyle::default().validate().is_ok());
        let broken = ChartStyle {
            bar_gap_ratio: 1.0,
            ..ChartStyle::default()
        };
        assert!(broken.validate().is_err());
    }
}
