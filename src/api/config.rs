use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::labels::LabelDensityConfig;
use crate::pipeline::{ChartStyle, LayerSettings};
use crate::transition::Easing;

/// Public engine configuration.
///
/// Serializable so hosts can persist chart setup; every field has a default,
/// so a partial JSON object is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    #[serde(default = "default_bounds_transition_ms")]
    pub bounds_transition_ms: u64,
    #[serde(default = "default_visibility_transition_ms")]
    pub visibility_transition_ms: u64,
    #[serde(default = "default_label_fade_ms")]
    pub label_fade_ms: u64,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default = "default_x_label_count")]
    pub x_label_count: usize,
    #[serde(default = "default_x_label_hysteresis")]
    pub x_label_hysteresis: f64,
    #[serde(default = "default_y_grid_rows")]
    pub y_grid_rows: usize,
    /// Narrowest window the overview selector allows, in indices.
    #[serde(default = "default_selector_min_width")]
    pub selector_min_width: usize,
    /// Pixel distance from a selector edge that still grabs the edge.
    #[serde(default = "default_selector_grip_px")]
    pub selector_grip_px: f64,
    #[serde(default)]
    pub style: ChartStyle,
}

impl Default for ChartEngineConfig {
    fn default() -> Self {
        Self {
            bounds_transition_ms: default_bounds_transition_ms(),
            visibility_transition_ms: default_visibility_transition_ms(),
            label_fade_ms: default_label_fade_ms(),
            easing: Easing::default(),
            x_label_count: default_x_label_count(),
            x_label_hysteresis: default_x_label_hysteresis(),
            y_grid_rows: default_y_grid_rows(),
            selector_min_width: default_selector_min_width(),
            selector_grip_px: default_selector_grip_px(),
            style: ChartStyle::default(),
        }
    }
}

impl ChartEngineConfig {
    #[must_use]
    pub fn with_bounds_transition_ms(mut self, value: u64) -> Self {
        self.bounds_transition_ms = value;
        self
    }

    #[must_use]
    pub fn with_visibility_transition_ms(mut self, value: u64) -> Self {
        self.visibility_transition_ms = value;
        self
    }

    #[must_use]
    pub fn with_label_fade_ms(mut self, value: u64) -> Self {
        self.label_fade_ms = value;
        self
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn with_x_label_count(mut self, count: usize) -> Self {
        self.x_label_count = count;
        self
    }

    #[must_use]
    pub fn with_x_label_hysteresis(mut self, hysteresis: f64) -> Self {
        self.x_label_hysteresis = hysteresis;
        self
    }

    #[must_use]
    pub fn with_y_grid_rows(mut self, rows: usize) -> Self {
        self.y_grid_rows = rows;
        self
    }

    #[must_use]
    pub fn with_selector_min_width(mut self, width: usize) -> Self {
        self.selector_min_width = width;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn bounds_transition(&self) -> Duration {
        Duration::from_millis(self.bounds_transition_ms)
    }

    #[must_use]
    pub fn visibility_transition(&self) -> Duration {
        Duration::from_millis(self.visibility_transition_ms)
    }

    #[must_use]
    pub fn label_fade(&self) -> Duration {
        Duration::from_millis(self.label_fade_ms)
    }

    #[must_use]
    pub fn layer_settings(&self) -> LayerSettings {
        LayerSettings {
            y_grid_rows: self.y_grid_rows,
            grid_fade: self.bounds_transition(),
            easing: self.easing,
            labels: LabelDensityConfig {
                label_count: self.x_label_count,
                hysteresis: self.x_label_hysteresis,
                fade: self.label_fade(),
                easing: self.easing,
            },
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.x_label_count == 0 {
            return Err(ChartError::InvalidData(
                "x_label_count must be > 0".to_owned(),
            ));
        }
        if self.y_grid_rows == 0 {
            return Err(ChartError::InvalidData("y_grid_rows must be > 0".to_owned()));
        }
        if !self.x_label_hysteresis.is_finite() || self.x_label_hysteresis < 0.0 {
            return Err(ChartError::InvalidData(
                "x_label_hysteresis must be finite and >= 0".to_owned(),
            ));
        }
        if !self.selector_grip_px.is_finite() || self.selector_grip_px < 0.0 {
            return Err(ChartError::InvalidData(
                "selector_grip_px must be finite and >= 0".to_owned(),
            ));
        }
        self.style.validate()
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize engine config: {e}"))
        })
    }
}

fn default_bounds_transition_ms() -> u64 {
    250
}

fn default_visibility_transition_ms() -> u64 {
    250
}

fn default_label_fade_ms() -> u64 {
    200
}

fn default_x_label_count() -> usize {
    6
}

fn default_x_label_hysteresis() -> f64 {
    0.5
}

fn default_y_grid_rows() -> usize {
    6
}

fn default_selector_min_width() -> usize {
    10
}

fn default_selector_grip_px() -> f64 {
    12.0
}

#[cfg(test)]
mod tests {
    use super::ChartEngineConfig;
    use crate::transition::Easing;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let raw = r#"{"bounds_transition_ms": 400, "easing": "ease_out"}"#;
        let config = ChartEngineConfig::from_json_str(raw).expect("config");
        assert_eq!(config.bounds_transition_ms, 400);
        assert_eq!(config.easing, Easing::EaseOut);
        assert_eq!(config.x_label_count, 6);
        assert_eq!(config.label_fade_ms, 200);
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = ChartEngineConfig::default()
            .with_y_grid_rows(4)
            .with_easing(Easing::CubicOut);
        let json = config.to_json_pretty().expect("json");
        assert_eq!(ChartEngineConfig::from_json_str(&json).expect("config"), config);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(ChartEngineConfig::from_json_str(r#"{"x_label_count": 0}"#).is_err());
        assert!(ChartEngineConfig::from_json_str("not json").is_err());
    }
}
