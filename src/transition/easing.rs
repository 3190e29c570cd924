use serde::{Deserialize, Serialize};

/// Progress curve applied on top of linear time progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseOut,
    EaseInOut,
    CubicOut,
}

impl Easing {
    /// Maps a normalized time `t` to eased progress. Both ends are fixed:
    /// `apply(0.0) == 0.0` and `apply(1.0) == 1.0`, and every curve is monotonic.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::CubicOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
        }
    }
}
