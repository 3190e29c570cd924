//! Adaptive X axis label density.

mod density;

pub use density::{
    DensityPass, LabelCell, LabelDensity, LabelDensityConfig, MAX_SPACING_RATIO,
    MIN_SPACING_RATIO,
};
