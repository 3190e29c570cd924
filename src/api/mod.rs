//! Host-facing facade: engine, configuration and outbound events.

mod config;
mod engine;

pub use config::ChartEngineConfig;
pub use engine::ChartEngine;

pub use crate::interaction::ChartEvent;
pub use crate::pipeline::ChartStyle;
