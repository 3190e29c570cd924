use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid drawing rect: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("series `{series}` has {actual} points, expected {expected}")]
    SeriesLengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid index window [{min}, {max}] for {len} points")]
    InvalidWindow { min: usize, max: usize, len: usize },

    #[error("unknown series `{0}`")]
    UnknownSeries(String),

    #[error("column ingestion failed: {0}")]
    Ingestion(String),

    #[error("drawing surface failed: {0}")]
    Surface(String),
}
