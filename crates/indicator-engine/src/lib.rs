//! Window Indicator Engine
//!
//! Reduces a multivariate time-series window and a baseline to three
//! normalized indicators in `[0, 1]`: forecast error, variance change and
//! correlation change. Also generates the seeded synthetic scenario used to
//! demonstrate the detector.

mod indicators;
mod statistics;
mod synthetic;

pub use indicators::{
    correlation_change, forecast_error, variance_change, IndicatorConfig, Indicators,
};
pub use statistics::WindowStatistics;
pub use synthetic::{ScenarioConfig, SyntheticScenario};

use thiserror::Error;

/// Errors during indicator computation or scenario generation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("Window is empty")]
    EmptyWindow,
    #[error("At least {required} samples required, got {actual}")]
    TooFewSamples { required: usize, actual: usize },
    #[error("Series length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Channel count mismatch: window has {window}, baseline has {baseline}")]
    ChannelMismatch { window: usize, baseline: usize },
    #[error("Covariance matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("Covariance matrix is not positive definite")]
    NotPositiveDefinite,
    #[error("Invalid indicator setting {field} = {value}")]
    InvalidConfig { field: &'static str, value: f64 },
}
