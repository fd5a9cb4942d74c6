//! Fuzzy Anomaly Detector
//!
//! Maps three normalized indicators of a time-series window (forecast error,
//! variance change, correlation change) to a crisp anomaly level in `[0, 10]`
//! and a dominant linguistic label, using a fixed Mamdani rule base.

pub mod config;
mod detector;
mod level;
mod rules;

pub use config::DetectorConfig;
pub use detector::{AnomalyAssessment, AnomalyDetector};
pub use level::{AnomalyLevel, ParseLevelError};
pub use rules::{
    default_rules, ANOMALY_LEVEL, CORRELATION_CHANGE, FORECAST_ERROR, INPUT_NAMES,
    VARIANCE_CHANGE,
};

pub use fuzzy_engine::{ConfigurationError, EmptyOutputPolicy, InvalidInputError, Rule};
pub use indicator_engine::Indicators;
