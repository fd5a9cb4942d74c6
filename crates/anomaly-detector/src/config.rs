//! Detector configuration

use fuzzy_engine::{ConfigurationError, EmptyOutputPolicy};
use serde::{Deserialize, Serialize};

/// Detector configuration
///
/// Term breakpoints are defined on the default domains and rescaled linearly
/// when a domain is overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Sample points per universe of discourse
    pub resolution: usize,

    /// Domain shared by the three input indicators
    pub input_domain: (f64, f64),

    /// Domain of the anomaly level
    pub output_domain: (f64, f64),

    /// Value reported when no rule fires
    pub empty_output: EmptyOutputPolicy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            resolution: 101,
            input_domain: (0.0, 1.0),
            output_domain: (0.0, 10.0),
            empty_output: EmptyOutputPolicy::DomainMin,
        }
    }
}

impl DetectorConfig {
    /// Tenfold universe resolution for smoother centroids
    pub fn fine() -> Self {
        Self {
            resolution: 1001,
            ..Default::default()
        }
    }

    /// Check domains and resolution before building any variable
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.resolution < 2 {
            return Err(ConfigurationError::InvalidResolution {
                variable: "*".to_string(),
                resolution: self.resolution,
            });
        }
        for (variable, (min, max)) in [("input", self.input_domain), ("output", self.output_domain)] {
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(ConfigurationError::InvalidDomain {
                    variable: variable.to_string(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}
