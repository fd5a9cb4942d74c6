//! Anomaly Detector

use crate::config::DetectorConfig;
use crate::level::AnomalyLevel;
use crate::rules::{default_rules, input_variables, output_variable};
use fuzzy_engine::{ConfigurationError, FuzzyEngine, InvalidInputError, Rule, RuleActivation};
use indicator_engine::Indicators;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Result of scoring one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyAssessment {
    /// Defuzzified anomaly level within the output domain
    pub crisp_value: f64,
    /// Dominant label at `crisp_value`
    pub level: AnomalyLevel,
    /// Membership of `crisp_value` in each label
    pub membership_by_label: Vec<(String, f64)>,
    /// Firing strength of every rule
    pub activations: Vec<RuleActivation>,
    /// No rule fired; `crisp_value` comes from the empty-output policy
    pub fallback_applied: bool,
}

impl AnomalyAssessment {
    /// Label as its term name
    pub fn label(&self) -> &'static str {
        self.level.as_str()
    }

    /// `(crisp_value, label)` pair
    pub fn score(&self) -> (f64, &'static str) {
        (self.crisp_value, self.label())
    }
}

/// Fuzzy anomaly detector over the three window indicators
///
/// Read-only after construction. `evaluate` takes `&self` and keeps no state
/// between calls, so a single detector can be shared across threads.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    engine: FuzzyEngine,
    config: DetectorConfig,
}

impl AnomalyDetector {
    /// Detector with the default configuration and rule base
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::with_config(DetectorConfig::default())
    }

    /// Detector with configuration overrides and the default rule base
    pub fn with_config(config: DetectorConfig) -> Result<Self, ConfigurationError> {
        Self::with_rules(config, default_rules())
    }

    /// Detector over the standard variables with a custom rule set
    pub fn with_rules(config: DetectorConfig, rules: Vec<Rule>) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let engine = FuzzyEngine::new(input_variables(&config)?, output_variable(&config)?, rules)?
            .with_empty_output(config.empty_output);

        info!(
            "Created anomaly detector: resolution={}, input={:?}, output={:?}, rules={}",
            config.resolution,
            config.input_domain,
            config.output_domain,
            engine.rule_count()
        );

        Ok(Self { engine, config })
    }

    /// Score a window from its three indicators
    ///
    /// Values outside the input domain are clamped; NaN or infinite values are rejected.
    pub fn evaluate(
        &self,
        forecast_error: f64,
        variance_change: f64,
        correlation_change: f64,
    ) -> Result<AnomalyAssessment, InvalidInputError> {
        let result = self
            .engine
            .evaluate_ordered(&[forecast_error, variance_change, correlation_change])?;

        // Output terms are registered in AnomalyLevel::ALL order
        let level = AnomalyLevel::from_index(result.label_index).unwrap_or_default();

        debug!(
            "Assessment fe={:.3} vc={:.3} cc={:.3} -> {:.3} ({})",
            forecast_error, variance_change, correlation_change, result.crisp_value, level
        );

        Ok(AnomalyAssessment {
            crisp_value: result.crisp_value,
            level,
            membership_by_label: result.membership_by_label,
            activations: result.activations,
            fallback_applied: result.fallback_applied,
        })
    }

    /// Score a window from a computed indicator set
    pub fn evaluate_indicators(
        &self,
        indicators: &Indicators,
    ) -> Result<AnomalyAssessment, InvalidInputError> {
        self.evaluate(
            indicators.forecast_error,
            indicators.variance_change,
            indicators.correlation_change,
        )
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Underlying inference engine
    pub fn engine(&self) -> &FuzzyEngine {
        &self.engine
    }
}
