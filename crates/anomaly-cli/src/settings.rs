//! Layered settings: defaults, optional file, environment

use anomaly_detector::DetectorConfig;
use indicator_engine::{IndicatorConfig, ScenarioConfig};
use serde::{Deserialize, Serialize};

/// Environment variable prefix, e.g. `FUZZY_ANOMALY_SEED=7`
pub const ENV_PREFIX: &str = "FUZZY_ANOMALY";

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` level filter (`error`, `warn`, `info`, `debug`, `trace`)
    pub level: String,
    /// Emit JSON log lines instead of plain text
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

/// Everything the binary can be configured with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub detector: DetectorConfig,
    pub indicators: IndicatorConfig,
    pub scenario: ScenarioConfig,
    /// Seed of the synthetic scenario when `--seed` is not given
    pub seed: u64,
    pub log: LogSettings,
}

impl Settings {
    /// Load defaults, then `path` if given, then `FUZZY_ANOMALY_*` variables
    ///
    /// Nested keys use a double underscore: `FUZZY_ANOMALY_LOG__LEVEL=debug`.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
