//! Fuzzy Anomaly Command Line
//!
//! Runs the synthetic demonstration scenario or a single evaluation through
//! the anomaly detector and renders the outcome as text or JSON.

mod report;
mod settings;

pub use report::{render_assessment, render_demo, render_window, DemoReport, WindowReport};
pub use settings::{LogSettings, Settings, ENV_PREFIX};

use anomaly_detector::{AnomalyAssessment, AnomalyDetector};
use anyhow::Context;
use indicator_engine::{Indicators, SyntheticScenario};
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Initialize logging on stderr so reports on stdout stay clean
pub fn init_logging(log: &LogSettings) -> anyhow::Result<()> {
    let level = Level::from_str(&log.level)
        .with_context(|| format!("Invalid log level '{}'", log.level))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.context("Failed to set tracing subscriber")
}

/// Generate the scenario for `seed` and score its normal and anomalous windows
pub fn run_demo(settings: &Settings, seed: u64) -> anyhow::Result<DemoReport> {
    let detector = AnomalyDetector::with_config(settings.detector.clone())
        .context("Invalid detector configuration")?;
    let scenario = SyntheticScenario::generate_with(seed, &settings.scenario)
        .context("Failed to generate synthetic scenario")?;

    info!("Running demo scenario with seed {}", seed);

    let windows = [
        ("Normal window", &scenario.window_normal),
        ("Anomalous window", &scenario.window_anomalous),
    ]
    .into_iter()
    .map(|(title, window)| -> anyhow::Result<WindowReport> {
        let indicators =
            Indicators::compute_with(window.view(), scenario.baseline.view(), &settings.indicators)
                .with_context(|| format!("Failed to compute indicators for {}", title))?;
        let assessment = detector.evaluate_indicators(&indicators)?;
        Ok(WindowReport {
            title: title.to_string(),
            indicators,
            assessment,
        })
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(DemoReport { seed, windows })
}

/// Score one set of indicator values
pub fn run_eval(
    settings: &Settings,
    forecast_error: f64,
    variance_change: f64,
    correlation_change: f64,
) -> anyhow::Result<AnomalyAssessment> {
    let detector = AnomalyDetector::with_config(settings.detector.clone())
        .context("Invalid detector configuration")?;
    let assessment = detector.evaluate(forecast_error, variance_change, correlation_change)?;
    Ok(assessment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anomaly_detector::AnomalyLevel;

    #[test]
    fn test_demo_separates_windows() {
        let report = run_demo(&Settings::default(), 11).unwrap();
        assert_eq!(report.windows.len(), 2);

        let normal = &report.windows[0].assessment;
        let anomalous = &report.windows[1].assessment;
        assert!(normal.level <= AnomalyLevel::SlightlyAnomalous);
        assert!(anomalous.level >= AnomalyLevel::ModeratelyAnomalous);
        assert!(anomalous.crisp_value > normal.crisp_value);
    }

    #[test]
    fn test_demo_is_reproducible() {
        let settings = Settings::default();
        assert_eq!(run_demo(&settings, 5).unwrap(), run_demo(&settings, 5).unwrap());
    }

    #[test]
    fn test_eval_rejects_nan() {
        assert!(run_eval(&Settings::default(), f64::NAN, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_eval_uses_detector_config() {
        let mut settings = Settings::default();
        settings.detector.output_domain = (0.0, 100.0);
        let assessment = run_eval(&settings, 1.0, 1.0, 1.0).unwrap();
        assert!(assessment.crisp_value > 70.0);
    }

    #[test]
    fn test_invalid_log_level() {
        let log = LogSettings {
            level: "loud".to_string(),
            json: false,
        };
        assert!(init_logging(&log).is_err());
    }
}
