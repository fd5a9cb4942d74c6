//! Normalized Window Indicators

use crate::statistics::WindowStatistics;
use crate::IndicatorError;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Indicator computation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Guard added to denominators
    pub eps: f64,
    /// Upper clip for the per-channel variance ratio
    pub variance_ratio_cap: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            eps: 1e-6,
            variance_ratio_cap: 5.0,
        }
    }
}

impl IndicatorConfig {
    /// `eps` must be finite and positive, the ratio cap finite and above 1
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if !self.eps.is_finite() || self.eps <= 0.0 {
            return Err(IndicatorError::InvalidConfig {
                field: "eps",
                value: self.eps,
            });
        }
        if !self.variance_ratio_cap.is_finite() || self.variance_ratio_cap <= 1.0 {
            return Err(IndicatorError::InvalidConfig {
                field: "variance_ratio_cap",
                value: self.variance_ratio_cap,
            });
        }
        Ok(())
    }
}

/// The three normalized indicators of a window, each in `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    pub forecast_error: f64,
    pub variance_change: f64,
    pub correlation_change: f64,
}

impl Indicators {
    /// Indicators of `window` against `baseline` with default settings
    pub fn compute(
        window: ArrayView2<'_, f64>,
        baseline: ArrayView2<'_, f64>,
    ) -> Result<Self, IndicatorError> {
        Self::compute_with(window, baseline, &IndicatorConfig::default())
    }

    /// Indicators of `window` against `baseline`
    ///
    /// The forecast for channel 0 is the constant baseline mean of that channel.
    pub fn compute_with(
        window: ArrayView2<'_, f64>,
        baseline: ArrayView2<'_, f64>,
        config: &IndicatorConfig,
    ) -> Result<Self, IndicatorError> {
        config.validate()?;
        check_channels(window, baseline)?;

        let actual = window.column(0);
        let forecast_level = baseline
            .column(0)
            .mean()
            .ok_or(IndicatorError::EmptyWindow)?;
        let forecast = Array1::from_elem(actual.len(), forecast_level);

        let indicators = Self {
            forecast_error: forecast_error(actual, forecast.view(), config)?,
            variance_change: variance_change(window, baseline, config)?,
            correlation_change: correlation_change(window, baseline, config)?,
        };

        debug!(
            "Indicators over {} samples: fe={:.3} vc={:.3} cc={:.3}",
            window.nrows(),
            indicators.forecast_error,
            indicators.variance_change,
            indicators.correlation_change
        );

        Ok(indicators)
    }

    /// `[forecast_error, variance_change, correlation_change]`
    pub fn as_array(&self) -> [f64; 3] {
        [self.forecast_error, self.variance_change, self.correlation_change]
    }
}

fn check_channels(
    window: ArrayView2<'_, f64>,
    baseline: ArrayView2<'_, f64>,
) -> Result<(), IndicatorError> {
    if window.is_empty() || baseline.is_empty() {
        return Err(IndicatorError::EmptyWindow);
    }
    if window.ncols() != baseline.ncols() {
        return Err(IndicatorError::ChannelMismatch {
            window: window.ncols(),
            baseline: baseline.ncols(),
        });
    }
    Ok(())
}

/// Mean absolute error relative to the range of the actual series
pub fn forecast_error(
    actual: ArrayView1<'_, f64>,
    predicted: ArrayView1<'_, f64>,
    config: &IndicatorConfig,
) -> Result<f64, IndicatorError> {
    config.validate()?;
    if actual.is_empty() {
        return Err(IndicatorError::EmptyWindow);
    }
    if actual.len() != predicted.len() {
        return Err(IndicatorError::LengthMismatch {
            expected: actual.len(),
            actual: predicted.len(),
        });
    }

    let mae = (&actual - &predicted)
        .mapv(f64::abs)
        .mean()
        .ok_or(IndicatorError::EmptyWindow)?;
    let max = actual.fold(f64::NEG_INFINITY, |m, &x| m.max(x));
    let min = actual.fold(f64::INFINITY, |m, &x| m.min(x));
    let range = max - min + config.eps;

    Ok((mae / (range + config.eps)).clamp(0.0, 1.0))
}

/// Average growth of per-channel variance over the baseline
///
/// Ratios are clipped to `[0, cap]`; a ratio at the cap maps to 1.
pub fn variance_change(
    window: ArrayView2<'_, f64>,
    baseline: ArrayView2<'_, f64>,
    config: &IndicatorConfig,
) -> Result<f64, IndicatorError> {
    config.validate()?;
    check_channels(window, baseline)?;

    let cap = config.variance_ratio_cap;
    let window_var = window.var_axis(Axis(0), 0.0);
    let baseline_var = baseline.var_axis(Axis(0), 0.0);

    let growth = window_var
        .iter()
        .zip(baseline_var.iter())
        .map(|(w, b)| (w / (b + config.eps)).clamp(0.0, cap) - 1.0)
        .sum::<f64>()
        / window_var.len() as f64;

    Ok((growth / (cap - 1.0)).clamp(0.0, 1.0))
}

/// Frobenius distance between window and baseline correlation matrices
///
/// Normalized by `2d`, `d` being the channel count.
pub fn correlation_change(
    window: ArrayView2<'_, f64>,
    baseline: ArrayView2<'_, f64>,
    config: &IndicatorConfig,
) -> Result<f64, IndicatorError> {
    config.validate()?;
    check_channels(window, baseline)?;

    let window_stats = WindowStatistics::compute(window)?;
    let baseline_stats = WindowStatistics::compute(baseline)?;

    let diff = &window_stats.correlation - &baseline_stats.correlation;
    let frobenius = diff.mapv(|x| x * x).sum().sqrt();
    let max_possible = 2.0 * window_stats.channels() as f64;

    Ok((frobenius / (max_possible + config.eps)).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn config() -> IndicatorConfig {
        IndicatorConfig::default()
    }

    #[test]
    fn test_perfect_forecast_is_zero() {
        let actual = array![1.0, 3.0, 2.0, 5.0];
        let error = forecast_error(actual.view(), actual.view(), &config()).unwrap();
        assert_eq!(error, 0.0);
    }

    #[test]
    fn test_forecast_error_relative_to_range() {
        let actual = array![0.0, 10.0];
        let predicted = array![1.0, 9.0];
        // MAE 1 over range 10
        let error = forecast_error(actual.view(), predicted.view(), &config()).unwrap();
        assert!((error - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_forecast_error_is_clipped() {
        let actual = array![5.0, 5.0, 5.0];
        let predicted = array![0.0, 0.0, 0.0];
        // Zero range: the eps guard makes the ratio huge, then clipped
        let error = forecast_error(actual.view(), predicted.view(), &config()).unwrap();
        assert_eq!(error, 1.0);
    }

    #[test]
    fn test_forecast_error_length_mismatch() {
        let actual = array![1.0, 2.0];
        let predicted = array![1.0];
        assert!(matches!(
            forecast_error(actual.view(), predicted.view(), &config()),
            Err(IndicatorError::LengthMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_same_data_has_no_change() {
        let data = array![[1.0, 4.0], [2.0, 1.0], [3.0, 5.0], [4.0, 2.0]];
        assert_eq!(variance_change(data.view(), data.view(), &config()).unwrap(), 0.0);
        assert!(correlation_change(data.view(), data.view(), &config()).unwrap() < 1e-12);
    }

    #[test]
    fn test_variance_growth_saturates() {
        let baseline = array![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0], [1.0, 1.0]];
        let window = &baseline * 10.0;
        // Ratio 100 on both channels, clipped to the cap
        let score = variance_change(window.view(), baseline.view(), &config()).unwrap();
        assert!((score - 1.0).abs() < 1e-9);

        let shrunk = &baseline * 0.1;
        assert_eq!(variance_change(shrunk.view(), baseline.view(), &config()).unwrap(), 0.0);
    }

    #[test]
    fn test_variance_ratio_is_averaged() {
        let baseline = array![[0.0, 0.0], [2.0, 2.0]];
        // variance 1 in the baseline; window variances 3 and 1
        let window = array![[0.0, 0.0], [2.0 * 3f64.sqrt(), 2.0]];
        let score = variance_change(window.view(), baseline.view(), &config()).unwrap();
        // ((3 - 1) + (1 - 1)) / 2 / 4
        assert!((score - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_correlation_flip_is_large() {
        let baseline = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];
        let window = array![[1.0, 4.0], [2.0, 3.0], [3.0, 2.0], [4.0, 1.0]];
        // Off-diagonals move from +1 to -1: frobenius = sqrt(8), normalized by 4
        let score = correlation_change(window.view(), baseline.view(), &config()).unwrap();
        assert!((score - 8f64.sqrt() / 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_channel_mismatch() {
        let window = Array2::<f64>::zeros((4, 2));
        let baseline = Array2::<f64>::zeros((4, 3));
        assert!(matches!(
            Indicators::compute(window.view(), baseline.view()),
            Err(IndicatorError::ChannelMismatch { window: 2, baseline: 3 })
        ));
    }

    #[test]
    fn test_compute_uses_baseline_mean_forecast() {
        let baseline = array![[0.0, 1.0], [2.0, 3.0], [0.0, 1.0], [2.0, 3.0]];
        let window = array![[1.0, 1.0], [3.0, 3.0], [1.0, 1.0], [3.0, 3.0]];
        let indicators = Indicators::compute(window.view(), baseline.view()).unwrap();
        // Forecast is 1.0; actual 1,3,1,3 gives MAE 1 over range 2
        assert!((indicators.forecast_error - 0.5).abs() < 1e-5);
        assert_eq!(indicators.variance_change, 0.0);
        assert!(indicators.correlation_change < 1e-12);
        assert_eq!(indicators.as_array()[0], indicators.forecast_error);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let baseline = array![[0.0, 0.0], [1.0, 1.0], [0.0, 2.0], [1.0, 3.0]];
        let window = &baseline * 3.0;

        for cap in [1.0, 0.5, f64::INFINITY] {
            let config = IndicatorConfig {
                variance_ratio_cap: cap,
                ..Default::default()
            };
            assert!(matches!(
                Indicators::compute_with(window.view(), baseline.view(), &config),
                Err(IndicatorError::InvalidConfig { field: "variance_ratio_cap", .. })
            ));
            assert!(variance_change(window.view(), baseline.view(), &config).is_err());
        }

        for eps in [0.0, -1e-6, f64::NAN] {
            let config = IndicatorConfig {
                eps,
                ..Default::default()
            };
            assert!(matches!(
                correlation_change(window.view(), baseline.view(), &config),
                Err(IndicatorError::InvalidConfig { field: "eps", .. })
            ));
            let column = baseline.column(0);
            assert!(forecast_error(column, column, &config).is_err());
        }
        assert!(IndicatorConfig::default().validate().is_ok());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn matrix(rows: usize) -> impl Strategy<Value = Array2<f64>> {
            prop::collection::vec(-100.0f64..100.0, rows * 3)
                .prop_map(move |v| Array2::from_shape_vec((rows, 3), v).unwrap())
        }

        proptest! {
            #[test]
            fn indicators_are_unit_bounded(window in matrix(12), baseline in matrix(20)) {
                let indicators = Indicators::compute(window.view(), baseline.view()).unwrap();
                for value in indicators.as_array() {
                    prop_assert!((0.0..=1.0).contains(&value));
                }
            }
        }
    }
}
