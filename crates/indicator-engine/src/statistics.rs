//! Per-channel Window Statistics

use crate::IndicatorError;
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Column-wise moments of a window (rows = samples, columns = channels)
#[derive(Debug, Clone, PartialEq)]
pub struct WindowStatistics {
    /// Mean of each channel
    pub mean: Array1<f64>,
    /// Population variance of each channel
    pub variance: Array1<f64>,
    /// Pearson correlation between channels
    pub correlation: Array2<f64>,
    /// Number of samples
    pub samples: usize,
}

impl WindowStatistics {
    /// Compute moments and the correlation matrix of a window
    pub fn compute(window: ArrayView2<'_, f64>) -> Result<Self, IndicatorError> {
        let (samples, channels) = window.dim();
        if samples == 0 || channels == 0 {
            return Err(IndicatorError::EmptyWindow);
        }
        if samples < 2 {
            return Err(IndicatorError::TooFewSamples {
                required: 2,
                actual: samples,
            });
        }

        let mean = window
            .mean_axis(Axis(0))
            .ok_or(IndicatorError::EmptyWindow)?;
        let centered = &window - &mean;
        let covariance = centered.t().dot(&centered) / samples as f64;
        let variance = covariance.diag().to_owned();

        // Constant channels have no defined correlation; treat them as uncorrelated
        let correlation = Array2::from_shape_fn((channels, channels), |(i, j)| {
            if i == j {
                1.0
            } else {
                let scale = (variance[i] * variance[j]).sqrt();
                if scale > 0.0 {
                    covariance[[i, j]] / scale
                } else {
                    0.0
                }
            }
        });

        Ok(Self {
            mean,
            variance,
            correlation,
            samples,
        })
    }

    pub fn channels(&self) -> usize {
        self.mean.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mean_and_variance() {
        let window = array![[1.0, 10.0], [2.0, 10.0], [3.0, 10.0], [4.0, 10.0], [5.0, 10.0]];
        let stats = WindowStatistics::compute(window.view()).unwrap();
        assert!((stats.mean[0] - 3.0).abs() < 1e-12);
        assert!((stats.variance[0] - 2.0).abs() < 1e-12);
        assert_eq!(stats.variance[1], 0.0);
        assert_eq!(stats.samples, 5);
        assert_eq!(stats.channels(), 2);
    }

    #[test]
    fn test_correlation_signs() {
        let window = array![[1.0, 2.0, 5.0], [2.0, 4.0, 4.0], [3.0, 6.0, 3.0], [4.0, 8.0, 2.0]];
        let stats = WindowStatistics::compute(window.view()).unwrap();
        assert!((stats.correlation[[0, 1]] - 1.0).abs() < 1e-12);
        assert!((stats.correlation[[0, 2]] + 1.0).abs() < 1e-12);
        assert_eq!(stats.correlation[[2, 2]], 1.0);
    }

    #[test]
    fn test_constant_channel_is_uncorrelated() {
        let window = array![[1.0, 7.0], [2.0, 7.0], [3.0, 7.0]];
        let stats = WindowStatistics::compute(window.view()).unwrap();
        assert_eq!(stats.correlation[[0, 1]], 0.0);
        assert_eq!(stats.correlation[[1, 1]], 1.0);
    }

    #[test]
    fn test_rejects_small_windows() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert_eq!(
            WindowStatistics::compute(empty.view()).unwrap_err(),
            IndicatorError::EmptyWindow
        );

        let single = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            WindowStatistics::compute(single.view()),
            Err(IndicatorError::TooFewSamples { actual: 1, .. })
        ));
    }
}
