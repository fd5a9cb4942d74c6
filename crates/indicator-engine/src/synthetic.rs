//! Seeded Synthetic Scenario

use crate::IndicatorError;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shape of the generated scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Rows in the baseline
    pub baseline_len: usize,
    /// Rows in each evaluation window
    pub window_len: usize,
    /// Mean of the anomalous window, one entry per channel
    pub anomaly_mean: Vec<f64>,
    /// Covariance of the anomalous window
    pub anomaly_covariance: Vec<Vec<f64>>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            baseline_len: 500,
            window_len: 100,
            anomaly_mean: vec![4.0, -4.0, 3.0],
            anomaly_covariance: vec![
                vec![4.0, 3.0, 2.0],
                vec![3.0, 5.0, 2.5],
                vec![2.0, 2.5, 3.5],
            ],
        }
    }
}

/// Baseline plus one normal and one shifted, correlated window
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticScenario {
    pub baseline: Array2<f64>,
    pub window_normal: Array2<f64>,
    pub window_anomalous: Array2<f64>,
}

impl SyntheticScenario {
    /// Default scenario for `seed`
    pub fn generate(seed: u64) -> Result<Self, IndicatorError> {
        Self::generate_with(seed, &ScenarioConfig::default())
    }

    /// Scenario for `seed`; the same seed and config always give the same data
    pub fn generate_with(seed: u64, config: &ScenarioConfig) -> Result<Self, IndicatorError> {
        let channels = config.anomaly_mean.len();
        if channels == 0 || config.baseline_len == 0 || config.window_len == 0 {
            return Err(IndicatorError::EmptyWindow);
        }

        let covariance = to_matrix(&config.anomaly_covariance)?;
        if covariance.nrows() != channels {
            return Err(IndicatorError::ChannelMismatch {
                window: covariance.nrows(),
                baseline: channels,
            });
        }
        let factor = cholesky(&covariance)?;
        let mean = Array1::from(config.anomaly_mean.clone());

        let mut rng = StdRng::seed_from_u64(seed);
        let baseline = standard_normal(&mut rng, config.baseline_len, channels);
        let window_normal = standard_normal(&mut rng, config.window_len, channels);
        let window_anomalous =
            standard_normal(&mut rng, config.window_len, channels).dot(&factor.t()) + &mean;

        debug!(
            "Generated scenario seed={} baseline={}x{} windows={}x{}",
            seed, config.baseline_len, channels, config.window_len, channels
        );

        Ok(Self {
            baseline,
            window_normal,
            window_anomalous,
        })
    }
}

fn standard_normal(rng: &mut StdRng, rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |_| rng.sample::<f64, _>(StandardNormal))
}

fn to_matrix(rows: &[Vec<f64>]) -> Result<Array2<f64>, IndicatorError> {
    let n = rows.len();
    if let Some(row) = rows.iter().find(|row| row.len() != n) {
        return Err(IndicatorError::NotSquare {
            rows: n,
            cols: row.len(),
        });
    }
    Ok(Array2::from_shape_fn((n, n), |(i, j)| rows[i][j]))
}

/// Lower-triangular `L` with `L·Lᵀ = matrix`
pub(crate) fn cholesky(matrix: &Array2<f64>) -> Result<Array2<f64>, IndicatorError> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(IndicatorError::NotSquare { rows, cols });
    }

    let mut lower = Array2::<f64>::zeros((rows, rows));
    for i in 0..rows {
        for j in 0..=i {
            let dot: f64 = (0..j).map(|k| lower[[i, k]] * lower[[j, k]]).sum();
            if i == j {
                let pivot = matrix[[i, i]] - dot;
                if pivot.is_nan() || pivot <= 0.0 {
                    return Err(IndicatorError::NotPositiveDefinite);
                }
                lower[[i, j]] = pivot.sqrt();
            } else {
                lower[[i, j]] = (matrix[[i, j]] - dot) / lower[[j, j]];
            }
        }
    }
    Ok(lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Axis};

    #[test]
    fn test_same_seed_same_data() {
        let a = SyntheticScenario::generate(42).unwrap();
        let b = SyntheticScenario::generate(42).unwrap();
        assert_eq!(a, b);

        let c = SyntheticScenario::generate(43).unwrap();
        assert_ne!(a.baseline, c.baseline);
    }

    #[test]
    fn test_default_shapes() {
        let scenario = SyntheticScenario::generate(0).unwrap();
        assert_eq!(scenario.baseline.dim(), (500, 3));
        assert_eq!(scenario.window_normal.dim(), (100, 3));
        assert_eq!(scenario.window_anomalous.dim(), (100, 3));
    }

    #[test]
    fn test_anomalous_window_is_shifted() {
        let scenario = SyntheticScenario::generate(7).unwrap();
        let mean = scenario.window_anomalous.mean_axis(Axis(0)).unwrap();
        // Sampling error of a 100-row mean is well under 1.5
        assert!((mean[0] - 4.0).abs() < 1.5);
        assert!((mean[1] + 4.0).abs() < 1.5);
        assert!((mean[2] - 3.0).abs() < 1.5);
    }

    #[test]
    fn test_cholesky_reconstructs_matrix() {
        let matrix = array![[4.0, 3.0, 2.0], [3.0, 5.0, 2.5], [2.0, 2.5, 3.5]];
        let lower = cholesky(&matrix).unwrap();
        assert_eq!(lower[[0, 1]], 0.0);
        assert_eq!(lower[[0, 0]], 2.0);

        let rebuilt = lower.dot(&lower.t());
        for (x, y) in rebuilt.iter().zip(matrix.iter()) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cholesky_rejects_indefinite() {
        let matrix = array![[1.0, 2.0], [2.0, 1.0]];
        assert_eq!(cholesky(&matrix).unwrap_err(), IndicatorError::NotPositiveDefinite);

        let rect = Array2::<f64>::zeros((2, 3));
        assert!(matches!(cholesky(&rect), Err(IndicatorError::NotSquare { .. })));
    }

    #[test]
    fn test_ragged_covariance_rejected() {
        let config = ScenarioConfig {
            anomaly_covariance: vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0]],
            ..Default::default()
        };
        assert!(matches!(
            SyntheticScenario::generate_with(1, &config),
            Err(IndicatorError::NotSquare { .. })
        ));
    }
}
