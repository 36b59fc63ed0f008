//! Statistics Calculator Module
//! Descriptive statistics and Pearson correlation over catalog columns.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Summary of one numeric column (count, mean, std, min, quartiles, max).
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for DescriptiveStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Pairwise correlation of named columns. `values[i][j]` pairs `labels[i]` with `labels[j]`.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Coefficient between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.values[i][j])
    }

    /// Symmetric, treating NaN as equal to NaN.
    pub fn is_symmetric(&self) -> bool {
        let n = self.labels.len();
        (0..n).all(|i| {
            (0..n).all(|j| {
                let (a, b) = (self.values[i][j], self.values[j][i]);
                (a.is_nan() && b.is_nan()) || a == b
            })
        })
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> DescriptiveStats {
        let n = values.len();
        if n == 0 {
            return DescriptiveStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        DescriptiveStats {
            count: n,
            mean,
            std,
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pearson correlation over rows where both values are present.
    ///
    /// NaN when fewer than two complete rows remain or either side is constant.
    pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(y)
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .unzip();

        if xs.len() < 2 {
            return f64::NAN;
        }

        let std_x = xs.iter().std_dev();
        let std_y = ys.iter().std_dev();
        if std_x == 0.0 || std_y == 0.0 {
            return f64::NAN;
        }

        let r = xs.iter().covariance(ys.iter()) / (std_x * std_y);
        r.clamp(-1.0, 1.0)
    }

    /// Correlation matrix with a unit diagonal (NaN for constant columns).
    pub fn correlation_matrix(columns: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
        let n = columns.len();
        let mut values = vec![vec![f64::NAN; n]; n];

        for i in 0..n {
            let self_r = Self::pearson(&columns[i].1, &columns[i].1);
            values[i][i] = if self_r.is_nan() { f64::NAN } else { 1.0 };

            for j in (i + 1)..n {
                let r = Self::pearson(&columns[i].1, &columns[j].1);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        CorrelationMatrix {
            labels: columns.iter().map(|(name, _)| name.clone()).collect(),
            values,
        }
    }
}
