use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Two-sided 95% quantile of the standard normal distribution.
pub const Z_95: f64 = 1.96;

pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> f64 {
        ArrayView1::from(samples).mean().unwrap_or(0.0)
    }

    /// Sample standard deviation with Bessel's correction; zero below two samples.
    /// Two passes: mean first, then squared deviations summed in entry order.
    pub fn sample_std(samples: &[f64]) -> f64 {
        if samples.len() < 2 {
            return 0.0;
        }
        let view = ArrayView1::from(samples);
        let mean = Self::mean(samples);
        let squares: f64 = view.iter().map(|&v| (v - mean).powi(2)).sum();
        (squares / (samples.len() as f64 - 1.0)).sqrt()
    }

    /// Running mean for every prefix length `1..=n`.
    pub fn cumulative_means(samples: &[f64]) -> Vec<f64> {
        (1..=samples.len())
            .map(|len| Self::mean(&samples[..len]))
            .collect()
    }
}

/// Mean and normal-approximation 95% confidence interval over a sample set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyEstimate {
    pub mean: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub relative_uncertainty_pct: f64,
    pub standard_error: f64,
}

impl UncertaintyEstimate {
    pub fn interval_label(&self) -> String {
        format!("{:.4} ~ {:.4}", self.lower_bound, self.upper_bound)
    }
}

pub struct UncertaintyEstimator;

impl UncertaintyEstimator {
    /// Recomputes the estimate from scratch. Zero or one sample degenerates to
    /// fixed values instead of failing.
    pub fn estimate(values: &[f64]) -> UncertaintyEstimate {
        match values {
            [] => UncertaintyEstimate::default(),
            [single] => UncertaintyEstimate {
                mean: *single,
                lower_bound: *single,
                upper_bound: *single,
                relative_uncertainty_pct: 0.0,
                standard_error: 0.0,
            },
            _ => {
                let n = values.len() as f64;
                let mean = StatsHelper::mean(values);
                let standard_error = StatsHelper::sample_std(values) / n.sqrt();
                let half_width = Z_95 * standard_error;
                let lower_bound = mean - half_width;
                let upper_bound = mean + half_width;
                let relative_uncertainty_pct = if mean != 0.0 {
                    (upper_bound - lower_bound) / mean * 100.0
                } else {
                    0.0
                };
                UncertaintyEstimate {
                    mean,
                    lower_bound,
                    upper_bound,
                    relative_uncertainty_pct,
                    standard_error,
                }
            }
        }
    }
}
