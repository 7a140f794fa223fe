//! Median Rank Regression (MRR) for Weibull parameter estimation.
//!
//! Fits Weibull parameters using least-squares regression on the
//! linearized Weibull probability plot.

use super::reliability::{FailureMode, ReliabilityAnalysis};
use crate::error::{ReliabilityError, Result};

/// Fraction failed at which the B10 life is read.
const B10_FRACTION: f64 = 0.10;

/// Probability-plot coordinates of one ranked failure time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegressionPoint {
    /// 1-based rank after sorting ascending.
    pub rank: usize,
    /// Failure time.
    pub time: f64,
    /// Bernard's median rank (i - 0.3) / (n + 0.4).
    pub median_rank: f64,
    /// ln(t).
    pub x: f64,
    /// ln(-ln(1 - median_rank)).
    pub y: f64,
}

/// Endpoint of the fitted line on the probability plot.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitLinePoint {
    /// Time at which the fitted CDF is evaluated.
    pub time: f64,
    /// Fitted CDF F(t).
    pub cdf: f64,
    /// ln(t).
    pub x: f64,
    /// ln(-ln(1 - F(t))).
    pub y: f64,
}

/// Result of Weibull MRR fitting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeibullFit {
    /// Shape parameter (beta).
    pub beta: f64,
    /// Scale parameter (eta).
    pub eta: f64,
    /// Squared Pearson correlation of the probability plot, in [0, 1].
    pub r_squared: f64,
    /// B10 life: time by which 10% of the population has failed.
    pub b10: f64,
    /// Mean time to failure, eta * Gamma(1 + 1/beta).
    pub mttf: f64,
    /// Ranked, linearized failure times used in the regression.
    pub regression_points: Vec<RegressionPoint>,
    /// Fitted line endpoints spanning [0.5 * min(t), 1.5 * max(t)].
    pub fit_line: [FitLinePoint; 2],
}

impl WeibullFit {
    /// Number of failure times used in the fit.
    pub fn sample_size(&self) -> usize {
        self.regression_points.len()
    }

    /// Failure-mode classification implied by the shape parameter.
    pub fn failure_mode(&self) -> FailureMode {
        FailureMode::from_shape(self.beta)
    }

    /// Reliability functions of the fitted distribution.
    pub fn analysis(&self) -> ReliabilityAnalysis {
        ReliabilityAnalysis::from_fit(self)
    }
}

/// Fit a Weibull distribution using Median Rank Regression.
///
/// The linearized Weibull CDF is:
///
/// ```text
/// ln(-ln(1 - F(t))) = beta * ln(t) - beta * ln(eta)
/// ```
///
/// Plotting y = ln(-ln(1 - F_i)) vs x = ln(t_i) gives a line with
/// slope beta and intercept -beta * ln(eta).
///
/// Median ranks are computed using Bernard's approximation:
///
/// ```text
/// F_i = (i - 0.3) / (n + 0.4)
/// ```
///
/// # Algorithm
/// 1. Drop non-positive and non-finite times, sort the rest ascending
/// 2. Compute median ranks F_i for each rank
/// 3. Transform: x_i = ln(t_i), y_i = ln(-ln(1 - F_i))
/// 4. Fit line y = a + b*x using ordinary least squares
/// 5. beta = b, eta = exp(-a/b)
/// 6. R² = squared Pearson correlation of (x, y)
/// 7. B10 = eta * (-ln 0.9)^(1/beta)
///
/// # Arguments
/// * `failure_times` - Failure times in any order. Non-positive or
///   non-finite entries are skipped.
///
/// # Errors
/// - [`ReliabilityError::InsufficientData`] if fewer than 2 usable times remain.
/// - [`ReliabilityError::Degenerate`] if all times are identical or the fitted
///   slope is not positive.
///
/// # Examples
///
/// ```
/// use u_reliability::weibull::{weibull_fit, FailureMode};
/// let fit = weibull_fit(&[120.0, 245.0, 310.0, 550.0, 900.0]).unwrap();
/// assert!(fit.beta > 1.0);
/// assert_eq!(fit.failure_mode(), FailureMode::WearOut);
/// assert!(fit.r_squared > 0.9 && fit.r_squared <= 1.0);
/// ```
///
/// # Reference
/// Abernethy (2006), *The New Weibull Handbook*, 5th ed.
pub fn weibull_fit(failure_times: &[f64]) -> Result<WeibullFit> {
    let mut sorted: Vec<f64> = failure_times
        .iter()
        .copied()
        .filter(|t| t.is_finite() && *t > 0.0)
        .collect();

    let n = sorted.len();
    if n < 2 {
        tracing::trace!(usable = n, supplied = failure_times.len(), "too few failure times");
        return Err(ReliabilityError::InsufficientData {
            required: 2,
            actual: n,
        });
    }

    sorted.sort_unstable_by(|a, b| a.total_cmp(b));

    let n_f = n as f64;

    let regression_points: Vec<RegressionPoint> = sorted
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let rank = i + 1;
            let median_rank = (rank as f64 - 0.3) / (n_f + 0.4);
            RegressionPoint {
                rank,
                time: t,
                median_rank,
                x: t.ln(),
                y: (-(1.0 - median_rank).ln()).ln(),
            }
        })
        .collect();

    // Ordinary least squares: y = a + b*x
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for p in &regression_points {
        sum_x += p.x;
        sum_y += p.y;
        sum_xy += p.x * p.y;
        sum_x2 += p.x * p.x;
        sum_y2 += p.y * p.y;
    }

    let sxx = n_f * sum_x2 - sum_x * sum_x;
    let syy = n_f * sum_y2 - sum_y * sum_y;
    let sxy = n_f * sum_xy - sum_x * sum_y;

    if sxx <= 1e-12 * n_f * sum_x2 {
        return Err(ReliabilityError::degenerate("all failure times are identical"));
    }

    let beta = sxy / sxx;
    if !beta.is_finite() || beta <= 0.0 {
        return Err(ReliabilityError::degenerate("fitted shape is not positive"));
    }
    let intercept = (sum_y - beta * sum_x) / n_f;

    let eta = (-intercept / beta).exp();
    if !eta.is_finite() || eta <= 0.0 {
        return Err(ReliabilityError::degenerate("fitted scale is not positive"));
    }

    let r = sxy / (sxx * syy).sqrt();
    let r_squared = (r * r).clamp(0.0, 1.0);

    let analysis = ReliabilityAnalysis::new(beta, eta)?;
    let b10 = analysis.b_life(B10_FRACTION)?;
    let mttf = analysis.mttf();

    let line_point = |time: f64| FitLinePoint {
        time,
        cdf: analysis.cdf(time),
        x: time.ln(),
        y: beta * (time / eta).ln(),
    };
    let fit_line = [line_point(0.5 * sorted[0]), line_point(1.5 * sorted[n - 1])];

    tracing::debug!(n, beta, eta, r_squared, b10, "weibull rank regression fit");

    Ok(WeibullFit {
        beta,
        eta,
        r_squared,
        b10,
        mttf,
        regression_points,
        fit_line,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ranks_increasing_and_median_ranks_in_unit_interval(
            data in proptest::collection::vec(0.1_f64..1e4, 2..=60)
        ) {
            if let Ok(fit) = weibull_fit(&data) {
                for (i, p) in fit.regression_points.iter().enumerate() {
                    prop_assert_eq!(p.rank, i + 1);
                    prop_assert!(p.median_rank > 0.0 && p.median_rank < 1.0);
                }
                for w in fit.regression_points.windows(2) {
                    prop_assert!(w[1].rank > w[0].rank);
                    prop_assert!(w[1].median_rank > w[0].median_rank);
                    prop_assert!(w[1].time >= w[0].time);
                }
            }
        }

        #[test]
        fn fit_outputs_valid(
            data in proptest::collection::vec(0.1_f64..1e4, 2..=60)
        ) {
            if let Ok(fit) = weibull_fit(&data) {
                prop_assert!(fit.beta > 0.0 && fit.beta.is_finite());
                prop_assert!(fit.eta > 0.0 && fit.eta.is_finite());
                prop_assert!((0.0..=1.0).contains(&fit.r_squared), "R^2 = {}", fit.r_squared);
                prop_assert!(fit.b10 >= 0.0);
            }
        }

        #[test]
        fn fit_order_independent(
            mut data in proptest::collection::vec(0.1_f64..1e4, 2..=30)
        ) {
            let forward = weibull_fit(&data);
            data.reverse();
            let backward = weibull_fit(&data);
            prop_assert_eq!(forward, backward);
        }
    }
}
