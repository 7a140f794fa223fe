//! Chi-squared confidence interval on MTBF for exponential life data.
//!
//! # Algorithm
//!
//! Given total operating time T, r failures, and confidence level c (%):
//!
//! ```text
//! alpha = 1 - c/100
//! MTBF_hat = T / r
//! lower = 2T / χ²(1 - alpha/2, df_lower)
//! upper = 2T / χ²(alpha/2, df_upper)
//! ```
//!
//! A failure-terminated test uses df = 2r for both bounds. A time-terminated
//! test uses df = 2r + 2 for the lower bound and df = 2r for the upper.
//! Either choice assumes a constant failure rate.
//!
//! # Reference
//!
//! Epstein, B. & Sobel, M. (1953). "Life testing", *JASA* 48(263), pp. 486-502.
//! MIL-HDBK-338B, Section 8.3.

use crate::error::{ReliabilityError, Result};
use crate::special::{chi_squared_quantile, ChiSquaredMethod};

/// How the life test that produced the data was stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TestTermination {
    /// Test stopped at the r-th failure (Type II censoring).
    #[default]
    FailureTerminated,
    /// Test stopped at a fixed time (Type I censoring).
    TimeTerminated,
}

/// Options for [`mtbf_confidence_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MtbfOptions {
    /// Test termination assumption; determines the lower-bound df.
    pub termination: TestTermination,
    /// Chi-squared inversion method.
    pub method: ChiSquaredMethod,
}

impl MtbfOptions {
    /// Sets the test termination assumption.
    pub fn with_termination(mut self, termination: TestTermination) -> Self {
        self.termination = termination;
        self
    }

    /// Sets the chi-squared inversion method.
    pub fn with_method(mut self, method: ChiSquaredMethod) -> Self {
        self.method = method;
        self
    }
}

/// Two-sided confidence interval on MTBF.
///
/// Invariant: `lower <= mean <= upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfidenceInterval {
    /// Point estimate T / r.
    pub mean: f64,
    /// Lower confidence bound.
    pub lower: f64,
    /// Upper confidence bound.
    pub upper: f64,
    /// Degrees of freedom 2r of the upper bound (and of the lower bound for
    /// failure-terminated tests).
    pub degrees_of_freedom: u64,
    /// Confidence level in percent.
    pub confidence: f64,
}

impl ConfidenceInterval {
    /// Width of the interval.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Two-sided MTBF confidence interval for a failure-terminated test using
/// the Wilson–Hilferty chi-squared approximation.
///
/// See [`mtbf_confidence_with`] for errors and accuracy.
///
/// # Examples
///
/// ```
/// use u_reliability::mtbf::mtbf_confidence;
///
/// let ci = mtbf_confidence(10_000.0, 5, 90.0).unwrap();
/// assert_eq!(ci.mean, 2000.0);
/// assert_eq!(ci.degrees_of_freedom, 10);
/// assert!(ci.lower < ci.mean && ci.mean < ci.upper);
/// ```
pub fn mtbf_confidence(
    total_time: f64,
    failures: u64,
    confidence: f64,
) -> Result<ConfidenceInterval> {
    mtbf_confidence_with(total_time, failures, confidence, MtbfOptions::default())
}

/// Two-sided MTBF confidence interval with explicit options.
///
/// # Accuracy
///
/// With [`ChiSquaredMethod::WilsonHilferty`] the bounds carry the
/// approximation error of [`inverse_chi_squared`](crate::special::inverse_chi_squared),
/// which grows for small df: with r = 1 (df = 2) the upper bound is
/// noticeably off, and beyond roughly 99.2% confidence the lower-tail
/// quantile is not positive and an error is returned. Use
/// [`ChiSquaredMethod::Exact`] for few failures.
///
/// At low confidence levels the chi-squared bounds can fall on the same
/// side of T / r (the chi-squared median is below its mean); the bounds are
/// then clamped to the point estimate to keep `lower <= mean <= upper`.
///
/// # Errors
///
/// - [`ReliabilityError::InvalidParameter`] if `total_time` is not positive
///   and finite, `failures` is zero (a two-sided interval is undefined with
///   no failures), or `confidence` is outside (0, 100).
/// - [`ReliabilityError::Degenerate`] if a chi-squared quantile is not positive.
pub fn mtbf_confidence_with(
    total_time: f64,
    failures: u64,
    confidence: f64,
    options: MtbfOptions,
) -> Result<ConfidenceInterval> {
    if !total_time.is_finite() || total_time <= 0.0 {
        return Err(ReliabilityError::invalid(
            "total_time",
            "must be positive and finite",
        ));
    }
    if failures == 0 {
        return Err(ReliabilityError::invalid(
            "failures",
            "zero failures is not supported by the two-sided chi-squared method",
        ));
    }
    if !(confidence > 0.0 && confidence < 100.0) {
        return Err(ReliabilityError::invalid("confidence", "must be in (0, 100)"));
    }

    let alpha = 1.0 - confidence / 100.0;
    let df = 2 * failures;
    let df_lower = match options.termination {
        TestTermination::FailureTerminated => df,
        TestTermination::TimeTerminated => df + 2,
    };

    let q_lower = chi_squared_quantile(1.0 - alpha / 2.0, df_lower as f64, options.method)?;
    let q_upper = chi_squared_quantile(alpha / 2.0, df as f64, options.method)?;

    let mean = total_time / failures as f64;
    let raw_lower = 2.0 * total_time / q_lower;
    let raw_upper = 2.0 * total_time / q_upper;
    if !raw_lower.is_finite() || !raw_upper.is_finite() {
        return Err(ReliabilityError::degenerate("confidence bound is not finite"));
    }
    if raw_lower > mean || raw_upper < mean {
        tracing::trace!(raw_lower, raw_upper, mean, "bounds clamped to point estimate");
    }
    let lower = raw_lower.min(mean);
    let upper = raw_upper.max(mean);

    tracing::debug!(
        total_time,
        failures,
        confidence,
        mean,
        lower,
        upper,
        "mtbf confidence interval"
    );

    Ok(ConfidenceInterval {
        mean,
        lower,
        upper,
        degrees_of_freedom: df,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_fixture() {
        // df = 10, 90% two-sided: χ²(0.95) = 18.307, χ²(0.05) = 3.940
        let ci = mtbf_confidence(10_000.0, 5, 90.0).expect("valid input");
        assert_eq!(ci.mean, 2000.0);
        assert_eq!(ci.degrees_of_freedom, 10);

        let lower = 20_000.0 / 18.307;
        let upper = 20_000.0 / 3.940;
        assert!((ci.lower - lower).abs() / lower < 0.05, "lower = {}", ci.lower);
        assert!((ci.upper - upper).abs() / upper < 0.05, "upper = {}", ci.upper);
    }

    #[test]
    fn test_exact_method_fixture() {
        let options = MtbfOptions::default().with_method(ChiSquaredMethod::Exact);
        let ci = mtbf_confidence_with(10_000.0, 5, 90.0, options).expect("valid input");
        assert!((ci.lower - 1092.5).abs() < 1.0, "lower = {}", ci.lower);
        assert!((ci.upper - 5076.1).abs() < 2.0, "upper = {}", ci.upper);
    }

    #[test]
    fn test_zero_failures_rejected() {
        let err = mtbf_confidence(1000.0, 0, 90.0).expect_err("r=0 must fail");
        assert!(matches!(
            err,
            ReliabilityError::InvalidParameter {
                name: "failures",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(mtbf_confidence(0.0, 3, 90.0).is_err());
        assert!(mtbf_confidence(-10.0, 3, 90.0).is_err());
        assert!(mtbf_confidence(f64::INFINITY, 3, 90.0).is_err());
        assert!(mtbf_confidence(1000.0, 3, 0.0).is_err());
        assert!(mtbf_confidence(1000.0, 3, 100.0).is_err());
        assert!(mtbf_confidence(1000.0, 3, f64::NAN).is_err());
    }

    #[test]
    fn test_wilson_hilferty_limit_at_single_failure() {
        // χ²(0.0005, 2) via Wilson–Hilferty is negative
        let err = mtbf_confidence(1000.0, 1, 99.9).expect_err("approximation breaks down");
        assert!(matches!(err, ReliabilityError::Degenerate(_)));

        let options = MtbfOptions::default().with_method(ChiSquaredMethod::Exact);
        let ci = mtbf_confidence_with(1000.0, 1, 99.9, options).expect("exact method works");
        assert!(ci.lower < ci.mean && ci.mean < ci.upper);
    }

    #[test]
    fn test_time_terminated_lowers_lower_bound() {
        let failure = mtbf_confidence(5000.0, 4, 95.0).expect("valid input");
        let options = MtbfOptions::default().with_termination(TestTermination::TimeTerminated);
        let time = mtbf_confidence_with(5000.0, 4, 95.0, options).expect("valid input");

        assert!(time.lower < failure.lower);
        assert_eq!(time.upper, failure.upper);
        assert_eq!(time.mean, failure.mean);
    }

    #[test]
    fn test_low_confidence_clamped() {
        let ci = mtbf_confidence(1000.0, 1, 5.0).expect("valid input");
        assert!(ci.lower <= ci.mean && ci.mean <= ci.upper, "{ci:?}");
    }

    #[test]
    fn test_higher_confidence_widens() {
        let c90 = mtbf_confidence(8000.0, 6, 90.0).expect("valid input");
        let c95 = mtbf_confidence(8000.0, 6, 95.0).expect("valid input");
        assert!(c95.lower < c90.lower);
        assert!(c95.upper > c90.upper);
    }
}
