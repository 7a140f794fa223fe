//! Reliability analysis from fitted Weibull parameters.
//!
//! Provides reliability function, CDF, density, hazard rate, MTTF, B-life,
//! and failure-mode classification.

use u_numflow::special::ln_gamma;

use super::mrr::WeibullFit;
use crate::error::{ReliabilityError, Result};

/// Half-width of the band around beta = 1 classified as random failures.
const RANDOM_BAND: f64 = 0.05;

/// Failure regime implied by the Weibull shape parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailureMode {
    /// beta < 0.95: decreasing hazard (early-life defects).
    InfantMortality,
    /// 0.95 <= beta <= 1.05: approximately constant hazard.
    Random,
    /// beta > 1.05: increasing hazard (wear-out).
    WearOut,
}

impl FailureMode {
    /// Classifies a shape parameter.
    pub fn from_shape(beta: f64) -> Self {
        if beta < 1.0 - RANDOM_BAND {
            Self::InfantMortality
        } else if beta <= 1.0 + RANDOM_BAND {
            Self::Random
        } else {
            Self::WearOut
        }
    }
}

/// Reliability functions of a two-parameter Weibull distribution.
///
/// # Mathematical Background
///
/// Given a Weibull distribution with shape beta > 0 and scale eta > 0:
/// - Reliability: R(t) = exp(-(t/eta)^beta)
/// - Density: f(t) = (beta/eta) * (t/eta)^(beta-1) * R(t)
/// - Hazard rate: lambda(t) = (beta/eta) * (t/eta)^(beta-1)
/// - MTTF: eta * Gamma(1 + 1/beta)
///
/// # Examples
///
/// ```
/// use u_reliability::weibull::ReliabilityAnalysis;
/// let ra = ReliabilityAnalysis::new(2.0, 100.0).unwrap();
/// assert!((ra.reliability(0.0) - 1.0).abs() < 1e-10);
/// assert!(ra.hazard_rate(50.0) > 0.0);
/// assert!(ra.mttf() > 0.0);
/// let b10 = ra.b_life(0.10).unwrap();
/// assert!(b10 > 0.0 && b10 < 100.0);
/// ```
///
/// # Reference
/// Meeker & Escobar (1998), *Statistical Methods for Reliability Data*, Wiley.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReliabilityAnalysis {
    /// Shape parameter (beta).
    shape: f64,
    /// Scale parameter (eta).
    scale: f64,
}

impl ReliabilityAnalysis {
    /// Creates a new reliability analysis from Weibull parameters.
    ///
    /// # Errors
    /// [`ReliabilityError::InvalidParameter`] if either parameter is
    /// non-positive or non-finite.
    ///
    /// ```
    /// use u_reliability::weibull::ReliabilityAnalysis;
    /// assert!(ReliabilityAnalysis::new(2.0, 100.0).is_ok());
    /// assert!(ReliabilityAnalysis::new(-1.0, 100.0).is_err());
    /// assert!(ReliabilityAnalysis::new(2.0, 0.0).is_err());
    /// ```
    pub fn new(shape: f64, scale: f64) -> Result<Self> {
        if !shape.is_finite() || shape <= 0.0 {
            return Err(ReliabilityError::invalid("beta", "must be positive and finite"));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ReliabilityError::invalid("eta", "must be positive and finite"));
        }
        Ok(Self { shape, scale })
    }

    /// Creates a reliability analysis from a rank-regression fit.
    ///
    /// Fits always carry positive finite parameters.
    pub fn from_fit(fit: &WeibullFit) -> Self {
        Self {
            shape: fit.beta,
            scale: fit.eta,
        }
    }

    /// Returns the shape parameter (beta).
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Returns the scale parameter (eta).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Failure regime implied by the shape parameter.
    pub fn failure_mode(&self) -> FailureMode {
        FailureMode::from_shape(self.shape)
    }

    /// Reliability (survival) function at time t.
    ///
    /// ```text
    /// R(t) = exp(-(t/eta)^beta)
    /// ```
    ///
    /// For t <= 0, returns 1.0 (no failure before time 0).
    ///
    /// ```
    /// use u_reliability::weibull::ReliabilityAnalysis;
    /// let ra = ReliabilityAnalysis::new(2.0, 100.0).unwrap();
    ///
    /// // R(eta) = exp(-1) for any shape parameter
    /// assert!((ra.reliability(100.0) - (-1.0_f64).exp()).abs() < 1e-10);
    /// ```
    pub fn reliability(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        let z = t / self.scale;
        (-z.powf(self.shape)).exp()
    }

    /// Cumulative failure probability F(t) = 1 - R(t).
    pub fn cdf(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let z = t / self.scale;
        -(-z.powf(self.shape)).exp_m1()
    }

    /// Probability density f(t) = lambda(t) * R(t).
    ///
    /// For t <= 0, returns 0.0.
    pub fn pdf(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        self.hazard_rate(t) * self.reliability(t)
    }

    /// Failure rate (hazard function) at time t.
    ///
    /// ```text
    /// lambda(t) = (beta/eta) * (t/eta)^(beta-1)
    /// ```
    ///
    /// - beta < 1: Decreasing failure rate (infant mortality)
    /// - beta = 1: Constant failure rate (random/exponential failures)
    /// - beta > 1: Increasing failure rate (wear-out)
    ///
    /// For t <= 0, returns 0.0.
    pub fn hazard_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let z = t / self.scale;
        (self.shape / self.scale) * z.powf(self.shape - 1.0)
    }

    /// Mean time to failure.
    ///
    /// ```text
    /// MTTF = eta * Gamma(1 + 1/beta)
    /// ```
    ///
    /// # Reference
    /// Johnson, Kotz & Balakrishnan (1994), *Continuous Univariate Distributions*,
    /// Vol. 1, Chapter 21.
    pub fn mttf(&self) -> f64 {
        self.scale * ln_gamma(1.0 + 1.0 / self.shape).exp()
    }

    /// Time at which reliability drops to a given level.
    ///
    /// Solves R(t) = p for t:
    ///
    /// ```text
    /// t = eta * (-ln(p))^(1/beta)
    /// ```
    ///
    /// # Errors
    /// [`ReliabilityError::InvalidParameter`] if `p` is outside (0, 1).
    pub fn time_to_reliability(&self, p: f64) -> Result<f64> {
        if !(p > 0.0 && p < 1.0) {
            return Err(ReliabilityError::invalid("reliability", "must be in (0, 1)"));
        }
        Ok(self.scale * (-p.ln()).powf(1.0 / self.shape))
    }

    /// B-life: time at which a given fraction of the population has failed.
    ///
    /// B10 life (10% failed) = `b_life(0.10)`, which is equivalent to
    /// `time_to_reliability(0.90)`.
    ///
    /// # Errors
    /// [`ReliabilityError::InvalidParameter`] if `fraction_failed` is outside (0, 1).
    ///
    /// ```
    /// use u_reliability::weibull::ReliabilityAnalysis;
    /// let ra = ReliabilityAnalysis::new(2.0, 100.0).unwrap();
    /// let b5 = ra.b_life(0.05).unwrap();
    /// let b10 = ra.b_life(0.10).unwrap();
    /// let b50 = ra.b_life(0.50).unwrap();
    /// assert!(b5 < b10 && b10 < b50);
    /// ```
    ///
    /// # Reference
    /// Abernethy (2006), *The New Weibull Handbook*, 5th ed., Chapter 2.
    pub fn b_life(&self, fraction_failed: f64) -> Result<f64> {
        if !(fraction_failed > 0.0 && fraction_failed < 1.0) {
            return Err(ReliabilityError::invalid(
                "fraction_failed",
                "must be in (0, 1)",
            ));
        }
        self.time_to_reliability(1.0 - fraction_failed)
    }
}
