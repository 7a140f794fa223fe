//! Reliability of redundant configurations of independent components.
//!
//! # k-out-of-n
//!
//! A k-out-of-n:G system works while at least k of its n independent,
//! identical, active components work. With component reliability r:
//!
//! ```text
//! R_sys = Σ_{i=k}^{n} C(n, i) · r^i · (1 − r)^(n−i)
//! ```
//!
//! k = n is a series system (rⁿ); k = 1 is a parallel system
//! (1 − (1 − r)ⁿ).
//!
//! Binomial coefficients are exact `u128` integers while they fit (every
//! coefficient up to n = 125); past that, the remaining terms are evaluated
//! in log space with `ln_gamma`, so there is no upper limit on n.
//!
//! # Reference
//!
//! Kuo, W. & Zuo, M.J. (2003). *Optimal Reliability Modeling*, Wiley, Ch. 7.

use u_numflow::special::ln_gamma;

use crate::error::{ReliabilityError, Result};

/// Exact binomial coefficient C(n, k).
///
/// Returns `Some(0)` for k > n and `None` if the value (or an intermediate
/// product) exceeds `u128`.
///
/// # Examples
///
/// ```
/// use u_reliability::redundancy::binomial_coefficient;
///
/// assert_eq!(binomial_coefficient(5, 2), Some(10));
/// assert_eq!(binomial_coefficient(3, 4), Some(0));
/// assert!(binomial_coefficient(200, 100).is_none());
/// ```
pub fn binomial_coefficient(n: u64, k: u64) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut c: u128 = 1;
    for i in 0..k {
        // C(n, i) * (n - i) = C(n, i + 1) * (i + 1), so the division is exact
        c = c.checked_mul(u128::from(n - i))? / u128::from(i + 1);
    }
    Some(c)
}

/// Reliability of a k-out-of-n:G system of identical components.
///
/// # Errors
///
/// [`ReliabilityError::InvalidParameter`] if `n` is zero, `k` is outside
/// [1, n], or `r` is outside [0, 1].
///
/// # Examples
///
/// ```
/// use u_reliability::redundancy::k_out_of_n;
///
/// // 2-out-of-3 voting with 0.9 components
/// let r = k_out_of_n(3, 2, 0.9).unwrap();
/// assert!((r - 0.972).abs() < 1e-9);
/// ```
pub fn k_out_of_n(n: u64, k: u64, r: f64) -> Result<f64> {
    if n == 0 {
        return Err(ReliabilityError::invalid("n", "must be at least 1"));
    }
    if k == 0 || k > n {
        return Err(ReliabilityError::invalid("k", "must be in [1, n]"));
    }
    validate_reliability(r)?;

    if r == 0.0 {
        return Ok(0.0);
    }
    if r == 1.0 {
        return Ok(1.0);
    }

    let q = 1.0 - r;
    let (ln_r, ln_q) = (r.ln(), q.ln());
    let ln_n_fact = ln_gamma(n as f64 + 1.0);

    let mut exact = binomial_coefficient(n, k);
    let mut total = 0.0_f64;

    for i in k..=n {
        let term = match exact {
            Some(c) => c as f64 * r.powf(i as f64) * q.powf((n - i) as f64),
            None => {
                let ln_c = ln_n_fact - ln_gamma(i as f64 + 1.0) - ln_gamma((n - i) as f64 + 1.0);
                (ln_c + i as f64 * ln_r + (n - i) as f64 * ln_q).exp()
            }
        };
        total += term;

        // C(n, i + 1) = C(n, i) * (n - i) / (i + 1)
        exact = exact
            .and_then(|c| c.checked_mul(u128::from(n - i)))
            .map(|c| c / u128::from(i + 1));
    }

    Ok(total.clamp(0.0, 1.0))
}

/// Reliability of independent components in series: Π rᵢ.
///
/// # Errors
///
/// [`ReliabilityError::InsufficientData`] for an empty slice,
/// [`ReliabilityError::InvalidParameter`] if any rᵢ is outside [0, 1].
pub fn series_reliability(reliabilities: &[f64]) -> Result<f64> {
    validate_components(reliabilities)?;
    Ok(reliabilities.iter().product())
}

/// Reliability of independent components in active parallel: 1 − Π (1 − rᵢ).
///
/// # Errors
///
/// [`ReliabilityError::InsufficientData`] for an empty slice,
/// [`ReliabilityError::InvalidParameter`] if any rᵢ is outside [0, 1].
pub fn parallel_reliability(reliabilities: &[f64]) -> Result<f64> {
    validate_components(reliabilities)?;
    let unreliability: f64 = reliabilities.iter().map(|r| 1.0 - r).product();
    Ok(1.0 - unreliability)
}

fn validate_components(reliabilities: &[f64]) -> Result<()> {
    if reliabilities.is_empty() {
        return Err(ReliabilityError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    reliabilities.iter().try_for_each(|&r| validate_reliability(r))
}

fn validate_reliability(r: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&r) {
        return Err(ReliabilityError::invalid("r", "must be in [0, 1]"));
    }
    Ok(())
}
