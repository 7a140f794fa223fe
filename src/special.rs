//! Distribution quantile approximations used by the confidence-bound engines.
//!
//! - [`inverse_normal`] — Acklam's rational approximation of the standard
//!   normal quantile, absolute error ≈ 1.15e-9 over (0, 1).
//! - [`inverse_chi_squared`] — Wilson–Hilferty cube-root transform built on
//!   [`inverse_normal`].
//! - [`inverse_chi_squared_exact`] — bisection on the regularized incomplete
//!   gamma CDF, for low degrees of freedom where Wilson–Hilferty degrades.
//!
//! # References
//!
//! - Acklam, P.J. (2003). "An algorithm for computing the inverse normal
//!   cumulative distribution function".
//! - Wilson, E.B. & Hilferty, M.M. (1931). "The distribution of chi-square",
//!   *PNAS* 17(12), pp. 684-688.

use u_numflow::special;

use crate::error::{ReliabilityError, Result};

/// Boundary between the lower tail and central regions.
const P_LOW: f64 = 0.02425;

/// Boundary between the central and upper tail regions.
const P_HIGH: f64 = 1.0 - P_LOW;

/// Central region numerator coefficients.
const A: [f64; 6] = [
    -3.969_683_028_665_376e1,
    2.209_460_984_245_205e2,
    -2.759_285_104_469_687e2,
    1.383_577_518_672_690e2,
    -3.066_479_806_614_716e1,
    2.506_628_277_459_239,
];

/// Central region denominator coefficients.
const B: [f64; 5] = [
    -5.447_609_879_822_406e1,
    1.615_858_368_580_409e2,
    -1.556_989_798_598_866e2,
    6.680_131_188_771_972e1,
    -1.328_068_155_288_572e1,
];

/// Tail region numerator coefficients.
const C: [f64; 6] = [
    -7.784_894_002_430_293e-3,
    -3.223_964_580_411_365e-1,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];

/// Tail region denominator coefficients.
const D: [f64; 4] = [
    7.784_695_709_041_462e-3,
    3.224_671_290_700_398e-1,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];

/// Maximum bisection iterations for the exact chi-squared quantile.
const MAX_BISECTION_ITER: usize = 200;

/// Method used to invert the chi-squared distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChiSquaredMethod {
    /// Wilson–Hilferty approximation. Fast, closed form; degrades for df < 5.
    #[default]
    WilsonHilferty,
    /// Bisection on the chi-squared CDF. Accurate at any df.
    Exact,
}

/// Standard normal quantile function Φ⁻¹(p).
///
/// Uses Acklam's three-region rational approximation: a lower tail region
/// for p < 0.02425, a central region, and an upper tail region for
/// p > 0.97575. Absolute error is on the order of 1e-9.
///
/// # Degenerate input
///
/// For `p <= 0`, `p >= 1`, or NaN this returns `0.0` rather than ±∞. This is
/// a deliberate simplification: callers that need to distinguish the
/// degenerate case must check `p` themselves.
///
/// # Examples
///
/// ```
/// use u_reliability::special::inverse_normal;
///
/// assert!(inverse_normal(0.5).abs() < 1e-9);
/// assert!((inverse_normal(0.975) - 1.959964).abs() < 1e-6);
/// assert_eq!(inverse_normal(0.0), 0.0);
/// ```
pub fn inverse_normal(p: f64) -> f64 {
    if p.is_nan() || p <= 0.0 || p >= 1.0 {
        return 0.0;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        tail(q)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        let num = ((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5];
        let den = ((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0;
        num * q / den
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -tail(q)
    }
}

fn tail(q: f64) -> f64 {
    let num = ((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5];
    let den = (((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0;
    num / den
}

/// Chi-squared quantile by the Wilson–Hilferty approximation.
///
/// ```text
/// z = Φ⁻¹(p)
/// χ²(p, df) ≈ df · (1 − 2/(9·df) + z·√(2/(9·df)))³
/// ```
///
/// # Accuracy
///
/// Relative error is well under 1% for df ≥ 10 and p in [0.05, 0.95], and
/// shrinks as df grows. Below df ≈ 5 accuracy degrades quickly, most
/// severely in the lower tail (about 9% at df = 5, p = 0.01). At df = 1 and
/// p = 0.01 the cubed term is negative and so is the returned value. The
/// raw approximation is returned unchanged; [`chi_squared_quantile`] rejects
/// non-positive results and offers [`ChiSquaredMethod::Exact`] instead.
///
/// Inherits the `p ∉ (0, 1)` clamp of [`inverse_normal`] (z = 0).
///
/// # Examples
///
/// ```
/// use u_reliability::special::inverse_chi_squared;
///
/// // Tabulated χ²(0.95, 10) = 18.307
/// let q = inverse_chi_squared(0.95, 10.0);
/// assert!((q - 18.307).abs() < 0.1);
/// ```
pub fn inverse_chi_squared(p: f64, df: f64) -> f64 {
    let z = inverse_normal(p);
    let h = 2.0 / (9.0 * df);
    let base = 1.0 - h + z * h.sqrt();
    df * base * base * base
}

/// Chi-squared quantile by bisection on the chi-squared CDF.
///
/// # Returns
///
/// `Err` if `p` is outside (0, 1) or `df` is not a finite value ≥ 1.
///
/// # Examples
///
/// ```
/// use u_reliability::special::inverse_chi_squared_exact;
///
/// // Tabulated χ²(0.05, 2) = 0.1026
/// let q = inverse_chi_squared_exact(0.05, 2.0).unwrap();
/// assert!((q - 0.1026).abs() < 1e-3);
/// ```
pub fn inverse_chi_squared_exact(p: f64, df: f64) -> Result<f64> {
    validate(p, df)?;

    let mut lo = 0.0_f64;
    let mut hi = df.max(1.0);
    while special::chi_squared_cdf(hi, df) < p {
        lo = hi;
        hi *= 2.0;
        if !hi.is_finite() {
            return Err(ReliabilityError::degenerate("chi-squared quantile unbounded"));
        }
    }

    for _ in 0..MAX_BISECTION_ITER {
        let mid = 0.5 * (lo + hi);
        if special::chi_squared_cdf(mid, df) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= 1e-12 * hi.max(1e-300) {
            break;
        }
    }

    Ok(0.5 * (lo + hi))
}

/// Chi-squared quantile with input validation and a positivity guard.
///
/// # Returns
///
/// `Err` if `p` is outside (0, 1), `df` is not a finite value ≥ 1, or the
/// quantile is not a positive finite number (possible with
/// [`ChiSquaredMethod::WilsonHilferty`] at small df).
pub fn chi_squared_quantile(p: f64, df: f64, method: ChiSquaredMethod) -> Result<f64> {
    validate(p, df)?;

    let q = match method {
        ChiSquaredMethod::WilsonHilferty => inverse_chi_squared(p, df),
        ChiSquaredMethod::Exact => inverse_chi_squared_exact(p, df)?,
    };

    if !q.is_finite() || q <= 0.0 {
        return Err(ReliabilityError::degenerate(
            "chi-squared quantile is not positive",
        ));
    }
    Ok(q)
}

fn validate(p: f64, df: f64) -> Result<()> {
    if !(p > 0.0 && p < 1.0) {
        return Err(ReliabilityError::invalid("p", "must be in (0, 1)"));
    }
    if !df.is_finite() || df < 1.0 {
        return Err(ReliabilityError::invalid("df", "must be finite and >= 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // inverse_normal
    // -----------------------------------------------------------------------

    #[test]
    fn test_inverse_normal_median() {
        assert!(inverse_normal(0.5).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_normal_known_quantiles() {
        let cases = [
            (0.975, 1.959_963_985),
            (0.95, 1.644_853_627),
            (0.99, 2.326_347_874),
            (0.001, -3.090_232_306),
            (0.01, -2.326_347_874),
        ];
        for (p, z) in cases {
            let got = inverse_normal(p);
            assert!(
                (got - z).abs() < 1e-8,
                "inverse_normal({p}) = {got}, expected {z}"
            );
        }
    }

    #[test]
    fn test_inverse_normal_region_boundaries() {
        // Continuity across the tail/central split
        let below = inverse_normal(P_LOW - 1e-12);
        let above = inverse_normal(P_LOW + 1e-12);
        assert!((below - above).abs() < 1e-8, "{below} vs {above}");

        let below = inverse_normal(P_HIGH - 1e-12);
        let above = inverse_normal(P_HIGH + 1e-12);
        assert!((below - above).abs() < 1e-8, "{below} vs {above}");
    }

    #[test]
    fn test_inverse_normal_degenerate_clamp() {
        assert_eq!(inverse_normal(0.0), 0.0);
        assert_eq!(inverse_normal(1.0), 0.0);
        assert_eq!(inverse_normal(-0.5), 0.0);
        assert_eq!(inverse_normal(1.5), 0.0);
        assert_eq!(inverse_normal(f64::NAN), 0.0);
    }

    #[test]
    fn test_inverse_normal_deep_tails() {
        assert!(inverse_normal(1e-10) < -6.0);
        assert!(inverse_normal(1.0 - 1e-10) > 6.0);
    }

    // -----------------------------------------------------------------------
    // inverse_chi_squared
    // -----------------------------------------------------------------------

    #[test]
    fn test_wilson_hilferty_df10() {
        // Tables: χ²(0.95, 10) = 18.307, χ²(0.05, 10) = 3.940
        let upper = inverse_chi_squared(0.95, 10.0);
        let lower = inverse_chi_squared(0.05, 10.0);
        assert!((upper - 18.307).abs() / 18.307 < 0.01, "upper = {upper}");
        assert!((lower - 3.940).abs() / 3.940 < 0.01, "lower = {lower}");
    }

    #[test]
    fn test_wilson_hilferty_small_df_goes_negative() {
        // Documented limitation: lower tail at df=1 is not usable
        assert!(inverse_chi_squared(0.01, 1.0) < 0.0);
        assert!(chi_squared_quantile(0.01, 1.0, ChiSquaredMethod::WilsonHilferty).is_err());
    }

    #[test]
    fn test_exact_matches_tables() {
        let cases = [
            (0.05, 2.0, 0.1026),
            (0.95, 2.0, 5.991),
            (0.95, 10.0, 18.307),
            (0.05, 10.0, 3.940),
            (0.99, 1.0, 6.635),
            (0.01, 1.0, 0.000_157),
        ];
        for (p, df, expected) in cases {
            let q = inverse_chi_squared_exact(p, df).expect("valid input");
            assert!(
                (q - expected).abs() / expected < 5e-3,
                "exact χ²({p}, {df}) = {q}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_exact_agrees_with_wilson_hilferty_at_high_df() {
        for p in [0.05, 0.5, 0.95] {
            let exact = inverse_chi_squared_exact(p, 40.0).expect("valid input");
            let approx = inverse_chi_squared(p, 40.0);
            assert!(
                (exact - approx).abs() / exact < 2e-3,
                "p={p}: exact {exact} vs WH {approx}"
            );
        }
    }

    #[test]
    fn test_quantile_validation() {
        let m = ChiSquaredMethod::WilsonHilferty;
        assert!(chi_squared_quantile(0.0, 10.0, m).is_err());
        assert!(chi_squared_quantile(1.0, 10.0, m).is_err());
        assert!(chi_squared_quantile(f64::NAN, 10.0, m).is_err());
        assert!(chi_squared_quantile(0.5, 0.5, m).is_err());
        assert!(chi_squared_quantile(0.5, f64::INFINITY, m).is_err());
        assert!(inverse_chi_squared_exact(0.5, 0.0).is_err());
    }

    #[test]
    fn test_default_method_is_wilson_hilferty() {
        assert_eq!(ChiSquaredMethod::default(), ChiSquaredMethod::WilsonHilferty);
    }
}
