//! Sampled reliability, CDF, density, and hazard curves for plotting.

use super::reliability::ReliabilityAnalysis;
use crate::error::{ReliabilityError, Result};

/// Default number of intervals between t = 0 and the horizon.
pub const DEFAULT_CURVE_STEPS: usize = 100;

/// One sample of the Weibull life functions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurvePoint {
    /// Time.
    pub t: f64,
    /// R(t).
    pub reliability: f64,
    /// F(t) = 1 - R(t).
    pub cdf: f64,
    /// f(t).
    pub pdf: f64,
    /// lambda(t).
    pub hazard: f64,
}

/// Samples the Weibull life functions on an even grid over [0, max_time].
///
/// Returns `steps + 1` points at t_i = max_time * i / steps. The t = 0
/// sample is fixed at reliability 1 with cdf, pdf, and hazard 0, which also
/// avoids the singular density at the origin when beta < 1.
///
/// # Errors
/// [`ReliabilityError::InvalidParameter`] if beta or eta is not positive and
/// finite, `max_time` is not positive and finite, or `steps` is zero.
///
/// # Examples
///
/// ```
/// use u_reliability::weibull::{reliability_curve, DEFAULT_CURVE_STEPS};
///
/// let curve = reliability_curve(2.0, 100.0, 300.0, DEFAULT_CURVE_STEPS).unwrap();
/// assert_eq!(curve.len(), DEFAULT_CURVE_STEPS + 1);
/// assert_eq!(curve[0].reliability, 1.0);
/// assert!(curve.last().unwrap().reliability < 0.001);
/// ```
pub fn reliability_curve(
    beta: f64,
    eta: f64,
    max_time: f64,
    steps: usize,
) -> Result<Vec<CurvePoint>> {
    let analysis = ReliabilityAnalysis::new(beta, eta)?;
    if !max_time.is_finite() || max_time <= 0.0 {
        return Err(ReliabilityError::invalid(
            "max_time",
            "must be positive and finite",
        ));
    }
    if steps == 0 {
        return Err(ReliabilityError::invalid("steps", "must be at least 1"));
    }

    let dt = max_time / steps as f64;
    let curve = (0..=steps)
        .map(|i| {
            if i == 0 {
                return CurvePoint {
                    t: 0.0,
                    reliability: 1.0,
                    cdf: 0.0,
                    pdf: 0.0,
                    hazard: 0.0,
                };
            }
            let t = if i == steps { max_time } else { i as f64 * dt };
            let reliability = analysis.reliability(t);
            let hazard = analysis.hazard_rate(t);
            CurvePoint {
                t,
                reliability,
                cdf: 1.0 - reliability,
                pdf: hazard * reliability,
                hazard,
            }
        })
        .collect();

    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_length_and_grid() {
        let curve = reliability_curve(1.5, 10.0, 50.0, 10).expect("valid input");
        assert_eq!(curve.len(), 11);
        for (i, p) in curve.iter().enumerate() {
            assert!((p.t - 5.0 * i as f64).abs() < 1e-12, "t[{i}] = {}", p.t);
        }
    }

    #[test]
    fn test_curve_origin_special_case() {
        // beta < 1 has an infinite density at t = 0; the sample stays finite
        let curve = reliability_curve(0.5, 10.0, 50.0, 10).expect("valid input");
        let origin = curve[0];
        assert_eq!(origin.reliability, 1.0);
        assert_eq!(origin.cdf, 0.0);
        assert_eq!(origin.pdf, 0.0);
        assert_eq!(origin.hazard, 0.0);
    }

    #[test]
    fn test_reliability_at_eta_independent_of_beta() {
        let expected = (-1.0_f64).exp();
        for beta in [0.5, 1.0, 1.8, 3.0, 6.0] {
            // eta = 200 falls on grid point 50 of 100 over [0, 400]
            let curve = reliability_curve(beta, 200.0, 400.0, 100).expect("valid input");
            let at_eta = curve[50];
            assert!((at_eta.t - 200.0).abs() < 1e-9);
            assert!(
                (at_eta.reliability - expected).abs() < 1e-6,
                "beta={beta}: R(eta) = {}",
                at_eta.reliability
            );
        }
    }

    #[test]
    fn test_curve_relations() {
        let curve = reliability_curve(2.2, 40.0, 120.0, 60).expect("valid input");
        for p in &curve[1..] {
            assert!((p.cdf + p.reliability - 1.0).abs() < 1e-12);
            assert!((p.pdf - p.hazard * p.reliability).abs() < 1e-15);
            let z: f64 = p.t / 40.0;
            let hazard = (2.2 / 40.0) * z.powf(1.2);
            assert!((p.hazard - hazard).abs() < 1e-12);
        }
    }

    #[test]
    fn test_curve_invalid_input() {
        assert!(reliability_curve(0.0, 10.0, 50.0, 10).is_err());
        assert!(reliability_curve(2.0, -1.0, 50.0, 10).is_err());
        assert!(reliability_curve(2.0, 10.0, 0.0, 10).is_err());
        assert!(reliability_curve(2.0, 10.0, f64::NAN, 10).is_err());
        assert!(reliability_curve(2.0, 10.0, 50.0, 0).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn reliability_non_increasing(
            beta in 0.3_f64..6.0,
            eta in 1.0_f64..1e4,
            horizon in 0.1_f64..5.0,
        ) {
            let curve = reliability_curve(beta, eta, horizon * eta, 50).expect("valid input");
            for w in curve.windows(2) {
                prop_assert!(w[1].reliability <= w[0].reliability + 1e-15);
                prop_assert!(w[1].t > w[0].t);
            }
            for p in &curve {
                prop_assert!((0.0..=1.0).contains(&p.reliability));
                prop_assert!(p.pdf >= 0.0 && p.hazard >= 0.0);
            }
        }
    }
}
