//! Optimal preventive replacement age under an age-replacement policy.
//!
//! # Model
//!
//! A unit is replaced preventively at age t at cost Cp, or correctively on
//! failure at cost Cf, whichever comes first. By the renewal-reward theorem
//! the long-run cost per unit time is
//!
//! ```text
//!         Cp * R(t) + Cf * (1 - R(t))
//! C(t) = -----------------------------,   L(t) = ∫₀ᵗ R(x) dx
//!                    L(t)
//! ```
//!
//! where R is the Weibull reliability function and L(t) the expected cycle
//! length. No closed-form minimizer exists for general beta, so C(t) is
//! swept on an even grid over (0, horizon] with L(t) accumulated by the
//! trapezoidal rule.
//!
//! For beta > 1 the hazard is strictly increasing and C(t) has at most one
//! interior minimum; otherwise the sweep ends at the horizon. For beta <= 1
//! run-to-failure is never beaten and the optimizer reports
//! [`ReliabilityError::NotApplicable`].
//!
//! # Reference
//!
//! Barlow, R.E. & Proschan, F. (1965). *Mathematical Theory of Reliability*,
//! Wiley, Chapter 4.

use crate::error::{ReliabilityError, Result};
use crate::weibull::ReliabilityAnalysis;

/// Golden ratio conjugate (√5 − 1) / 2.
const INV_PHI: f64 = 0.618_033_988_749_894_9;

/// Trapezoids per grid cell when re-integrating inside the refinement bracket.
const REFINE_INTEGRATION_STEPS: usize = 64;

/// Maximum golden-section iterations.
const MAX_REFINE_ITER: usize = 200;

/// Tuning for [`optimal_replacement_age_with`].
///
/// The search grid and the integration grid are independent: each of the
/// `search_steps` cells is integrated with `integration_substeps`
/// trapezoids.
///
/// ```
/// use u_reliability::maintenance::ReplacementConfig;
///
/// let config = ReplacementConfig::default()
///     .with_search_steps(1000)
///     .with_integration_substeps(4)
///     .with_refine(true);
/// assert_eq!(config.search_steps, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplacementConfig {
    /// Number of cost-rate evaluations over (0, horizon]. Default 500.
    pub search_steps: usize,
    /// Trapezoids per search cell for L(t). Default 1.
    pub integration_substeps: usize,
    /// Search horizon as a multiple of eta. Default 3.0.
    pub horizon_factor: f64,
    /// Golden-section refinement around the grid minimum. Default off.
    pub refine: bool,
    /// Refinement bracket width at which to stop, relative to eta. Default 1e-6.
    pub refine_tolerance: f64,
}

impl Default for ReplacementConfig {
    fn default() -> Self {
        Self {
            search_steps: 500,
            integration_substeps: 1,
            horizon_factor: 3.0,
            refine: false,
            refine_tolerance: 1e-6,
        }
    }
}

impl ReplacementConfig {
    /// Sets the number of search grid points.
    pub fn with_search_steps(mut self, steps: usize) -> Self {
        self.search_steps = steps;
        self
    }

    /// Sets the number of trapezoids per search cell.
    pub fn with_integration_substeps(mut self, substeps: usize) -> Self {
        self.integration_substeps = substeps;
        self
    }

    /// Sets the search horizon as a multiple of eta.
    pub fn with_horizon_factor(mut self, factor: f64) -> Self {
        self.horizon_factor = factor;
        self
    }

    /// Enables or disables golden-section refinement.
    pub fn with_refine(mut self, refine: bool) -> Self {
        self.refine = refine;
        self
    }

    /// Sets the refinement stopping width, relative to eta.
    pub fn with_refine_tolerance(mut self, tolerance: f64) -> Self {
        self.refine_tolerance = tolerance;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.search_steps < 2 {
            return Err(ReliabilityError::invalid("search_steps", "must be at least 2"));
        }
        if self.integration_substeps == 0 {
            return Err(ReliabilityError::invalid(
                "integration_substeps",
                "must be at least 1",
            ));
        }
        if !self.horizon_factor.is_finite() || self.horizon_factor <= 0.0 {
            return Err(ReliabilityError::invalid(
                "horizon_factor",
                "must be positive and finite",
            ));
        }
        if !self.refine_tolerance.is_finite() || self.refine_tolerance <= 0.0 {
            return Err(ReliabilityError::invalid(
                "refine_tolerance",
                "must be positive and finite",
            ));
        }
        Ok(())
    }
}

/// One sample of the cost-rate curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostRatePoint {
    /// Replacement age.
    pub time: f64,
    /// Expected cost per unit time C(t).
    pub cost_rate: f64,
}

/// Result of the replacement-age optimization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplacementPlan {
    /// Replacement age minimizing the cost rate, in (0, horizon].
    pub optimal_time: f64,
    /// Cost rate at `optimal_time`.
    pub min_cost_rate: f64,
    /// Cost rate sampled on the search grid, ordered by time.
    pub cost_curve: Vec<CostRatePoint>,
    /// Cost rate of run-to-failure, Cf / MTTF.
    pub run_to_failure_cost_rate: f64,
    /// Fractional saving of the optimal policy over run-to-failure.
    pub savings_fraction: f64,
}

/// Optimal replacement age with the default grid (500 steps over (0, 3·eta]).
///
/// See [`optimal_replacement_age_with`].
///
/// # Examples
///
/// ```
/// use u_reliability::maintenance::optimal_replacement_age;
///
/// let plan = optimal_replacement_age(100.0, 1000.0, 2.5, 1000.0).unwrap();
/// assert!(plan.optimal_time > 300.0 && plan.optimal_time < 400.0);
/// assert!(plan.min_cost_rate < plan.run_to_failure_cost_rate);
///
/// // Infant mortality: preventive replacement never pays
/// assert!(optimal_replacement_age(100.0, 1000.0, 0.8, 1000.0).is_err());
/// ```
pub fn optimal_replacement_age(
    preventive_cost: f64,
    failure_cost: f64,
    beta: f64,
    eta: f64,
) -> Result<ReplacementPlan> {
    optimal_replacement_age_with(
        preventive_cost,
        failure_cost,
        beta,
        eta,
        &ReplacementConfig::default(),
    )
}

/// Optimal replacement age minimizing the renewal-reward cost rate.
///
/// # Algorithm
///
/// 1. t_i = i * horizon / search_steps for i = 1..=search_steps
/// 2. L(t_i) accumulated by the trapezoidal rule with
///    `integration_substeps` trapezoids per cell
/// 3. C(t_i) evaluated and the first minimum tracked
/// 4. With `refine`, golden-section search over [t_{i-1}, t_{i+1}] around
///    the grid minimum; the refined point is kept only if it lowers C
///
/// The returned cost rate is never above the cost rate at either end of the
/// grid.
///
/// # Errors
///
/// - [`ReliabilityError::NotApplicable`] if beta <= 1.
/// - [`ReliabilityError::InvalidParameter`] if a cost is negative or
///   non-finite, beta or eta is not positive and finite, or `config` is invalid.
pub fn optimal_replacement_age_with(
    preventive_cost: f64,
    failure_cost: f64,
    beta: f64,
    eta: f64,
    config: &ReplacementConfig,
) -> Result<ReplacementPlan> {
    if !preventive_cost.is_finite() || preventive_cost < 0.0 {
        return Err(ReliabilityError::invalid(
            "preventive_cost",
            "must be non-negative and finite",
        ));
    }
    if !failure_cost.is_finite() || failure_cost < 0.0 {
        return Err(ReliabilityError::invalid(
            "failure_cost",
            "must be non-negative and finite",
        ));
    }
    let analysis = ReliabilityAnalysis::new(beta, eta)?;
    if beta <= 1.0 {
        tracing::trace!(beta, "non-increasing hazard, no preventive optimum");
        return Err(ReliabilityError::NotApplicable(
            "preventive replacement requires an increasing hazard (beta > 1)",
        ));
    }
    config.validate()?;

    let cost_rate = |r: f64, cycle_length: f64| {
        (preventive_cost * r + failure_cost * (1.0 - r)) / cycle_length
    };

    let horizon = config.horizon_factor * eta;
    let steps = config.search_steps;
    let substeps = config.integration_substeps;
    let dt = horizon / steps as f64;
    let h = dt / substeps as f64;

    let mut cost_curve = Vec::with_capacity(steps);
    // L(t_i) for i = 0..=steps, kept for the refinement pass
    let mut cycle_lengths = Vec::with_capacity(steps + 1);
    cycle_lengths.push(0.0);

    let mut cycle_length = 0.0_f64;
    let mut prev_r = 1.0_f64;
    let mut best_index = 0;
    let mut best_rate = f64::INFINITY;

    for i in 1..=steps {
        for j in 1..=substeps {
            let t = ((i - 1) * substeps + j) as f64 * h;
            let r = analysis.reliability(t);
            cycle_length += 0.5 * (prev_r + r) * h;
            prev_r = r;
        }
        let time = i as f64 * dt;
        let rate = cost_rate(prev_r, cycle_length);
        if !rate.is_finite() {
            return Err(ReliabilityError::degenerate("cost rate is not finite"));
        }
        if rate < best_rate {
            best_rate = rate;
            best_index = i;
        }
        cycle_lengths.push(cycle_length);
        cost_curve.push(CostRatePoint {
            time,
            cost_rate: rate,
        });
    }

    let mut optimal_time = best_index as f64 * dt;
    let mut min_cost_rate = best_rate;

    if config.refine {
        let lo = (best_index - 1) as f64 * dt;
        let hi = (best_index + 1).min(steps) as f64 * dt;
        let eval = |t: f64| {
            // L(t) = L(t_k) + ∫_{t_k}^{t} R(x) dx
            let k = ((t / dt).floor() as usize).min(steps);
            let base = k as f64 * dt;
            let width = (t - base) / REFINE_INTEGRATION_STEPS as f64;
            let mut l = cycle_lengths[k];
            let mut prev = analysis.reliability(base);
            for s in 1..=REFINE_INTEGRATION_STEPS {
                let r = analysis.reliability(base + s as f64 * width);
                l += 0.5 * (prev + r) * width;
                prev = r;
            }
            cost_rate(prev, l)
        };
        let (t, rate) = golden_section(eval, lo, hi, config.refine_tolerance * eta);
        if rate.is_finite() && rate < min_cost_rate && t > 0.0 && t <= horizon {
            optimal_time = t;
            min_cost_rate = rate;
        }
    }

    let mttf = analysis.mttf();
    let run_to_failure_cost_rate = failure_cost / mttf;
    let savings_fraction = if run_to_failure_cost_rate > 0.0 {
        1.0 - min_cost_rate / run_to_failure_cost_rate
    } else {
        0.0
    };

    tracing::debug!(
        beta,
        eta,
        optimal_time,
        min_cost_rate,
        run_to_failure_cost_rate,
        "optimal replacement age"
    );

    Ok(ReplacementPlan {
        optimal_time,
        min_cost_rate,
        cost_curve,
        run_to_failure_cost_rate,
        savings_fraction,
    })
}

/// Golden-section minimization of `f` over the open interval (a, b).
///
/// Only interior points are evaluated.
fn golden_section<F: Fn(f64) -> f64>(f: F, mut a: f64, mut b: f64, tol: f64) -> (f64, f64) {
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);

    for _ in 0..MAX_REFINE_ITER {
        if (b - a) <= tol {
            break;
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = f(d);
        }
    }

    if fc < fd {
        (c, fc)
    } else {
        (d, fd)
    }
}
