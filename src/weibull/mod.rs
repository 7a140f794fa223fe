//! Weibull life-data analysis.
//!
//! Fits the two-parameter Weibull distribution to complete failure data by
//! median rank regression and evaluates the fitted life functions.
//!
//! # Modules
//!
//! - [`weibull_fit`] — Median Rank Regression via Bernard's approximation
//! - [`ReliabilityAnalysis`] — R(t), F(t), f(t), hazard rate, MTTF, B-life
//! - [`reliability_curve`] — Evenly sampled life functions for plotting
//!
//! # References
//!
//! - Abernethy, R.B. (2006). *The New Weibull Handbook*, 5th ed.
//! - Dodson, B. (2006). *The Weibull Analysis Handbook*, 2nd ed.

mod curve;
mod mrr;
mod reliability;

pub use curve::{reliability_curve, CurvePoint, DEFAULT_CURVE_STEPS};
pub use mrr::{weibull_fit, FitLinePoint, RegressionPoint, WeibullFit};
pub use reliability::{FailureMode, ReliabilityAnalysis};
