//! # u-reliability
//!
//! Reliability engineering calculations: Weibull life-data analysis, MTBF
//! confidence bounds, preventive replacement optimization, and k-out-of-n
//! redundancy.
//!
//! This crate is domain-agnostic — it operates on raw `f64` failure times,
//! costs, and probabilities without knowledge of any specific asset, plant,
//! or presentation layer.
//!
//! ## Modules
//!
//! - [`special`] — Inverse standard normal and inverse chi-squared approximations
//! - [`weibull`] — Median rank regression fit, reliability functions, curve sampling
//! - [`mtbf`] — Two-sided chi-squared confidence interval on MTBF
//! - [`maintenance`] — Optimal age-replacement interval (renewal-reward cost rate)
//! - [`redundancy`] — k-out-of-n voting system reliability
//! - [`error`] — Shared error type
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: No shared state; every call is self-contained
//! - **Explicit failure**: Invalid input yields [`ReliabilityError`], never a
//!   zero-filled or NaN-laden result
//! - **Documented accuracy**: Approximations state their validity ranges
//!
//! ```
//! use u_reliability::weibull::weibull_fit;
//! use u_reliability::maintenance::optimal_replacement_age;
//!
//! let fit = weibull_fit(&[120.0, 245.0, 310.0, 550.0, 900.0]).unwrap();
//! assert!(fit.beta > 1.0);
//!
//! let plan = optimal_replacement_age(100.0, 1000.0, fit.beta, fit.eta).unwrap();
//! assert!(plan.optimal_time > 0.0 && plan.optimal_time <= 3.0 * fit.eta);
//! ```

pub mod error;
pub mod maintenance;
pub mod mtbf;
pub mod redundancy;
pub mod special;
pub mod weibull;

pub use error::{ReliabilityError, Result};
