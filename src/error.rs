//! Error types for reliability calculations.
//!
//! Every public operation returns [`Result<T>`]. A precondition violation is
//! reported as an error value, never as a partially filled result carrying
//! NaN or infinity.

use thiserror::Error;

/// Result type alias for reliability operations.
pub type Result<T> = std::result::Result<T, ReliabilityError>;

/// Unified error type for all reliability operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReliabilityError {
    /// Not enough usable observations to perform the computation.
    #[error("insufficient data: need at least {required} values, got {actual}")]
    InsufficientData {
        /// Minimum number of values required.
        required: usize,
        /// Number of usable values supplied.
        actual: usize,
    },

    /// A scalar argument is outside its valid domain.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Name of the offending argument.
        name: &'static str,
        /// Constraint that was violated.
        reason: &'static str,
    },

    /// The method does not apply to the supplied regime.
    #[error("not applicable: {0}")]
    NotApplicable(&'static str),

    /// An intermediate quantity collapsed to zero, a negative value, or a
    /// non-finite value.
    #[error("numeric degeneracy: {0}")]
    Degenerate(&'static str),
}

impl ReliabilityError {
    pub(crate) fn invalid(name: &'static str, reason: &'static str) -> Self {
        tracing::trace!(name, reason, "rejected parameter");
        Self::InvalidParameter { name, reason }
    }

    pub(crate) fn degenerate(reason: &'static str) -> Self {
        tracing::trace!(reason, "numeric degeneracy");
        Self::Degenerate(reason)
    }

    /// Returns `true` when the caller should render an "invalid input" state.
    ///
    /// Numeric degeneracy counts as invalid input; [`NotApplicable`] does not,
    /// since it reports a valid input for which the method has no answer.
    ///
    /// [`NotApplicable`]: ReliabilityError::NotApplicable
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, Self::NotApplicable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = ReliabilityError::InsufficientData {
            required: 2,
            actual: 1,
        };
        assert_eq!(
            e.to_string(),
            "insufficient data: need at least 2 values, got 1"
        );

        let e = ReliabilityError::invalid("k", "must not exceed n");
        assert_eq!(e.to_string(), "invalid parameter 'k': must not exceed n");
    }

    #[test]
    fn test_invalid_input_classification() {
        assert!(ReliabilityError::degenerate("zero quantile").is_invalid_input());
        assert!(ReliabilityError::invalid("n", "must be >= 1").is_invalid_input());
        assert!(!ReliabilityError::NotApplicable("beta <= 1").is_invalid_input());
    }
}
