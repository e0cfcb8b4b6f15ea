//! Error types for numerical operations.

use thiserror::Error;

/// A specialized Result type for numerical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during numerical operations.
#[derive(Error, Debug, Clone)]
pub enum MathError {
    /// Iterative algorithm failed to converge.
    #[error("Convergence failed after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: usize,
        /// Final residual value.
        residual: f64,
    },

    /// Division by zero or near-zero value.
    #[error("Division by zero or near-zero value: {value:.2e}")]
    DivisionByZero {
        /// The near-zero value.
        value: f64,
    },

    /// Damped normal equations are not positive definite.
    #[error("Singular system: damped normal equations are not positive definite")]
    SingularSystem,

    /// A computation produced a non-finite value.
    #[error("Non-finite value encountered in {context}")]
    NonFinite {
        /// Where the non-finite value appeared.
        context: String,
    },

    /// Vector or matrix dimensions are incompatible.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        got: usize,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a convergence failure error.
    #[must_use]
    pub fn convergence_failed(iterations: usize, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates a non-finite value error.
    #[must_use]
    pub fn non_finite(context: impl Into<String>) -> Self {
        Self::NonFinite {
            context: context.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::convergence_failed(100, 2.5e-3);
        let msg = format!("{}", err);
        assert!(msg.contains("100 iterations"));
        assert!(msg.contains("2.5e-3") || msg.contains("2.50e-3"));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = MathError::invalid_input("empty parameter vector");
        assert!(format!("{}", err).contains("empty parameter vector"));
    }
}
