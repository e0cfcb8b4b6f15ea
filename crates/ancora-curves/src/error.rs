//! Error types for curve operations.

use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors that can occur during curve operations.
#[derive(Error, Debug, Clone)]
pub enum CurveError {
    /// Knot dates and values have different lengths.
    #[error("Length mismatch: {dates} knot dates but {values} values")]
    LengthMismatch {
        /// Number of knot dates.
        dates: usize,
        /// Number of values.
        values: usize,
    },

    /// A solver output vector does not match the knot count.
    #[error("Solver output has {got} values, curve holds {expected} knots")]
    SolverOutputMismatch {
        /// Number of knots on the curve.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// The curve has no knots.
    #[error("Curve is empty")]
    Empty,
}

impl CurveError {
    /// Creates a length mismatch error.
    #[must_use]
    pub fn length_mismatch(dates: usize, values: usize) -> Self {
        Self::LengthMismatch { dates, values }
    }

    /// Creates a solver output mismatch error.
    #[must_use]
    pub fn solver_output_mismatch(expected: usize, got: usize) -> Self {
        Self::SolverOutputMismatch { expected, got }
    }
}
