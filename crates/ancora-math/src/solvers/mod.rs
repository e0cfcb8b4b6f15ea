//! Nonlinear least-squares solver contract and implementations.
//!
//! The fitting engine treats the minimizer as a pluggable collaborator: it
//! hands an [`ObjectiveFunction`] (residuals + Jacobian provider) and an
//! initial parameter vector to a [`LeastSquaresSolver`] and reads back a
//! [`SolverResult`]. The bundled implementation is
//! [`LevenbergMarquardt`]; a scalar Newton root finder used for
//! price-to-yield conversion lives in [`newton`].

mod levenberg_marquardt;
pub mod newton;

pub use levenberg_marquardt::LevenbergMarquardt;

use std::fmt;
use std::time::Duration;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::MathResult;

/// A sum-of-squares objective exposed through residuals and a Jacobian.
///
/// Implementors own whatever state the evaluation touches; the solver only
/// ever sees the parameter vector going in and numbers coming out.
pub trait ObjectiveFunction {
    /// The scalar objective value at `parameters`.
    fn value(&self, parameters: &DVector<f64>) -> f64;

    /// The residual vector at `parameters`, one entry per observation.
    fn residuals(&self, parameters: &DVector<f64>) -> DVector<f64>;

    /// The Jacobian of the residuals at `parameters`, one row per
    /// observation.
    fn jacobian(&self, parameters: &DVector<f64>) -> DMatrix<f64>;

    /// Number of observations contributing residuals.
    fn residual_count(&self) -> usize;
}

/// Configuration for least-squares solvers.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// Terminate when the objective changes by no more than this.
    pub min_delta_value: f64,
    /// Terminate when the parameter step norm is no more than this.
    pub min_delta_parameters: f64,
    /// Iteration ceiling.
    pub max_iterations: usize,
    /// Optional elementwise lower bounds applied after each step.
    pub lower_bounds: Option<DVector<f64>>,
    /// Optional elementwise upper bounds applied after each step.
    pub upper_bounds: Option<DVector<f64>>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            min_delta_value: 1e-6,
            min_delta_parameters: 1e-6,
            max_iterations: 5000,
            lower_bounds: None,
            upper_bounds: None,
        }
    }
}

impl SolverOptions {
    /// Creates options with default tolerances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the objective-delta termination threshold.
    #[must_use]
    pub fn with_min_delta_value(mut self, min_delta_value: f64) -> Self {
        self.min_delta_value = min_delta_value;
        self
    }

    /// Sets the parameter-step termination threshold.
    #[must_use]
    pub fn with_min_delta_parameters(mut self, min_delta_parameters: f64) -> Self {
        self.min_delta_parameters = min_delta_parameters;
        self
    }

    /// Sets the iteration ceiling.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets elementwise bounds enforced after every step.
    #[must_use]
    pub fn with_bounds(mut self, lower: DVector<f64>, upper: DVector<f64>) -> Self {
        self.lower_bounds = Some(lower);
        self.upper_bounds = Some(upper);
        self
    }
}

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverStatus {
    /// Successive objective values differed by less than the tolerance.
    ValueConverged,
    /// The parameter step norm fell below the tolerance.
    ParametersConverged,
    /// The iteration ceiling was reached.
    MaxIterationsReached,
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverStatus::ValueConverged => write!(f, "value converged"),
            SolverStatus::ParametersConverged => write!(f, "parameters converged"),
            SolverStatus::MaxIterationsReached => write!(f, "maximum iterations reached"),
        }
    }
}

/// Outcome of a least-squares estimation.
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// Final parameter vector.
    pub parameters: DVector<f64>,
    /// Objective value at the final parameters.
    pub value: f64,
    /// Objective value at the initial guess.
    pub initial_value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Why the solver stopped.
    pub status: SolverStatus,
    /// Wall-clock time spent estimating.
    pub fitting_time: Duration,
}

impl SolverResult {
    /// One-line summary for logs and status displays.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} after {} iterations, cost {:.6e} -> {:.6e}",
            self.status, self.iterations, self.initial_value, self.value
        )
    }
}

/// A pluggable nonlinear least-squares minimizer.
pub trait LeastSquaresSolver: Send + Sync {
    /// Minimizes `objective` starting from `initial`.
    ///
    /// # Errors
    ///
    /// Fails on numerical breakdown (non-positive-definite normal
    /// equations, non-finite objective values) or degenerate input.
    fn estimate(
        &self,
        objective: &dyn ObjectiveFunction,
        initial: DVector<f64>,
    ) -> MathResult<SolverResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builders() {
        let options = SolverOptions::new()
            .with_max_iterations(50)
            .with_min_delta_value(1e-9);

        assert_eq!(options.max_iterations, 50);
        assert_eq!(options.min_delta_value, 1e-9);
        assert!(options.lower_bounds.is_none());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(
            SolverStatus::ValueConverged.to_string(),
            "value converged"
        );
        assert_eq!(
            SolverStatus::MaxIterationsReached.to_string(),
            "maximum iterations reached"
        );
    }
}
