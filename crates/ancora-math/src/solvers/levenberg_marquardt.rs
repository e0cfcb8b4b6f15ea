//! Levenberg-Marquardt least-squares minimizer.

use std::time::Instant;

use log::{debug, trace};
use nalgebra::DVector;

use crate::error::{MathError, MathResult};
use crate::solvers::{
    LeastSquaresSolver, ObjectiveFunction, SolverOptions, SolverResult, SolverStatus,
};

/// Levenberg-Marquardt minimizer over an [`ObjectiveFunction`].
///
/// Each iteration solves the damped normal equations
///
/// ```text
/// (JᵀJ + λ·diag(JᵀJ)) δ = Jᵀr
/// ```
///
/// by Cholesky factorization and trials the step `p - δ`. A step that
/// lowers the objective is accepted and the damping relaxed by
/// `lambda_factor`; a step that does not is rejected and the damping
/// tightened. Scaling the damping by the diagonal of `JᵀJ` keeps the trust
/// region sensible when curve and regression parameters differ by orders of
/// magnitude.
#[derive(Debug, Clone)]
pub struct LevenbergMarquardt {
    options: SolverOptions,
    /// Initial damping parameter.
    lambda_initial: f64,
    /// Multiplicative damping adjustment.
    lambda_factor: f64,
}

impl Default for LevenbergMarquardt {
    fn default() -> Self {
        Self {
            options: SolverOptions::default(),
            lambda_initial: 0.001,
            lambda_factor: 10.0,
        }
    }
}

impl LevenbergMarquardt {
    /// Creates a solver with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with custom options.
    #[must_use]
    pub fn with_options(options: SolverOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Sets the initial damping parameter.
    #[must_use]
    pub fn lambda_initial(mut self, lambda_initial: f64) -> Self {
        self.lambda_initial = lambda_initial;
        self
    }

    /// Returns the solver options.
    #[must_use]
    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    fn clamp_to_bounds(&self, parameters: &mut DVector<f64>) {
        if let Some(lower) = &self.options.lower_bounds {
            for i in 0..parameters.len().min(lower.len()) {
                if parameters[i] < lower[i] {
                    parameters[i] = lower[i];
                }
            }
        }

        if let Some(upper) = &self.options.upper_bounds {
            for i in 0..parameters.len().min(upper.len()) {
                if parameters[i] > upper[i] {
                    parameters[i] = upper[i];
                }
            }
        }
    }

    fn check_finite(value: f64, context: &str) -> MathResult<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(MathError::non_finite(context))
        }
    }
}

impl LeastSquaresSolver for LevenbergMarquardt {
    fn estimate(
        &self,
        objective: &dyn ObjectiveFunction,
        initial: DVector<f64>,
    ) -> MathResult<SolverResult> {
        if initial.is_empty() {
            return Err(MathError::invalid_input("empty initial parameter vector"));
        }

        let started = Instant::now();
        let n = initial.len();

        let mut lambda = self.lambda_initial;
        let mut current = initial;
        let mut value_current =
            Self::check_finite(objective.value(&current), "initial objective")?;
        let initial_value = value_current;
        let mut iterations = 0usize;

        debug!("estimating {} parameters, initial cost {:.6e}", n, value_current);

        let (parameters, value, status) = loop {
            let jacobian = objective.jacobian(&current);

            if jacobian.ncols() != n {
                return Err(MathError::DimensionMismatch {
                    expected: n,
                    got: jacobian.ncols(),
                });
            }

            let residuals = objective.residuals(&current);
            let hessian = jacobian.transpose() * &jacobian;

            // damped normal equations, scaled by the approximate Hessian diagonal
            let mut damped = hessian.clone();
            for i in 0..n {
                damped[(i, i)] += lambda * hessian[(i, i)];
            }

            let cholesky = damped.cholesky().ok_or(MathError::SingularSystem)?;
            let step = cholesky.solve(&(jacobian.transpose() * residuals));

            let mut trial = &current - &step;
            self.clamp_to_bounds(&mut trial);

            let value_trial =
                Self::check_finite(objective.value(&trial), "trial objective")?;
            iterations += 1;

            trace!(
                "iteration {}: lambda {:.3e}, cost {:.6e} -> {:.6e}",
                iterations,
                lambda,
                value_current,
                value_trial
            );

            if (value_trial - value_current).abs() <= self.options.min_delta_value {
                break (trial, value_trial, SolverStatus::ValueConverged);
            }

            if (&trial - &current).norm() <= self.options.min_delta_parameters {
                break (trial, value_trial, SolverStatus::ParametersConverged);
            }

            if iterations >= self.options.max_iterations {
                break (trial, value_trial, SolverStatus::MaxIterationsReached);
            }

            if value_trial < value_current {
                // accept the step, relax the damping
                current = trial;
                value_current = value_trial;
                lambda /= self.lambda_factor;
            } else {
                // reject the step, tighten the damping
                lambda *= self.lambda_factor;
            }
        };

        let result = SolverResult {
            parameters,
            value,
            initial_value,
            iterations,
            status,
            fitting_time: started.elapsed(),
        };

        debug!("{}", result.summary());

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    /// Linear model y = a + b x fitted to exact data; LM should land on the
    /// least-squares solution in a handful of iterations.
    struct LinearFit {
        xs: Vec<f64>,
        ys: Vec<f64>,
    }

    impl ObjectiveFunction for LinearFit {
        fn value(&self, parameters: &DVector<f64>) -> f64 {
            0.5 * self.residuals(parameters).norm_squared()
        }

        fn residuals(&self, parameters: &DVector<f64>) -> DVector<f64> {
            DVector::from_iterator(
                self.xs.len(),
                self.xs
                    .iter()
                    .zip(self.ys.iter())
                    .map(|(x, y)| parameters[0] + parameters[1] * x - y),
            )
        }

        fn jacobian(&self, _parameters: &DVector<f64>) -> DMatrix<f64> {
            DMatrix::from_fn(self.xs.len(), 2, |i, j| {
                if j == 0 {
                    1.0
                } else {
                    self.xs[i]
                }
            })
        }

        fn residual_count(&self) -> usize {
            self.xs.len()
        }
    }

    /// Rosenbrock-style curved residuals to exercise damping adjustment.
    struct Curved;

    impl ObjectiveFunction for Curved {
        fn value(&self, parameters: &DVector<f64>) -> f64 {
            0.5 * self.residuals(parameters).norm_squared()
        }

        fn residuals(&self, parameters: &DVector<f64>) -> DVector<f64> {
            let (a, b) = (parameters[0], parameters[1]);
            DVector::from_vec(vec![10.0 * (b - a * a), 1.0 - a])
        }

        fn jacobian(&self, parameters: &DVector<f64>) -> DMatrix<f64> {
            let a = parameters[0];
            DMatrix::from_row_slice(2, 2, &[-20.0 * a, 10.0, -1.0, 0.0])
        }

        fn residual_count(&self) -> usize {
            2
        }
    }

    #[test]
    fn test_linear_fit_recovers_coefficients() {
        let objective = LinearFit {
            xs: vec![0.0, 1.0, 2.0, 3.0],
            ys: vec![1.0, 3.0, 5.0, 7.0], // y = 1 + 2x
        };

        let solver = LevenbergMarquardt::new();
        let result = solver
            .estimate(&objective, DVector::from_vec(vec![0.0, 0.0]))
            .unwrap();

        assert_relative_eq!(result.parameters[0], 1.0, epsilon = 1e-3);
        assert_relative_eq!(result.parameters[1], 2.0, epsilon = 1e-3);
        assert!(result.value <= result.initial_value);
    }

    #[test]
    fn test_curved_objective_converges() {
        let solver = LevenbergMarquardt::with_options(
            SolverOptions::new()
                .with_min_delta_value(1e-14)
                .with_min_delta_parameters(1e-12),
        );

        let result = solver
            .estimate(&Curved, DVector::from_vec(vec![-1.2, 1.0]))
            .unwrap();

        assert!(result.value < 1e-6, "final cost {}", result.value);
        assert!(result.iterations > 1);
    }

    #[test]
    fn test_bounds_are_enforced() {
        let objective = LinearFit {
            xs: vec![0.0, 1.0, 2.0],
            ys: vec![1.0, 3.0, 5.0],
        };

        let solver = LevenbergMarquardt::with_options(SolverOptions::new().with_bounds(
            DVector::from_vec(vec![0.0, 0.0]),
            DVector::from_vec(vec![10.0, 1.5]),
        ));

        let result = solver
            .estimate(&objective, DVector::from_vec(vec![0.5, 0.5]))
            .unwrap();

        assert!(result.parameters[1] <= 1.5 + 1e-12);
    }

    #[test]
    fn test_empty_initial_vector_is_rejected() {
        let objective = LinearFit {
            xs: vec![0.0],
            ys: vec![1.0],
        };

        let solver = LevenbergMarquardt::new();
        let result = solver.estimate(&objective, DVector::zeros(0));

        assert!(result.is_err());
    }

    #[test]
    fn test_iteration_ceiling() {
        let solver = LevenbergMarquardt::with_options(
            SolverOptions::new()
                .with_max_iterations(3)
                .with_min_delta_value(0.0)
                .with_min_delta_parameters(0.0),
        );

        let result = solver
            .estimate(&Curved, DVector::from_vec(vec![-1.2, 1.0]))
            .unwrap();

        assert_eq!(result.iterations, 3);
        assert_eq!(result.status, SolverStatus::MaxIterationsReached);
    }
}
