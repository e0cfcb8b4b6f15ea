//! Scalar Newton-Raphson root finding.
//!
//! Used by the data layer to back out yields from prices on a bond's own
//! cash flows. The derivative is estimated by central differences so the
//! pricing function stays a black box.

use crate::error::{MathError, MathResult};

/// Default residual tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default iteration ceiling.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Configuration for the scalar root finder.
#[derive(Debug, Clone, Copy)]
pub struct RootConfig {
    /// Convergence tolerance on |f(x)| and on the step size.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Finds a root of `f` by Newton iteration with a numerical derivative.
///
/// # Errors
///
/// Fails when the derivative vanishes at an iterate or the iteration
/// ceiling is reached without convergence.
pub fn newton_raphson_numerical(
    f: impl Fn(f64) -> f64,
    initial_guess: f64,
    config: &RootConfig,
) -> MathResult<f64> {
    let h = 1e-8;
    let mut x = initial_guess;

    for _ in 0..config.max_iterations {
        let fx = f(x);

        if fx.abs() < config.tolerance {
            return Ok(x);
        }

        let dfx = (f(x + h) - f(x - h)) / (2.0 * h);

        if dfx.abs() < 1e-15 {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        x -= step;

        if step.abs() < config.tolerance {
            return Ok(x);
        }
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        f(x).abs(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_square_root_of_two() {
        let root =
            newton_raphson_numerical(|x| x * x - 2.0, 1.5, &RootConfig::default()).unwrap();
        assert_relative_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-8);
    }

    #[test]
    fn test_simple_yield_solve() {
        // single cash flow of 105 in one year priced at 100
        let price_error = |y: f64| 105.0 * (-y).exp() - 100.0;
        let root =
            newton_raphson_numerical(price_error, 0.05, &RootConfig::default()).unwrap();
        assert_relative_eq!(root, (105.0_f64 / 100.0).ln(), epsilon = 1e-8);
    }

    #[test]
    fn test_flat_function_fails() {
        let result = newton_raphson_numerical(|_| 1.0, 0.0, &RootConfig::default());
        assert!(result.is_err());
    }
}
