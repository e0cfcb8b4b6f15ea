//! Finite-difference gradient schemes.
//!
//! Instruments expose their model price as a black-box function of the
//! parameter vector, and the least-squares Jacobian is assembled from
//! numerical gradients. The scheme is a strategy trait so an instrument
//! type with analytic derivatives can slot in without touching the
//! objective-set or solver contracts.

use nalgebra::DVector;

/// Default perturbation step: the square root of machine epsilon.
pub const DEFAULT_STEP: f64 = 1.4901161193847656e-8;

/// A strategy for differentiating a scalar function of a parameter vector.
pub trait DifferenceScheme: Send + Sync {
    /// Returns the gradient of `f` at `x`.
    fn gradient(&self, f: &mut dyn FnMut(&DVector<f64>) -> f64, x: &DVector<f64>)
        -> DVector<f64>;

    /// Returns the scheme's perturbation step size.
    fn step(&self) -> f64;
}

/// One-sided forward differences: `(f(x + h e_i) - f(x)) / h`.
///
/// One evaluation per component beyond the base point; the default scheme
/// for Jacobian assembly where evaluation cost dominates accuracy.
#[derive(Debug, Clone, Copy)]
pub struct ForwardDifference {
    step: f64,
}

impl Default for ForwardDifference {
    fn default() -> Self {
        Self { step: DEFAULT_STEP }
    }
}

impl ForwardDifference {
    /// Creates a forward-difference scheme with a custom step.
    #[must_use]
    pub fn with_step(step: f64) -> Self {
        Self { step }
    }
}

impl DifferenceScheme for ForwardDifference {
    fn gradient(
        &self,
        f: &mut dyn FnMut(&DVector<f64>) -> f64,
        x: &DVector<f64>,
    ) -> DVector<f64> {
        let base = f(x);
        let mut gradient = DVector::zeros(x.len());
        let mut bumped = x.clone();

        for i in 0..x.len() {
            bumped[i] = x[i] + self.step;
            gradient[i] = (f(&bumped) - base) / self.step;
            bumped[i] = x[i];
        }

        gradient
    }

    fn step(&self) -> f64 {
        self.step
    }
}

/// Symmetric central differences: `(f(x + h/2 e_i) - f(x - h/2 e_i)) / h`.
///
/// Twice the evaluations of [`ForwardDifference`] for second-order accuracy.
#[derive(Debug, Clone, Copy)]
pub struct CentralDifference {
    step: f64,
}

impl Default for CentralDifference {
    fn default() -> Self {
        Self { step: DEFAULT_STEP }
    }
}

impl CentralDifference {
    /// Creates a central-difference scheme with a custom step.
    #[must_use]
    pub fn with_step(step: f64) -> Self {
        Self { step }
    }
}

impl DifferenceScheme for CentralDifference {
    fn gradient(
        &self,
        f: &mut dyn FnMut(&DVector<f64>) -> f64,
        x: &DVector<f64>,
    ) -> DVector<f64> {
        let half = self.step * 0.5;
        let mut gradient = DVector::zeros(x.len());
        let mut bumped = x.clone();

        for i in 0..x.len() {
            bumped[i] = x[i] + half;
            let up = f(&bumped);
            bumped[i] = x[i] - half;
            let down = f(&bumped);
            bumped[i] = x[i];

            gradient[i] = (up - down) / self.step;
        }

        gradient
    }

    fn step(&self) -> f64 {
        self.step
    }
}

/// Scalar forward difference of a univariate function.
#[must_use]
pub fn forward(f: impl Fn(f64) -> f64, x: f64, step: f64) -> f64 {
    (f(x + step) - f(x)) / step
}

/// Scalar central difference of a univariate function.
#[must_use]
pub fn central(f: impl Fn(f64) -> f64, x: f64, step: f64) -> f64 {
    let half = step * 0.5;
    (f(x + half) - f(x - half)) / step
}
