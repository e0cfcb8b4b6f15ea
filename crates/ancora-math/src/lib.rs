//! # Ancora Math
//!
//! Numerical building blocks for the Ancora curve fitting library:
//!
//! - [`interpolation`]: smoothing point interpolation over anchor knots
//! - [`differentiation`]: pluggable finite-difference gradient schemes
//! - [`solvers`]: the least-squares solver contract and the bundled
//!   Levenberg-Marquardt implementation, plus a scalar Newton root finder
//!
//! The solver is deliberately behind a trait ([`solvers::LeastSquaresSolver`])
//! so the fitting engine can swap minimizers without touching the objective
//! or the orchestration code.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod differentiation;
pub mod error;
pub mod interpolation;
pub mod solvers;

pub use differentiation::{CentralDifference, DifferenceScheme, ForwardDifference};
pub use error::{MathError, MathResult};
pub use solvers::{
    LeastSquaresSolver, LevenbergMarquardt, ObjectiveFunction, SolverOptions, SolverResult,
    SolverStatus,
};
