//! # Ancora Curves
//!
//! The anchor yield curve: a date-indexed set of knot yields with smoothing
//! interpolation between knots and continuously-compounded discounting off
//! the interpolated yield.
//!
//! The curve is the mutable heart of the fitting loop. It is created flat
//! when anchor dates are (re)initialized, overwritten in place after every
//! solve, and read by every instrument valuation in between.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod anchor_curve;
pub mod error;

pub use anchor_curve::AnchorCurve;
pub use error::{CurveError, CurveResult};
