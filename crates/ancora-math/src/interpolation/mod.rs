//! Smoothing point interpolation over anchor knots.
//!
//! The anchor curve holds yields only at a handful of knot dates; everything
//! between is produced by a local smoothing scheme that fits a minimal-
//! curvature value through the two, three or four nearest knots:
//!
//! - [`two_point`]: straight line between two knots
//! - [`three_point`]: smoothing fit through three knots (used near the ends)
//! - [`multi_point`]: dispatching entry point over the full knot sequence
//!
//! # Behavior outside the knot range
//!
//! Queries below the first knot or above the last clamp to the end value.
//! This is the contract the curve model relies on; extrapolation beyond a
//! flat continuation is intentionally not offered.
//!
//! # Dispatch
//!
//! | knots | target position | scheme |
//! |-------|-----------------|--------|
//! | 2 | anywhere | two-point |
//! | 3 | anywhere | three-point |
//! | 4+ | at or below second knot | three-point on first three |
//! | 4+ | at or above second-to-last knot | three-point on last three |
//! | 4+ | interior | four-point on the surrounding window |

/// Linear interpolation between two knots, clamped to the end values.
#[must_use]
pub fn two_point(target: f64, xs: &[f64], ys: &[f64]) -> f64 {
    if target <= xs[0] {
        return ys[0];
    }

    if target >= xs[1] {
        return ys[1];
    }

    ys[0] + (ys[1] - ys[0]) * ((target - xs[0]) / (xs[1] - xs[0]))
}

/// Smoothing interpolation through three knots, clamped to the end values.
///
/// The interpolated value minimizes the squared slope changes of the
/// piecewise-linear curve obtained by inserting `target` among the knots.
#[must_use]
pub fn three_point(target: f64, xs: &[f64], ys: &[f64]) -> f64 {
    if target <= xs[0] {
        return ys[0];
    }

    if target >= xs[2] {
        return ys[2];
    }

    if target == xs[1] {
        return ys[1];
    }

    let (alpha, beta, gamma, lambda);

    if target > xs[1] {
        // target sits in the upper interval: knots x1 x2 t x4
        let (x1, x2, x3, x4) = (xs[0], xs[1], target, xs[2]);
        let (y1, y2, y4) = (ys[0], ys[1], ys[2]);

        alpha = 1.0 / (x3 - x2);
        beta = (-y2 / (x3 - x2)) - ((y2 - y1) / (x2 - x1));
        gamma = (-1.0 / (x4 - x3)) - (1.0 / (x3 - x2));
        lambda = (y4 / (x4 - x3)) + (y2 / (x3 - x2));
    } else {
        // target sits in the lower interval: knots x1 t x3 x4
        let (x1, x2, x3, x4) = (xs[0], target, xs[1], xs[2]);
        let (y1, y3, y4) = (ys[0], ys[1], ys[2]);

        alpha = (-1.0 / (x3 - x2)) - (1.0 / (x2 - x1));
        beta = (y3 / (x3 - x2)) + (y1 / (x2 - x1));
        gamma = 1.0 / (x3 - x2);
        lambda = ((y4 - y3) / (x4 - x3)) - (y3 / (x3 - x2));
    }

    ((-alpha * beta) - (gamma * lambda)) / ((alpha * alpha) + (gamma * gamma))
}

/// Smoothing interpolation through a four-knot window.
///
/// Callers must place `target` between the second and third knot; the
/// dispatcher in [`multi_point`] guarantees this.
fn four_point(target: f64, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert!(xs[1] <= target && target <= xs[2]);

    if target == xs[1] {
        return ys[1];
    }

    if target == xs[2] {
        return ys[2];
    }

    let (x1, x2, x3, x4, x5) = (xs[0], xs[1], target, xs[2], xs[3]);
    let (y1, y2, y4, y5) = (ys[0], ys[1], ys[2], ys[3]);

    let alpha = 1.0 / (x3 - x2);
    let beta = (-y2 / (x3 - x2)) - ((y2 - y1) / (x2 - x1));
    let gamma = (-1.0 / (x4 - x3)) - (1.0 / (x3 - x2));
    let lambda = (y4 / (x4 - x3)) + (y2 / (x3 - x2));
    let theta = 1.0 / (x4 - x3);
    let omega = (-y4 / (x4 - x3)) + ((y5 - y4) / (x5 - x4));

    ((-alpha * beta) - (gamma * lambda) - (theta * omega))
        / ((alpha * alpha) + (gamma * gamma) + (theta * theta))
}

/// Interpolates a value at `target` over the full knot sequence.
///
/// `xs` are knot locations in ascending order with `ys` the parallel values.
/// Degenerate inputs are tolerated: an empty sequence yields NaN and a
/// single knot yields its value.
#[must_use]
pub fn multi_point(target: f64, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());

    let n = xs.len();

    match n {
        0 => return f64::NAN,
        1 => return ys[0],
        2 => return two_point(target, xs, ys),
        3 => return three_point(target, xs, ys),
        _ => {}
    }

    if target <= xs[1] {
        return three_point(target, &xs[..3], &ys[..3]);
    }

    if target >= xs[n - 2] {
        return three_point(target, &xs[n - 3..], &ys[n - 3..]);
    }

    // first knot at or above the target; the guards above bound m to [2, n-2]
    let m = xs.iter().position(|&x| target <= x).unwrap_or(n - 2);

    four_point(target, &xs[m - 2..=m + 1], &ys[m - 2..=m + 1])
}
