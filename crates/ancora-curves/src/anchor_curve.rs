//! Anchor yield curve implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

use ancora_core::{year_fraction, DAYS_PER_YEAR};
use ancora_math::interpolation;

use crate::error::{CurveError, CurveResult};

/// A yield curve held at discrete anchor dates.
///
/// Knot dates are serial day numbers and the parallel `values` are yields in
/// percent. Yields between knots come from the smoothing interpolation in
/// [`ancora_math::interpolation`]; the curve itself does not require the
/// dates to be sorted, that is the interpolation collaborator's contract.
///
/// # Example
///
/// ```rust,ignore
/// let curve = AnchorCurve::flat(vec![45000.0, 45365.0, 46000.0], 0.5)?;
/// let df = curve.discount_factor(45500.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorCurve {
    /// Anchor dates as serial day numbers.
    dates: Vec<f64>,
    /// Yields at each anchor date, in percent.
    values: Vec<f64>,
}

impl AnchorCurve {
    /// Creates a curve from parallel date and value sequences.
    ///
    /// # Errors
    ///
    /// Returns an error when the sequences differ in length.
    pub fn new(dates: Vec<f64>, values: Vec<f64>) -> CurveResult<Self> {
        if dates.len() != values.len() {
            return Err(CurveError::length_mismatch(dates.len(), values.len()));
        }

        Ok(Self { dates, values })
    }

    /// Creates a curve with the same seed yield at every anchor date.
    #[must_use]
    pub fn flat(dates: Vec<f64>, seed: f64) -> Self {
        let values = vec![seed; dates.len()];
        Self { dates, values }
    }

    /// Number of anchor knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when the curve holds no knots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The anchor dates.
    #[must_use]
    pub fn dates(&self) -> &[f64] {
        &self.dates
    }

    /// The yields at the anchor dates.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Interpolated yield at `date`.
    #[must_use]
    pub fn yield_at(&self, date: f64) -> f64 {
        interpolation::multi_point(date, &self.dates, &self.values)
    }

    /// Interpolated yields at each of `dates`.
    #[must_use]
    pub fn yields(&self, dates: &[f64]) -> Vec<f64> {
        dates.iter().map(|&d| self.yield_at(d)).collect()
    }

    /// Year fraction from the first anchor date, on a 365.25-day year.
    #[must_use]
    pub fn year_fraction(&self, date: f64) -> f64 {
        match self.dates.first() {
            Some(&first) => year_fraction(first, date),
            None => date / DAYS_PER_YEAR,
        }
    }

    /// Discount factor at `date` off the interpolated yield.
    ///
    /// Yields are quoted in percent, so the exponent carries a factor of
    /// one hundred.
    #[must_use]
    pub fn discount_factor(&self, date: f64) -> f64 {
        (-self.yield_at(date) * self.year_fraction(date) / 100.0).exp()
    }

    /// Discount factors at each of `dates`.
    #[must_use]
    pub fn discount_factors(&self, dates: &[f64]) -> Vec<f64> {
        dates.iter().map(|&d| self.discount_factor(d)).collect()
    }

    /// Replaces or patches the curve from new date and value sequences.
    ///
    /// A different knot count replaces the curve wholesale. Otherwise each
    /// index is patched in place under exact equality. Returns whether
    /// anything differed.
    pub fn update(&mut self, dates: Vec<f64>, values: Vec<f64>) -> bool {
        if self.dates.len() != dates.len() {
            self.dates = dates;
            self.values = values;
            return true;
        }

        let mut changed = false;

        for (current, new) in self.dates.iter_mut().zip(dates) {
            if *current != new {
                *current = new;
                changed = true;
            }
        }

        for (current, new) in self.values.iter_mut().zip(values) {
            if *current != new {
                *current = new;
                changed = true;
            }
        }

        changed
    }

    /// Overwrites the knot yields in place from a solver output slice.
    ///
    /// # Errors
    ///
    /// Returns an error unless `values` has exactly one entry per knot.
    pub fn apply_solver_output(&mut self, values: &[f64]) -> CurveResult<()> {
        if values.len() != self.values.len() {
            return Err(CurveError::solver_output_mismatch(
                self.values.len(),
                values.len(),
            ));
        }

        self.values.copy_from_slice(values);
        Ok(())
    }

    /// Reseeds every knot to the given yield, keeping the dates.
    pub fn reseed(&mut self, seed: f64) {
        for value in &mut self.values {
            *value = seed;
        }
    }

    /// Replaces the anchor dates and reseeds every knot yield.
    pub fn reinitialize(&mut self, dates: Vec<f64>, seed: f64) {
        self.values = vec![seed; dates.len()];
        self.dates = dates;
    }
}

impl fmt::Display for AnchorCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (date, value) in self.dates.iter().zip(self.values.iter()) {
            writeln!(f, "{date},{value}")?;
        }

        Ok(())
    }
}
