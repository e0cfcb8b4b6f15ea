//! Cross-sectional regression coefficients.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of regression terms.
pub const TERM_COUNT: usize = 5;

/// Seed value given to a term when it is switched on.
pub const COEFF_SEED: f64 = 0.0001;

/// Magnitude below which a term counts as inactive.
const ACTIVE_EPSILON: f64 = 1e-9;

const AMOUNT_OUTSTANDING: usize = 0;
const BENCHMARK: usize = 1;
const CTD: usize = 2;
const BID_ASK_SPREAD: usize = 3;
const ISSUE_DATE_YEAR_FRACTION: usize = 4;

/// The fixed-size, sparsely-active vector of cross-sectional price
/// adjustments.
///
/// Five named terms in a fixed order: amount outstanding, benchmark
/// indicator, CTD indicator, bid/ask spread and issue-date year fraction.
/// Each term carries an on/off flag and a value; an inactive term's value
/// is always exactly zero. The solver only sees the active terms, packed
/// in order after the curve parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionCoefficients {
    values: [f64; TERM_COUNT],
    flags: [bool; TERM_COUNT],
}

impl Default for RegressionCoefficients {
    fn default() -> Self {
        Self {
            values: [0.0; TERM_COUNT],
            flags: [false; TERM_COUNT],
        }
    }
}

impl RegressionCoefficients {
    /// Creates coefficients with every term switched off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates coefficients from a switch vector, seeding active terms.
    #[must_use]
    pub fn from_flags(flags: &[bool]) -> Self {
        let mut coefficients = Self::new();
        coefficients.update_flags(flags);
        coefficients
    }

    /// Replaces the switch vector, reseeding every term.
    ///
    /// Terms switched on take the seed value, terms switched off are forced
    /// to zero. Missing entries in a short `flags` slice read as off.
    pub fn update_flags(&mut self, flags: &[bool]) {
        for i in 0..TERM_COUNT {
            let on = flags.get(i).copied().unwrap_or(false);
            self.flags[i] = on;
            self.values[i] = if on { COEFF_SEED } else { 0.0 };
        }
    }

    /// Scatters a solver output into the active terms.
    ///
    /// Walks the terms in fixed order, consuming one scalar per active term
    /// starting at `offset`; inactive terms are zeroed. Scalars beyond the
    /// end of `parameters` read as zero.
    pub fn apply_solver_output(&mut self, parameters: &[f64], offset: usize) {
        let mut j = offset;
        for i in 0..TERM_COUNT {
            if self.flags[i] {
                self.values[i] = parameters.get(j).copied().unwrap_or(0.0);
                j += 1;
            } else {
                self.values[i] = 0.0;
            }
        }
    }

    /// Number of terms whose value is meaningfully non-zero.
    #[must_use]
    pub fn available(&self) -> usize {
        self.values
            .iter()
            .filter(|v| v.abs() > ACTIVE_EPSILON)
            .count()
    }

    /// Number of terms switched on.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.flags.iter().filter(|&&on| on).count()
    }

    /// The switch vector.
    #[must_use]
    pub fn flags(&self) -> [bool; TERM_COUNT] {
        self.flags
    }

    /// The term values in fixed order.
    #[must_use]
    pub fn values(&self) -> [f64; TERM_COUNT] {
        self.values
    }

    /// The amount-outstanding term.
    #[must_use]
    pub fn amount_outstanding(&self) -> f64 {
        self.values[AMOUNT_OUTSTANDING]
    }

    /// The benchmark-indicator term.
    #[must_use]
    pub fn benchmark(&self) -> f64 {
        self.values[BENCHMARK]
    }

    /// The CTD-indicator term.
    #[must_use]
    pub fn ctd(&self) -> f64 {
        self.values[CTD]
    }

    /// The bid/ask-spread term.
    #[must_use]
    pub fn bid_ask_spread(&self) -> f64 {
        self.values[BID_ASK_SPREAD]
    }

    /// The issue-date year-fraction term.
    #[must_use]
    pub fn issue_date_year_fraction(&self) -> f64 {
        self.values[ISSUE_DATE_YEAR_FRACTION]
    }

    /// True when the benchmark term is switched on.
    #[must_use]
    pub fn benchmark_on(&self) -> bool {
        self.flags[BENCHMARK]
    }

    /// True when the CTD term is switched on.
    #[must_use]
    pub fn ctd_on(&self) -> bool {
        self.flags[CTD]
    }
}

/// Equality over the five named values, per the fitting protocol; the
/// switch vector is bookkeeping and does not participate.
impl PartialEq for RegressionCoefficients {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl fmt::Display for RegressionCoefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AmountOutstanding,{}", self.amount_outstanding())?;
        writeln!(f, "Benchmark,{}", self.benchmark())?;
        writeln!(f, "Ctd,{}", self.ctd())?;
        writeln!(f, "BidAskSpread,{}", self.bid_ask_spread())?;
        writeln!(f, "IssueDateYearFraction,{}", self.issue_date_year_fraction())
    }
}
