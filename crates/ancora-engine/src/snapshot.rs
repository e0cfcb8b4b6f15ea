//! Market snapshot inputs and the diff helpers behind the update protocol.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One full observation of the fitting inputs.
///
/// Every list is positionally aligned with `tickers`. The engine keeps the
/// previously accepted snapshot and diffs each incoming one against it,
/// category by category, to decide what actually has to happen: rebuild
/// instruments, reseed the curve, queue a price patch, or nothing at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Instrument request keys, one per row.
    pub tickers: Vec<String>,
    /// Benchmark indicator per ticker.
    pub benchmark_flags: Vec<bool>,
    /// Cheapest-to-deliver indicator per ticker.
    pub ctd_flags: Vec<bool>,
    /// Residual weight per ticker.
    pub weights: Vec<f64>,
    /// Bid price per ticker.
    pub bids: Vec<f64>,
    /// Ask price per ticker.
    pub asks: Vec<f64>,
    /// Valuation date as a serial day number.
    pub as_of: f64,
    /// Whether to backfill market yields through the instrument source.
    pub calculate_yields: bool,
    /// Anchor dates for the curve, as serial day numbers.
    pub anchor_dates: Vec<f64>,
    /// Regression term switch vector.
    pub coeff_flags: Vec<bool>,
}

impl MarketSnapshot {
    /// Checks that every per-ticker list lines up with `tickers`.
    pub fn validate(&self) -> EngineResult<()> {
        let expected = self.tickers.len();

        let checks: [(&'static str, usize); 5] = [
            ("benchmark_flags", self.benchmark_flags.len()),
            ("ctd_flags", self.ctd_flags.len()),
            ("weights", self.weights.len()),
            ("bids", self.bids.len()),
            ("asks", self.asks.len()),
        ];

        for (field, got) in checks {
            if got != expected {
                return Err(EngineError::SnapshotLengthMismatch {
                    field,
                    expected,
                    got,
                });
            }
        }

        Ok(())
    }
}

/// Indices where two numeric lists differ beyond `epsilon`, over the common
/// prefix.
pub(crate) fn changed_indices(current: &[f64], other: &[f64], epsilon: f64) -> Vec<usize> {
    current
        .iter()
        .zip(other.iter())
        .enumerate()
        .filter(|(_, (a, b))| (**a - **b).abs() > epsilon)
        .map(|(i, _)| i)
        .collect()
}

/// Indices where two string lists differ, over the common prefix.
pub(crate) fn changed_string_indices(current: &[String], other: &[String]) -> Vec<usize> {
    current
        .iter()
        .zip(other.iter())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect()
}

/// Indices where two flag lists differ, over the common prefix.
pub(crate) fn changed_flag_indices(current: &[bool], other: &[bool]) -> Vec<usize> {
    current
        .iter()
        .zip(other.iter())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect()
}

/// Whether two flag lists differ at all.
pub(crate) fn flags_changed(current: &[bool], other: &[bool]) -> bool {
    current.len() != other.len() || changed_flag_indices(current, other).first().is_some()
}
