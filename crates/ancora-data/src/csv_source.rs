//! File-backed instrument source.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use ancora_bonds::{Bond, BondError, BondResult, BondSet, InstrumentSource};
use ancora_core::{day_number, CashFlow};

use crate::yields;

/// One row of the instrument table.
#[derive(Debug, Deserialize)]
struct InstrumentRow {
    request_key: String,
    short_name: String,
    coupon: f64,
    issue_date: NaiveDate,
    maturity: NaiveDate,
    settlement_date: NaiveDate,
    days_to_settle: u32,
    amount_outstanding: f64,
    accrued_interest: f64,
}

/// One row of the cash-flow table.
#[derive(Debug, Deserialize)]
struct CashFlowRow {
    request_key: String,
    date: NaiveDate,
    amount: f64,
    principal: f64,
}

/// An instrument store loaded from a pair of CSV files.
///
/// The instrument table carries one row per bond keyed by `request_key`;
/// the cash-flow table carries one row per payment, joined on the same key.
/// Dates are ISO calendar dates and are converted to serial day numbers at
/// load time.
#[derive(Debug, Default)]
pub struct CsvInstrumentSource {
    instruments: HashMap<String, Bond>,
}

impl CsvInstrumentSource {
    /// Loads a source from an instrument table and a cash-flow table.
    ///
    /// # Errors
    ///
    /// Fails on unreadable files, malformed rows, or a cash flow that
    /// references an unknown instrument.
    pub fn load(
        instruments_path: impl AsRef<Path>,
        cash_flows_path: impl AsRef<Path>,
    ) -> BondResult<Self> {
        let mut instruments = HashMap::new();

        let mut reader = csv::Reader::from_path(instruments_path.as_ref())
            .map_err(|e| BondError::source_failure(e.to_string()))?;

        for row in reader.deserialize::<InstrumentRow>() {
            let row = row.map_err(|e| BondError::source_failure(e.to_string()))?;

            let mut bond = Bond::new(&row.request_key);
            bond.short_name = row.short_name;
            bond.coupon = row.coupon;
            bond.issue_date = day_number(row.issue_date);
            bond.maturity = day_number(row.maturity);
            bond.settlement_date = day_number(row.settlement_date);
            bond.days_to_settle = row.days_to_settle;
            bond.amount_outstanding = row.amount_outstanding;
            bond.accrued_interest = row.accrued_interest;

            debug!(key = %row.request_key, "loaded instrument");
            instruments.insert(row.request_key, bond);
        }

        let mut reader = csv::Reader::from_path(cash_flows_path.as_ref())
            .map_err(|e| BondError::source_failure(e.to_string()))?;

        for row in reader.deserialize::<CashFlowRow>() {
            let row = row.map_err(|e| BondError::source_failure(e.to_string()))?;

            let bond = instruments
                .get_mut(&row.request_key)
                .ok_or_else(|| BondError::instrument_not_found(&row.request_key))?;

            bond.push_cash_flow(CashFlow::new(
                day_number(row.date),
                row.amount,
                row.principal,
            ));
        }

        info!(count = instruments.len(), "instrument table loaded");

        Ok(Self { instruments })
    }

    /// Number of loaded instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// True when no instruments were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl InstrumentSource for CsvInstrumentSource {
    fn fetch_instrument(&self, ticker: &str) -> BondResult<Bond> {
        self.instruments
            .get(ticker)
            .cloned()
            .ok_or_else(|| BondError::instrument_not_found(ticker))
    }

    fn market_yields(&self, bond: &mut Bond) -> BondResult<()> {
        yields::fill_market_yields(bond)
    }

    fn model_yields(&self, bonds: &mut BondSet) -> BondResult<()> {
        for bond in bonds.iter_mut() {
            let model_yield = yields::yield_from_price(bond, bond.model_price)?;
            bond.model_yield_mid = model_yield;
        }

        Ok(())
    }
}
