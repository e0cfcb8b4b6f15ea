//! In-memory instrument source.

use std::collections::HashMap;

use tracing::debug;

use ancora_bonds::{Bond, BondError, BondResult, BondSet, InstrumentSource};

use crate::yields;

/// A keyed, in-memory instrument store.
///
/// The workhorse source for tests and embedded fixtures: reference bonds
/// are registered up front and served as fresh copies, so engine-side
/// mutation never leaks back into the store.
#[derive(Debug, Default)]
pub struct StaticInstrumentSource {
    instruments: HashMap<String, Bond>,
}

impl StaticInstrumentSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a reference bond under its request key.
    pub fn insert(&mut self, bond: Bond) {
        self.instruments
            .insert(bond.request_key().to_string(), bond);
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with_instrument(mut self, bond: Bond) -> Self {
        self.insert(bond);
        self
    }

    /// Number of registered instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// True when no instruments are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl InstrumentSource for StaticInstrumentSource {
    fn fetch_instrument(&self, ticker: &str) -> BondResult<Bond> {
        debug!(ticker, "fetching instrument");

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
