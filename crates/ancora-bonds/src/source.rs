//! The market-data collaborator seam.

use crate::error::BondResult;
use crate::{Bond, BondSet};

/// Supplies instruments and yield conversions to the fitting engine.
///
/// The engine never talks to a market-data backend directly; everything it
/// needs flows through this trait, so a vendor feed, a file store and an
/// in-memory fixture are interchangeable.
pub trait InstrumentSource: Send + Sync {
    /// Builds a bond from reference data: static fields plus cash flows.
    ///
    /// Quotes and live flags are left at their defaults; the engine applies
    /// those from its own inputs.
    fn fetch_instrument(&self, ticker: &str) -> BondResult<Bond>;

    /// Populates the bond's bid/ask/mid yield fields from its observed
    /// prices.
    fn market_yields(&self, bond: &mut Bond) -> BondResult<()>;

    /// Refreshes every bond's model yield from its current model price.
    fn model_yields(&self, bonds: &mut BondSet) -> BondResult<()>;
}
