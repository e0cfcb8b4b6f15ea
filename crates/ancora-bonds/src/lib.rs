//! # Ancora Bonds
//!
//! The instrument layer of the Ancora curve fitting library:
//!
//! - [`Bond`]: a single fixed-income instrument with live quotes and a
//!   model price that is a function of the curve and regression parameters
//! - [`RegressionCoefficients`]: the fixed-size, sparsely-active vector of
//!   cross-sectional price adjustments shared by every bond
//! - [`BondSet`]: the keyed instrument collection that aggregates bonds
//!   into one least-squares objective
//! - [`InstrumentSource`]: the market-data collaborator seam through which
//!   instruments and yields are obtained
//!
//! Bonds hold shared handles to the curve and coefficients they are valued
//! against; the fitting engine owns those handles and rewrites their
//! contents after every solve.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bond;
mod bond_set;
mod coefficients;
pub mod error;
mod source;

pub use bond::Bond;
pub use bond_set::BondSet;
pub use coefficients::{RegressionCoefficients, COEFF_SEED, TERM_COUNT};
pub use error::{BondError, BondResult};
pub use source::InstrumentSource;

use ancora_curves::AnchorCurve;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared, mutable handle to the curve a set of bonds is valued against.
pub type SharedCurve = Arc<RwLock<AnchorCurve>>;

/// Shared, mutable handle to the regression coefficients a set of bonds is
/// valued against.
pub type SharedCoefficients = Arc<RwLock<RegressionCoefficients>>;
