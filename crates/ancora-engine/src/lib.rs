//! # Ancora Engine
//!
//! The incremental curve fitting engine. A [`BondFitter`] owns the
//! instrument set, the anchor curve and the regression coefficients, runs
//! a dedicated background thread that re-solves the nonlinear least-squares
//! fit as inputs change, and publishes results through non-blocking read
//! accessors.
//!
//! ## Control flow
//!
//! ```text
//! caller ──initialise/update──> BondFitter ──commands──> fit loop thread
//!   │                              │                         │
//!   │<─── cost/status/yields ──────┴──── published state <───┘
//! ```
//!
//! Updates are diffed category by category: a ticker-set change rebuilds
//! membership, an anchor-date change reseeds the curve, a bid change is
//! queued for the loop thread, flag and weight changes apply directly, and
//! a regression-switch change is validated before it reseeds the fit.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
mod fitter;
mod snapshot;

pub use error::{EngineError, EngineResult};
pub use fitter::{BondFitter, FitterConfig, FitterState};
pub use snapshot::MarketSnapshot;
